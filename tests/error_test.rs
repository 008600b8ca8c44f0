//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use cert_verify::error::CertVerifyError;
use cert_verify::ocr::ExtractionError;
use cert_verify::upload::{scan_folder, Upload};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(matches!(result, Err(CertVerifyError::FolderNotFound(_))));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.csv"), "certificate_id,name").unwrap();

    let result = scan_folder(dir.path(), false);
    assert!(result.unwrap().is_empty());
}

/// 対応外の拡張子
#[test]
fn test_unsupported_upload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cert.bmp");
    std::fs::write(&path, b"BM").unwrap();

    let err = Upload::from_path(&path).unwrap_err();
    assert!(matches!(err, CertVerifyError::UnsupportedImage(_)));
    assert!(err.to_string().contains("JPG/JPEG/PNG"));
}

/// CertVerifyErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        CertVerifyError::Config("テスト設定エラー".to_string()),
        CertVerifyError::TableNotFound("data/certificates.csv".to_string()),
        CertVerifyError::Spreadsheet("壊れたファイル".to_string()),
        CertVerifyError::FileNotFound("cert.png".to_string()),
        CertVerifyError::FolderNotFound("/path/to/folder".to_string()),
        CertVerifyError::NoImagesFound("フォルダ".to_string()),
        CertVerifyError::Prompt("中断".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 共通ライブラリのエラーは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let err: CertVerifyError = cert_verify_common::Error::MissingColumn("name").into();
    assert!(matches!(err, CertVerifyError::Table(_)));
    assert!(err.to_string().contains("`name`"));
}

/// 抽出エラーからの変換
#[test]
fn test_extraction_error_conversion() {
    let err: CertVerifyError = ExtractionError::BackendFailed {
        code: Some(1),
        stderr: "Failed loading language 'xyz'".into(),
    }
    .into();

    assert!(matches!(err, CertVerifyError::Extraction(_)));
    let display = err.to_string();
    assert!(display.contains("OCR"));
    assert!(display.contains("xyz"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CertVerifyError = io_err.into();
    assert!(matches!(err, CertVerifyError::Io(_)));
    assert!(err.to_string().contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: CertVerifyError = json_err.into();
    assert!(matches!(err, CertVerifyError::JsonParse(_)));
}
