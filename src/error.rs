use crate::ocr::ExtractionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertVerifyError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("証明書データベースが見つかりません: {0}")]
    TableNotFound(String),

    #[error("表計算ファイル読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error(transparent)]
    Table(#[from] cert_verify_common::Error),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("対応していない画像形式です（JPG/JPEG/PNGのみ）: {0}")]
    UnsupportedImage(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("OCRエラー: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CertVerifyError>;
