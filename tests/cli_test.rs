//! CLIの統合テスト
//!
//! 一時ディレクトリに証明書データベースと設定ファイルを置き、
//! `cert-verify` バイナリを `assert_cmd` で起動して出力と終了コードを確認する。
//! tesseract が無い環境でも通るよう、OCRを伴うケースはデコード失敗の経路だけを使う。

#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const TEST_CSV: &str = "certificate_id,name,roll_number,marks,institution,course
CERT001,John Doe,2021001,88,ABC University,BSc Computer Science
CERT002,Jane Smith,2021002,91,XYZ Institute,BCom
";

struct Fixture {
    dir: TempDir,
    table: PathBuf,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().expect("Failed to create temp dir");
        let table = dir.path().join("certificates.csv");
        std::fs::write(&table, TEST_CSV).unwrap();
        let config = dir.path().join("config.json");
        std::fs::write(
            &config,
            r#"{"tesseract": {"binary_path": "/nonexistent/tesseract-binary"}}"#,
        )
        .unwrap();
        Self { dir, table, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 設定ファイルと参照表を指定した `cert-verify` コマンド
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cert-verify").expect("cert-verify binary not found");
        cmd.arg("--config").arg(&self.config).arg("--table").arg(&self.table);
        cmd
    }
}

#[test]
fn test_check_text_verified() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["check", "--text", "Certificate CERT001 awarded to JOHN DOE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅"))
        .stdout(predicate::str::contains("\"certificate_id\": \"CERT001\""))
        .stdout(predicate::str::contains("\"marks\": 88"));
}

#[test]
fn test_check_text_not_found() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["check", "--text", "Certificate CERT001 awarded to Someone Else"])
        .assert()
        .success()
        .stdout(predicate::str::contains("❌"))
        .stdout(predicate::str::contains("✅").not());
}

#[test]
fn test_check_reads_file_and_stdin() {
    let fx = Fixture::new();
    let text_path = fx.path().join("ocr.txt");
    std::fs::write(&text_path, "jane smith\nCERT002\n").unwrap();

    fx.cmd()
        .arg("check")
        .arg(&text_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("CERT002"));

    fx.cmd()
        .arg("check")
        .write_stdin("CERT001 john doe")
        .assert()
        .success()
        .stdout(predicate::str::contains("CERT001"));
}

#[test]
fn test_check_json_output() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .args(["--format", "json", "check", "--text", "CERT002 Jane Smith"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "verified");
    assert_eq!(value["record"]["institution"], "XYZ Institute");
}

/// 参照表が無い場合は警告を出し、照合はしない（異常終了しない）
#[test]
fn test_missing_table_warns() {
    let fx = Fixture::new();
    let mut cmd = Command::cargo_bin("cert-verify").unwrap();
    cmd.arg("--config")
        .arg(&fx.config)
        .arg("--table")
        .arg(fx.path().join("missing.csv"))
        .args(["check", "--text", "CERT001 John Doe"])
        .assert()
        .success()
        .stderr(predicate::str::contains("missing.csv"))
        .stdout(predicate::str::contains("⚠"));
}

/// 壊れた画像 → OCR失敗を報告して空テキストで照合（異常終了しない）
#[test]
fn test_verify_malformed_image_reports_ocr_failure() {
    let fx = Fixture::new();
    let image = fx.path().join("scan.png");
    std::fs::write(&image, b"this is not a png").unwrap();

    fx.cmd()
        .arg("verify")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("scan.png"))
        .stdout(predicate::str::contains("OCRに失敗しました"))
        .stdout(predicate::str::contains("❌"));
}

#[test]
fn test_verify_unsupported_extension_fails() {
    let fx = Fixture::new();
    let image = fx.path().join("scan.gif");
    std::fs::write(&image, b"GIF89a").unwrap();

    fx.cmd()
        .arg("verify")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan.gif"));
}

#[test]
fn test_batch_json_summary() {
    let fx = Fixture::new();
    let scans = fx.path().join("scans");
    std::fs::create_dir(&scans).unwrap();
    std::fs::write(scans.join("a.png"), b"broken").unwrap();
    std::fs::write(scans.join("b.jpg"), b"broken").unwrap();
    std::fs::write(scans.join("readme.txt"), b"skip").unwrap();

    let output = fx
        .cmd()
        .args(["--format", "json", "batch"])
        .arg(&scans)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["total"], 2);
    assert_eq!(value["summary"]["not_found"], 2);
    assert_eq!(value["summary"]["extraction_failed"], 2);
    assert_eq!(value["reports"][0]["file_name"], "a.png");
}

#[test]
fn test_batch_empty_folder_fails() {
    let fx = Fixture::new();
    let scans = fx.path().join("empty");
    std::fs::create_dir(&scans).unwrap();

    fx.cmd().arg("batch").arg(&scans).assert().failure();
}

#[test]
fn test_table_summary() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("table")
        .assert()
        .success()
        .stdout(predicate::str::contains("件数: 2"))
        .stdout(predicate::str::contains("certificate_id, name, roll_number"));
}

#[test]
fn test_config_set_and_show() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "--set-lang", "eng+jpn", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("設定を保存しました"))
        .stdout(predicate::str::contains("OCR言語: eng+jpn"));

    let saved = std::fs::read_to_string(&fx.config).unwrap();
    assert!(saved.contains("eng+jpn"));
    assert!(saved.contains("/nonexistent/tesseract-binary"));
}
