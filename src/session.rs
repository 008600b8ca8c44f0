//! 対話式照合モジュール
//!
//! 画像パスを1件ずつ入力してもらい、その都度 抽出 → 照合 → 表示 を行う。
//! 1件の失敗でセッションは終了しない。

use crate::cli::OutputFormat;
use crate::error::{CertVerifyError, Result};
use crate::ocr::TextExtractor;
use crate::pipeline::process_upload;
use crate::render::render_report;
use crate::upload::Upload;
use cert_verify_common::ReferenceTable;
use dialoguer::Input;
use std::path::PathBuf;

/// 入力に対する操作
#[derive(Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// この画像を照合
    Verify(PathBuf),
    /// 終了
    Quit,
}

/// 入力文字列を解釈
///
/// 空入力・`q` で終了。前後の空白とクォートは取り除く
/// （ターミナルにドラッグ＆ドロップしたパス対策）。
pub fn parse_session_input(input: &str) -> SessionAction {
    let trimmed = input.trim();
    match trimmed {
        "" | "q" | "Q" | "quit" | "exit" => SessionAction::Quit,
        _ => {
            let unquoted = trimmed
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
                .unwrap_or(trimmed);
            SessionAction::Verify(PathBuf::from(unquoted))
        }
    }
}

pub async fn run_interactive_session<E: TextExtractor>(
    table: &ReferenceTable,
    extractor: &E,
    format: OutputFormat,
) -> Result<()> {
    println!("🎓 証明書照合セッション");
    println!("証明書画像（JPG/PNG）のパスを入力してください。空入力または q で終了します。");
    if table.is_empty() {
        println!("⚠ 証明書データベースが空のため、照合はスキップされます");
    }
    println!("---\n");

    let mut processed = 0usize;

    loop {
        let input: String = Input::new()
            .with_prompt("画像パス")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| CertVerifyError::Prompt(e.to_string()))?;

        let path = match parse_session_input(&input) {
            SessionAction::Quit => break,
            SessionAction::Verify(path) => path,
        };

        let upload = match Upload::from_path(&path) {
            Ok(upload) => upload,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "アップロード読み込み失敗");
                println!("❌ {}\n", e);
                continue;
            }
        };

        let report = process_upload(table, extractor, &upload).await;
        render_report(&mut std::io::stdout().lock(), &report, format)?;
        println!();
        processed += 1;
    }

    println!("終了します（{}件処理）", processed);
    Ok(())
}
