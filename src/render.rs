//! 結果の表示
//!
//! テキスト表示と JSON 表示。出力先は `io::Write` で差し替え可能。

use crate::cli::OutputFormat;
use crate::pipeline::{Outcome, UploadReport};
use cert_verify_common::ReferenceTable;
use std::io::{self, Write};
use std::path::Path;

const MSG_VERIFIED: &str = "✅ 証明書を確認しました";
const MSG_NOT_FOUND: &str = "❌ 証明書が見つからないか、無効の可能性があります";
const MSG_TABLE_UNAVAILABLE: &str = "⚠ 証明書データベースが空、または見つかりません";

pub fn render_report<W: Write>(out: &mut W, report: &UploadReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)
        }
        OutputFormat::Text => render_report_text(out, report),
    }
}

fn render_report_text<W: Write>(out: &mut W, report: &UploadReport) -> io::Result<()> {
    match &report.image {
        Some(img) => writeln!(
            out,
            "📄 {} ({}x{}, {})",
            report.file_name, img.width, img.height, img.format
        )?,
        None => writeln!(out, "📄 {}", report.file_name)?,
    }
    writeln!(out, "  SHA-256: {}", report.image_sha256)?;

    if let Some(err) = &report.extraction_error {
        writeln!(out, "⚠ OCRに失敗しました: {}", err)?;
    }

    writeln!(out, "\n--- 抽出テキスト ---")?;
    let text = report.extracted_text.trim_end();
    if text.is_empty() {
        writeln!(out, "(なし)")?;
    } else {
        writeln!(out, "{}", text)?;
    }
    writeln!(out, "--------------------\n")?;

    render_outcome_text(out, &report.outcome)
}

/// 照合結果のみ表示（OCRなしの照合用）
pub fn render_outcome<W: Write>(out: &mut W, outcome: &Outcome, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, outcome)?;
            writeln!(out)
        }
        OutputFormat::Text => render_outcome_text(out, outcome),
    }
}

fn render_outcome_text<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Verified { record } => {
            writeln!(out, "{}", MSG_VERIFIED)?;
            writeln!(out, "{}", record.to_json_pretty()?)
        }
        Outcome::NotFound => writeln!(out, "{}", MSG_NOT_FOUND),
        Outcome::TableUnavailable => writeln!(out, "{}", MSG_TABLE_UNAVAILABLE),
    }
}

/// バッチ処理の集計
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub verified: usize,
    pub not_found: usize,
    pub table_unavailable: usize,
    pub extraction_failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[UploadReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match report.outcome {
                Outcome::Verified { .. } => summary.verified += 1,
                Outcome::NotFound => summary.not_found += 1,
                Outcome::TableUnavailable => summary.table_unavailable += 1,
            }
            if report.extraction_error.is_some() {
                summary.extraction_failed += 1;
            }
        }
        summary
    }
}

pub fn render_batch_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> io::Result<()> {
    writeln!(out, "集計: {}件", summary.total)?;
    writeln!(out, "  確認済み: {}", summary.verified)?;
    writeln!(out, "  該当なし: {}", summary.not_found)?;
    if summary.table_unavailable > 0 {
        writeln!(out, "  照合スキップ: {}", summary.table_unavailable)?;
    }
    if summary.extraction_failed > 0 {
        writeln!(out, "  OCR失敗: {}", summary.extraction_failed)?;
    }
    Ok(())
}

/// 参照表の概要
pub fn render_table_summary<W: Write>(
    out: &mut W,
    path: &Path,
    table: &ReferenceTable,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "path": path.display().to_string(),
                "rows": table.len(),
                "columns": table.columns(),
                "issues": table.issues(),
            });
            serde_json::to_writer_pretty(&mut *out, &value)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            writeln!(out, "証明書データベース:")?;
            writeln!(out, "  パス: {}", path.display())?;
            writeln!(out, "  件数: {}", table.len())?;
            writeln!(out, "  列: {}", table.columns().join(", "))?;
            if !table.issues().is_empty() {
                writeln!(out, "  問題: {}件", table.issues().len())?;
                for issue in table.issues() {
                    writeln!(out, "    - {}", issue)?;
                }
            }
            Ok(())
        }
    }
}
