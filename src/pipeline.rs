//! アップロード1件分の処理
//!
//! 画像 → テキスト抽出 → 照合 → レポート。
//! 抽出に失敗しても空テキストとして照合まで進め、必ずレポートを返す。

use crate::ocr::{ImageSummary, TextExtractor};
use crate::upload::Upload;
use cert_verify_common::{verify_certificate, CertificateRecord, ReferenceTable};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// 照合の結末
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// 一致するレコードあり
    Verified { record: CertificateRecord },
    /// 一致なし（エラーではない）
    NotFound,
    /// 参照表が空のため照合せず
    TableUnavailable,
}

impl Outcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Outcome::Verified { .. })
    }
}

/// アップロード1件の結果
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub file_name: String,
    pub image_sha256: String,
    pub image: Option<ImageSummary>,
    pub extracted_text: String,
    pub extraction_error: Option<String>,
    pub outcome: Outcome,
    pub checked_at: String,
}

/// 抽出済みテキストを照合
pub fn check_text(table: &ReferenceTable, text: &str) -> Outcome {
    if table.is_empty() {
        tracing::warn!("証明書データベースが空のため照合をスキップ");
        return Outcome::TableUnavailable;
    }

    let result = verify_certificate(text, table);
    match result.matched {
        Some(record) => {
            tracing::info!(
                certificate_id = record.certificate_id(),
                position = result.position,
                "証明書一致"
            );
            Outcome::Verified {
                record: record.clone(),
            }
        }
        None => {
            tracing::info!(rows = table.len(), "一致する証明書なし");
            Outcome::NotFound
        }
    }
}

/// アップロード1件を処理
pub async fn process_upload<E: TextExtractor>(
    table: &ReferenceTable,
    extractor: &E,
    upload: &Upload,
) -> UploadReport {
    let image = ImageSummary::probe(&upload.bytes);

    let spinner = extraction_spinner(&upload.file_name);
    let extraction = extractor.extract(&upload.bytes).await;
    spinner.finish_and_clear();

    let (extracted_text, extraction_error) = match extraction {
        Ok(text) => (text, None),
        Err(e) => {
            tracing::warn!(
                file = %upload.file_name,
                engine = extractor.name(),
                error = %e,
                "テキスト抽出失敗、空テキストとして照合"
            );
            (String::new(), Some(e.to_string()))
        }
    };

    let outcome = check_text(table, &extracted_text);

    UploadReport {
        file_name: upload.file_name.clone(),
        image_sha256: upload.sha256.clone(),
        image,
        extracted_text,
        extraction_error,
        outcome,
        checked_at: chrono::Local::now().to_rfc3339(),
    }
}

fn extraction_spinner(file_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("OCRでテキストを抽出中... {}", file_name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
