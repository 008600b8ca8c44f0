//! フォルダ一括照合
//!
//! 画像を1枚ずつ順番に処理する（並列化しない）。

use crate::ocr::TextExtractor;
use crate::pipeline::{process_upload, UploadReport};
use crate::upload::Upload;
use cert_verify_common::ReferenceTable;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// 画像を順に照合
///
/// 読み込めない画像は警告を出してスキップする。
pub async fn verify_images<E: TextExtractor>(
    table: &ReferenceTable,
    extractor: &E,
    images: &[PathBuf],
) -> Vec<UploadReport> {
    let progress = ProgressBar::new(images.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{bar:30}] {pos}/{len} {msg}") {
        progress.set_style(style.progress_chars("=> "));
    }

    let mut reports = Vec::with_capacity(images.len());

    for path in images {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        progress.set_message(file_name);

        match Upload::from_path(path) {
            Ok(upload) => reports.push(process_upload(table, extractor, &upload).await),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "画像をスキップ");
                progress.suspend(|| eprintln!("⚠ スキップ: {}", e));
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    reports
}
