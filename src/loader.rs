//! 証明書データベース読み込み
//!
//! 起動時に一度だけ呼び出し、所有権を持つ `ReferenceTable` を返す。
//! CSV は共通ライブラリで、表計算ファイルは calamine で読み込む。

use crate::error::{CertVerifyError, Result};
use calamine::{open_workbook_auto, Reader};
use cert_verify_common::ReferenceTable;
use std::path::Path;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// 参照表を読み込み（失敗はエラーとして返す）
pub fn load_reference_table(path: &Path) -> Result<ReferenceTable> {
    if !path.is_file() {
        return Err(CertVerifyError::TableNotFound(path.display().to_string()));
    }

    let table = if is_spreadsheet(path) {
        load_spreadsheet(path)?
    } else {
        ReferenceTable::from_csv(path)?
    };

    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        issues = table.issues().len(),
        "証明書データベース読み込み完了"
    );

    Ok(table)
}

/// 参照表を読み込み（失敗時は報告して空の表を返す）
pub fn load_or_empty(path: &Path) -> ReferenceTable {
    match load_reference_table(path) {
        Ok(table) => {
            for issue in table.issues() {
                tracing::warn!(line = issue.line, "{}", issue);
                eprintln!("⚠ {}: {}", path.display(), issue);
            }
            table
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "証明書データベース読み込み失敗");
            eprintln!("❌ {}", e);
            ReferenceTable::empty()
        }
    }
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SPREADSHEET_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 先頭シートの1行目をヘッダーとして読み込み
fn load_spreadsheet(path: &Path) -> Result<ReferenceTable> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| CertVerifyError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CertVerifyError::Spreadsheet("シートがありません".into()))?
        .map_err(|e| CertVerifyError::Spreadsheet(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

    let header = rows.next().ok_or(cert_verify_common::Error::MissingHeader)?;
    let table = ReferenceTable::from_rows(header, rows.collect())?;
    Ok(table)
}
