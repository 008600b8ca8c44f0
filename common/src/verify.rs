//! 証明書照合
//!
//! 抽出テキストに参照表のIDと氏名が両方含まれる最初の行を探す。
//! 編集距離などのあいまい一致は行わない。

use crate::record::CertificateRecord;
use crate::table::ReferenceTable;

/// 照合結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationResult<'a> {
    /// 一致したレコード
    pub matched: Option<&'a CertificateRecord>,
    /// 一致したレコードの表内位置（0始まり）
    pub position: Option<usize>,
}

impl<'a> VerificationResult<'a> {
    fn not_found() -> Self {
        Self {
            matched: None,
            position: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.matched.is_some()
    }

    /// (一致レコード | なし, 有効フラグ) に分解
    pub fn into_parts(self) -> (Option<&'a CertificateRecord>, bool) {
        let valid = self.is_valid();
        (self.matched, valid)
    }
}

/// 抽出テキストを参照表と照合
///
/// 表の順に走査し、最初に一致した行で打ち切る。
pub fn verify_certificate<'a>(
    extracted_text: &str,
    table: &'a ReferenceTable,
) -> VerificationResult<'a> {
    if table.is_empty() {
        return VerificationResult::not_found();
    }

    let lowered = extracted_text.to_lowercase();

    table
        .records()
        .iter()
        .enumerate()
        .find(|(_, record)| record.matches(extracted_text, &lowered))
        .map(|(position, record)| VerificationResult {
            matched: Some(record),
            position: Some(position),
        })
        .unwrap_or_else(VerificationResult::not_found)
}
