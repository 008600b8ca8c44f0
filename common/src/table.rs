//! 証明書参照表モジュール
//!
//! CSV（または表計算ファイルから取り出した行）を読み込み、
//! 照合に使う読み取り専用の参照表を構築する。

use crate::error::{Error, Result};
use crate::record::{CertificateRecord, ID_COLUMN, NAME_COLUMN};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// 必須列
pub const REQUIRED_COLUMNS: [&str; 2] = [ID_COLUMN, NAME_COLUMN];

/// 読み込み時に見つかった問題の種類
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IssueKind {
    /// IDが空（行は除外）
    EmptyIdentifier,
    /// 氏名が空（行は除外）
    EmptyName,
    /// IDの重複（行は保持、先に出現した行が照合で優先される）
    DuplicateIdentifier { first_line: usize },
}

/// 読み込み時の問題（行番号は1始まり、ヘッダーが1行目）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableIssue {
    pub line: usize,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl std::fmt::Display for TableIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            IssueKind::EmptyIdentifier => {
                write!(f, "{}行目: certificate_id が空のため除外しました", self.line)
            }
            IssueKind::EmptyName => write!(f, "{}行目: name が空のため除外しました", self.line),
            IssueKind::DuplicateIdentifier { first_line } => write!(
                f,
                "{}行目: certificate_id が{}行目と重複しています（先の行が優先）",
                self.line, first_line
            ),
        }
    }
}

/// 参照表
///
/// 起動時に一度だけ構築し、以降は `&ReferenceTable` で共有する。
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    columns: Vec<String>,
    records: Vec<CertificateRecord>,
    issues: Vec<TableIssue>,
}

impl ReferenceTable {
    /// 空の参照表
    pub fn empty() -> Self {
        Self::default()
    }

    /// CSVファイルから読み込み
    pub fn from_csv(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content)
    }

    /// CSV文字列から読み込み
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut records = split_csv_records(content).into_iter();

        let (_, header_record) = records.next().ok_or(Error::MissingHeader)?;
        let header = parse_csv_line(&header_record);

        let rows = records.map(|(line, record)| (line, parse_csv_line(&record)));
        Self::build(header, rows)
    }

    /// ヘッダー行とデータ行から構築（表計算ファイル用）
    ///
    /// データ行の行番号はヘッダーを1行目として数える。
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let rows = rows
            .into_iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|(idx, cells)| (idx + 2, cells));
        Self::build(header, rows)
    }

    fn build(
        header: Vec<String>,
        rows: impl Iterator<Item = (usize, Vec<String>)>,
    ) -> Result<Self> {
        let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_string()).collect();

        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                return Err(Error::MissingColumn(required));
            }
        }

        let mut records = Vec::new();
        let mut issues = Vec::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for (line, cells) in rows {
            let record = CertificateRecord::from_cells(&columns, &cells);

            if record.certificate_id().is_empty() {
                issues.push(TableIssue { line, kind: IssueKind::EmptyIdentifier });
                continue;
            }
            if record.name().is_empty() {
                issues.push(TableIssue { line, kind: IssueKind::EmptyName });
                continue;
            }

            match first_seen.get(record.certificate_id()) {
                Some(&first_line) => {
                    issues.push(TableIssue {
                        line,
                        kind: IssueKind::DuplicateIdentifier { first_line },
                    });
                }
                None => {
                    first_seen.insert(record.certificate_id().to_string(), line);
                }
            }

            records.push(record);
        }

        Ok(Self {
            columns,
            records,
            issues,
        })
    }

    /// 列名（ファイルの列順）
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 全レコード（ファイルの行順）
    pub fn records(&self) -> &[CertificateRecord] {
        &self.records
    }

    /// 読み込み時の問題
    pub fn issues(&self) -> &[TableIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// CSVをレコード単位に分割
///
/// クォート内の改行はフィールドの一部として扱う。行番号はレコードが始まる物理行（1始まり）。
/// 空行は読み飛ばし、CRLF は LF に揃える。
fn split_csv_records(content: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut record = String::new();
    let mut line = 1;
    let mut start_line = 1;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                record.push(c);
                if chars.peek() == Some(&'"') {
                    record.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_field_start => {
                record.push(c);
                in_quotes = true;
                at_field_start = false;
            }
            ',' if !in_quotes => {
                record.push(c);
                at_field_start = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                if in_quotes {
                    record.push(c);
                } else {
                    push_record(&mut records, start_line, &mut record);
                    start_line = line;
                    at_field_start = true;
                }
            }
            _ => {
                if !c.is_whitespace() {
                    at_field_start = false;
                }
                record.push(c);
            }
        }
    }

    push_record(&mut records, start_line, &mut record);
    records
}

fn push_record(records: &mut Vec<(usize, String)>, line: usize, record: &mut String) {
    let value = std::mem::take(record);
    if !value.trim().is_empty() {
        records.push((line, value));
    }
}

/// CSV行をパース（ダブルクォート・`""` エスケープ対応）
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() && !quoted => {
                field.clear();
                in_quotes = true;
                quoted = true;
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&mut field, quoted));
                quoted = false;
            }
            _ => field.push(c),
        }
    }

    fields.push(finish_field(&mut field, quoted));
    fields
}

fn finish_field(field: &mut String, quoted: bool) -> String {
    let value = std::mem::take(field);
    if quoted {
        // クォート内の空白は保持し、閉じクォート後の空白だけ落とす
        value.trim_end().to_string()
    } else {
        value.trim().to_string()
    }
}
