//! 証明書レコードの型定義
//!
//! - CellValue: 表の1セル（文字列・整数・小数・空）
//! - CertificateRecord: 参照表の1行（列順を保持）

use serde::ser::{Serialize, SerializeMap, Serializer};

/// 証明書IDの列名
pub const ID_COLUMN: &str = "certificate_id";
/// 氏名の列名
pub const NAME_COLUMN: &str = "name";

/// 表の1セル
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Empty,
}

impl CellValue {
    /// 生テキストから型を推定
    ///
    /// 先頭ゼロ付きの数字（`007` など）は書式を保つため文字列のまま扱う。
    pub fn infer(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Empty;
        }

        if has_significant_leading_zero(s) {
            return CellValue::Text(s.to_string());
        }

        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }

        // i64 に収まらない整数や桁の多い小数は、丸めずに文字列のまま返す
        if is_integer_literal(s) || significant_digits(s) > MAX_FLOAT_DIGITS {
            return CellValue::Text(s.to_string());
        }

        if s.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(f) = s.parse::<f64>() {
                if f.is_finite() {
                    return CellValue::Float(f);
                }
            }
        }

        CellValue::Text(s.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Empty => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Empty => serializer.serialize_unit(),
        }
    }
}

/// f64 で桁落ちせずに表せる10進の有効桁数
const MAX_FLOAT_DIGITS: usize = 15;

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// 仮数部の有効桁数（先頭ゼロを除く）
fn significant_digits(s: &str) -> usize {
    let mantissa = s.split(&['e', 'E'][..]).next().unwrap_or(s);
    mantissa
        .chars()
        .filter(|c| c.is_ascii_digit())
        .skip_while(|&c| c == '0')
        .count()
}

fn has_significant_leading_zero(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.")
}

/// 参照表の1行
///
/// 照合に使う `certificate_id` と `name` は生テキストのまま保持し、
/// その他の列（学籍番号・点数・機関・課程など）は列順どおりに持ち回る。
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateRecord {
    certificate_id: String,
    name: String,
    name_lower: String,
    fields: Vec<(String, CellValue)>,
}

impl CertificateRecord {
    /// 列名とセルのペアから作成
    ///
    /// `certificate_id` / `name` 列が無い場合は空文字列として扱う。
    /// 空のID・氏名を弾くのは読み込み側の責務。
    pub fn from_cells(header: &[String], cells: &[String]) -> Self {
        let mut certificate_id = String::new();
        let mut name = String::new();
        let mut fields = Vec::with_capacity(header.len());

        for (i, column) in header.iter().enumerate() {
            let raw = cells.get(i).map(|s| s.trim()).unwrap_or("");
            if column == ID_COLUMN {
                certificate_id = raw.to_string();
            } else if column == NAME_COLUMN {
                name = raw.to_string();
            }
            fields.push((column.clone(), CellValue::infer(raw)));
        }

        let name_lower = name.to_lowercase();
        Self {
            certificate_id,
            name,
            name_lower,
            fields,
        }
    }

    pub fn certificate_id(&self) -> &str {
        &self.certificate_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 列名でセルを取得
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// 全列（列順）
    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    /// 抽出テキストにこのレコードが含まれるか
    ///
    /// IDは大文字小文字を区別した部分一致、氏名は両方を小文字化した部分一致。
    /// `lowered_text` は `text.to_lowercase()` を呼び出し側で一度だけ計算したもの。
    pub fn matches(&self, text: &str, lowered_text: &str) -> bool {
        text.contains(self.certificate_id.as_str()) && lowered_text.contains(self.name_lower.as_str())
    }

    /// 列順を保ったJSON文字列
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for CertificateRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
