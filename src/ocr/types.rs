//! OCR 型定義

use thiserror::Error;

/// テキスト抽出の失敗理由
///
/// `Ok(String::new())` は「何も読み取れなかった」、
/// `BackendUnavailable` は「OCRエンジンを起動できなかった」を表す。
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("画像をデコードできません: {0}")]
    Decode(String),

    #[error("画像の変換に失敗: {0}")]
    Encode(String),

    #[error("OCRエンジン `{binary}` を起動できません: {reason}")]
    BackendUnavailable { binary: String, reason: String },

    #[error("OCRエンジンが異常終了しました (code {code:?}): {stderr}")]
    BackendFailed { code: Option<i32>, stderr: String },

    #[error("OCR入出力エラー: {0}")]
    Io(#[from] std::io::Error),
}

/// テキスト抽出エンジン
#[allow(async_fn_in_trait)]
pub trait TextExtractor {
    /// ログ表示用の名前
    fn name(&self) -> &str;

    /// 画像バイト列からプレーンテキストを抽出
    async fn extract(&self, image: &[u8]) -> Result<String, ExtractionError>;
}

/// 画像の概要（表示用）
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImageSummary {
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl ImageSummary {
    /// デコードできない場合は None
    pub fn probe(bytes: &[u8]) -> Option<Self> {
        let format = image::guess_format(bytes).ok()?;
        let img = image::load_from_memory_with_format(bytes, format).ok()?;
        Some(Self {
            width: img.width(),
            height: img.height(),
            format: format!("{:?}", format).to_lowercase(),
        })
    }
}
