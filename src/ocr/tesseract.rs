//! Tesseract OCR（CLI ラッパー）
//!
//! 画像をPNGに変換して `tesseract stdin stdout` にパイプで渡し、
//! 標準出力をそのまま抽出テキストとして返す。

use std::io::Cursor;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::types::{ExtractionError, TextExtractor};
use crate::config::TesseractConfig;

pub struct TesseractCli {
    config: TesseractConfig,
}

impl TesseractCli {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.config.binary_or_default());
        cmd.arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(self.config.lang_or_default())
            .arg("--psm")
            .arg(self.config.psm_or_default().to_string())
            .arg("--oem")
            .arg(self.config.oem_or_default().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(tessdata) = &self.config.tessdata_path {
            cmd.env("TESSDATA_PREFIX", tessdata);
        }

        cmd
    }
}

impl TextExtractor for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn extract(&self, image: &[u8]) -> Result<String, ExtractionError> {
        let start = Instant::now();
        let png = to_png(image)?;

        tracing::debug!(
            binary = self.config.binary_or_default(),
            lang = self.config.lang_or_default(),
            psm = self.config.psm_or_default(),
            oem = self.config.oem_or_default(),
            bytes = png.len(),
            "tesseract 実行"
        );

        let mut child = self.command().spawn().map_err(|e| {
            ExtractionError::BackendUnavailable {
                binary: self.config.binary_or_default().to_string(),
                reason: e.to_string(),
            }
        })?;

        // 入力前に終了した場合（言語データ不足など）は BrokenPipe より終了コードと stderr を報告
        let written = match child.stdin.take() {
            Some(mut stdin) => match stdin.write_all(&png).await {
                Ok(()) => stdin.shutdown().await,
                Err(e) => Err(e),
            },
            None => Ok(()),
        };

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(ExtractionError::BackendFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        let text = String::from_utf8_lossy(&output.stdout).to_string();

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = text.chars().count(),
            "tesseract 完了"
        );

        Ok(text)
    }
}

/// 任意形式の画像をPNGに変換
fn to_png(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let img = image::load_from_memory(bytes).map_err(|e| ExtractionError::Decode(e.to_string()))?;

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ExtractionError::Encode(e.to_string()))?;
    Ok(png)
}

/// tesseract のバージョン（`--version` の1行目）
pub async fn probe_version(binary: &str) -> Result<String, ExtractionError> {
    let output = Command::new(binary)
        .arg("--version")
        .output()
        .await
        .map_err(|e| ExtractionError::BackendUnavailable {
            binary: binary.to_string(),
            reason: e.to_string(),
        })?;

    // 古い版は stderr にバージョンを出す
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stdout.trim().is_empty() { stderr } else { stdout };

    text.lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| ExtractionError::BackendFailed {
            code: output.status.code(),
            stderr: "バージョン情報を取得できません".into(),
        })
}
