use crate::error::{CertVerifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 既定の証明書データベース
pub const DEFAULT_TABLE_PATH: &str = "data/certificates.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table_path: PathBuf,
    pub tesseract: TesseractConfig,
}

/// tesseract CLI 設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// 実行ファイル（未設定なら PATH 上の `tesseract`）
    pub binary_path: Option<String>,
    pub lang: Option<String>,
    /// ページ分割モード
    pub psm: Option<u8>,
    /// OCRエンジンモード
    pub oem: Option<u8>,
    /// TESSDATA_PREFIX に渡すディレクトリ
    pub tessdata_path: Option<PathBuf>,
}

impl TesseractConfig {
    pub fn binary_or_default(&self) -> &str {
        self.binary_path.as_deref().unwrap_or("tesseract")
    }

    pub fn lang_or_default(&self) -> &str {
        self.lang.as_deref().unwrap_or("eng")
    }

    pub fn psm_or_default(&self) -> u8 {
        self.psm.unwrap_or(3)
    }

    pub fn oem_or_default(&self) -> u8 {
        self.oem.unwrap_or(3)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            tesseract: TesseractConfig::default(),
        }
    }
}

impl Config {
    /// 設定を読み込み（ファイルが無ければ既定値）
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CertVerifyError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cert-verify").join("config.json"))
    }
}
