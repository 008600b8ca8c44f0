//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: header row is missing")]
    MissingHeader,

    #[error("Table error: required column `{0}` is missing")]
    MissingColumn(&'static str),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
