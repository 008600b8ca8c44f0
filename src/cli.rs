use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cert-verify", version)]
#[command(about = "証明書画像をOCRで読み取り、証明書データベースと照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（-v, -vv, -vvv）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 設定ファイル（デフォルト: ~/.config/cert-verify/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 証明書データベース CSV/XLSX（設定より優先）
    #[arg(short, long, global = true)]
    pub table: Option<PathBuf>,

    /// 出力形式 (text/json)
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 証明書画像を1枚照合
    Verify {
        /// 証明書画像（JPG/JPEG/PNG）
        #[arg(required = true)]
        image: PathBuf,
    },

    /// フォルダ内の証明書画像をまとめて照合
    Batch {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 抽出済みテキストを照合（OCRなし）
    Check {
        /// テキストファイル（省略時は標準入力）
        file: Option<PathBuf>,

        /// テキストを直接指定
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
    },

    /// 対話的に画像パスを入力して照合
    Session,

    /// 証明書データベースの内容を確認
    Table,

    /// 設定を表示/編集
    Config {
        /// 証明書データベースのパスを設定
        #[arg(long)]
        set_table: Option<PathBuf>,

        /// OCR言語を設定（例: eng, eng+jpn）
        #[arg(long)]
        set_lang: Option<String>,

        /// tesseract 実行ファイルを設定
        #[arg(long)]
        set_tesseract: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
