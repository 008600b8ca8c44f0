use cert_verify::{batch, cli, config, error, loader, ocr, pipeline, render, session, upload};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::io::{Read, Write};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    let table_path = cli.table.clone().unwrap_or_else(|| config.table_path.clone());
    let format = cli.format;

    match cli.command {
        Commands::Verify { image } => {
            let upload = upload::Upload::from_path(&image)?;
            let table = loader::load_or_empty(&table_path);
            let extractor = ocr::TesseractCli::new(config.tesseract.clone());

            let report = pipeline::process_upload(&table, &extractor, &upload).await;
            render::render_report(&mut std::io::stdout().lock(), &report, format)?;
        }

        Commands::Batch { folder, recursive } => {
            let images = upload::scan_folder(&folder, recursive)?;
            if images.is_empty() {
                return Err(error::CertVerifyError::NoImagesFound(folder.display().to_string()));
            }
            eprintln!("✔ {}枚の証明書画像を検出", images.len());

            let table = loader::load_or_empty(&table_path);
            let extractor = ocr::TesseractCli::new(config.tesseract.clone());
            let reports = batch::verify_images(&table, &extractor, &images).await;
            let summary = render::BatchSummary::from_reports(&reports);

            let mut out = std::io::stdout().lock();
            match format {
                cli::OutputFormat::Json => {
                    let value = serde_json::json!({ "reports": reports, "summary": summary });
                    serde_json::to_writer_pretty(&mut out, &value)?;
                    writeln!(out)?;
                }
                cli::OutputFormat::Text => {
                    for report in &reports {
                        render::render_report(&mut out, report, format)?;
                        writeln!(out)?;
                    }
                    render::render_batch_summary(&mut out, &summary)?;
                }
            }
        }

        Commands::Check { file, text } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => {
                    if !path.is_file() {
                        return Err(error::CertVerifyError::FileNotFound(path.display().to_string()));
                    }
                    std::fs::read_to_string(&path)?
                }
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let table = loader::load_or_empty(&table_path);
            let outcome = pipeline::check_text(&table, &text);
            render::render_outcome(&mut std::io::stdout().lock(), &outcome, format)?;
        }

        Commands::Session => {
            let table = loader::load_or_empty(&table_path);
            let extractor = ocr::TesseractCli::new(config.tesseract.clone());
            session::run_interactive_session(&table, &extractor, format).await?;
        }

        Commands::Table => {
            let table = loader::load_or_empty(&table_path);
            render::render_table_summary(&mut std::io::stdout().lock(), &table_path, &table, format)?;
        }

        Commands::Config { set_table, set_lang, set_tesseract, show } => {
            let mut changed = false;

            if let Some(path) = set_table {
                config.table_path = path;
                changed = true;
            }
            if let Some(lang) = set_lang {
                config.tesseract.lang = Some(lang);
                changed = true;
            }
            if let Some(binary) = set_tesseract {
                config.tesseract.binary_path = Some(binary);
                changed = true;
            }

            if changed {
                let saved = config.save(cli.config.as_deref())?;
                println!("✔ 設定を保存しました: {}", saved.display());
            }

            if show || !changed {
                show_config(&config, cli.config).await?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn show_config(config: &Config, override_path: Option<PathBuf>) -> Result<()> {
    let path = match override_path {
        Some(p) => p,
        None => Config::config_path()?,
    };
    let binary = config.tesseract.binary_or_default();

    println!("設定:");
    println!("  設定ファイル: {}", path.display());
    println!("  証明書データベース: {}", config.table_path.display());
    println!("  tesseract: {}", binary);
    match ocr::probe_version(binary).await {
        Ok(version) => println!("    バージョン: {}", version),
        Err(e) => println!("    ⚠ {}", e),
    }
    println!("  OCR言語: {}", config.tesseract.lang_or_default());
    println!("  PSM: {}", config.tesseract.psm_or_default());
    println!("  OEM: {}", config.tesseract.oem_or_default());
    if let Some(tessdata) = &config.tesseract.tessdata_path {
        println!("  TESSDATA_PREFIX: {}", tessdata.display());
    }
    Ok(())
}
