//! Bulk-download sampled dataset images into per-diagnosis directories
//!
//! Each record's `hf_image` is either an http(s) URL (downloaded) or a
//! filesystem path (copied, optionally remapped with --strip-prefix).
//! Output layout is `<output>/<diagnosis_with_underscores>/<basename>`,
//! which is exactly what the web app's image library lists.

use anyhow::{Context, Result};
use clap::Parser;
use octview_tools::{basename, read_records};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "download-images", about = "Download sampled dataset images")]
struct Args {
    /// Sampled dataset JSON (from sample-dataset)
    #[arg(long)]
    input: PathBuf,

    /// Directory to download into
    #[arg(long, default_value = "downloaded_images")]
    output: PathBuf,

    /// Prefix to strip from absolute source paths before resolving them
    /// relative to the current directory
    #[arg(long)]
    strip_prefix: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let records = read_records(&args.input)?;
    info!("Fetching images for {} records", records.len());

    let client = reqwest::Client::new();
    let mut downloaded = 0usize;
    let mut failed = 0usize;

    for record in &records {
        let diagnosis = record
            .get("sampled_diagnosis")
            .or_else(|| record.get("revised_answer_final"))
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown");
        let source = record
            .get("hf_image")
            .or_else(|| record.get("image"))
            .and_then(|v| v.as_str())
            .unwrap_or("");

        if source.is_empty() {
            warn!("{}: record has no image path", diagnosis);
            failed += 1;
            continue;
        }

        let dir = args.output.join(diagnosis.replace(' ', "_"));
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Failed to create {}: {}", dir.display(), e);
            failed += 1;
            continue;
        }
        let target = dir.join(basename(source));

        let result = if source.starts_with("http://") || source.starts_with("https://") {
            fetch_url(&client, source, &target).await
        } else {
            copy_local(source, &target, args.strip_prefix.as_deref())
        };

        match result {
            Ok(()) => {
                info!("{} -> {}", source, target.display());
                downloaded += 1;
            }
            Err(e) => {
                warn!("{}: {}", source, e);
                failed += 1;
            }
        }
    }

    info!("Done: {} fetched, {} failed", downloaded, failed);
    Ok(())
}

async fn fetch_url(client: &reqwest::Client, url: &str, target: &Path) -> Result<()> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    std::fs::write(target, &bytes)?;
    Ok(())
}

fn copy_local(source: &str, target: &Path, strip_prefix: Option<&str>) -> Result<()> {
    let resolved = match strip_prefix {
        Some(prefix) if source.starts_with(prefix) => {
            PathBuf::from(source.trim_start_matches(prefix).trim_start_matches('/'))
        }
        _ => PathBuf::from(source),
    };

    if !resolved.exists() {
        anyhow::bail!("source file not found: {}", resolved.display());
    }
    std::fs::copy(&resolved, target)?;
    Ok(())
}
