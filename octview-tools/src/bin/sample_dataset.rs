//! Sample N records per diagnosis label from the raw dataset JSON
//!
//! Produces the `sampled_by_diagnosis.json` document the web app and the
//! other tools consume.

use anyhow::Result;
use clap::Parser;
use octview_tools::{read_records, sample_per_diagnosis, write_records};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sample-dataset", about = "Sample dataset records per diagnosis label")]
struct Args {
    /// Raw dataset JSON array
    #[arg(long)]
    input: PathBuf,

    /// Output path for the sampled records
    #[arg(long, default_value = "sampled_by_diagnosis.json")]
    output: PathBuf,

    /// Records to keep per diagnosis label
    #[arg(long, default_value_t = 5)]
    per_diagnosis: usize,

    /// Only sample these labels (repeatable); all labels when omitted
    #[arg(long = "diagnosis")]
    diagnoses: Vec<String>,

    /// RNG seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let records = read_records(&args.input)?;
    info!("Read {} records from {}", records.len(), args.input.display());

    let targets = if args.diagnoses.is_empty() {
        None
    } else {
        Some(args.diagnoses.as_slice())
    };
    let sampled = sample_per_diagnosis(&records, args.per_diagnosis, targets, args.seed);

    write_records(&args.output, &sampled)?;
    info!("Wrote {} sampled records to {}", sampled.len(), args.output.display());

    Ok(())
}
