//! octview-web - Retina image review tool
//!
//! Web UI for browsing diagnosis-labelled retina images, recording
//! reviewer answers to AI-extracted clinical feature questions, and
//! inspecting the review state through admin views.

use anyhow::Result;
use clap::Parser;
use octview_common::config::{DataRoot, DataRootResolver, DEFAULT_PORT};
use octview_common::db::init::init_database;
use octview_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "octview-web", about = "Retina image review web tool")]
struct Args {
    /// Data root holding the database, JSON indexes and downloaded images
    #[arg(long, env = "OCTVIEW_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// TCP port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting octview-web v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let resolver = DataRootResolver::new(args.data_root);
    let data_root = DataRoot::new(resolver.resolve());
    data_root.ensure_exists()?;

    let db_path = data_root.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path).await?;

    let diagnosis = octview_web::services::DiagnosisIndex::load(
        &data_root.diagnosis_file(),
        &data_root.features_file(),
    );
    let images = octview_web::services::ImageLibrary::new(data_root.images_dir());

    let state = AppState::new(pool, diagnosis, images);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("octview-web listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
