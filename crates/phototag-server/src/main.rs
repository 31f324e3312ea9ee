//! phototag-server - HTTP API for the photo geotagging session

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use phototag_app::{AppConfig, ElevationService, GeocodingService, Session};
use phototag_server::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "phototag-server", about = "Photo geotagging and metadata reconciliation server")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8420, env = "PHOTOTAG_PORT")]
    port: u16,

    /// Config file path (defaults to the user config directory)
    #[arg(long, env = "PHOTOTAG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("starting phototag-server v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load(&config_path)?;
    info!("configuration file: {}", config_path.display());

    let state = AppState::new(
        Session::new(config),
        config_path,
        GeocodingService::new()?,
        ElevationService::new()?,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("phototag-server listening on http://127.0.0.1:{}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
