//! faceflow - demo photo-organization server.
//!
//! Stores albums and photos in memory, clusters photos by embedding
//! similarity and creates share bundles over a JSON HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use faceflow_server::{serve, Config, Service};
use faceflow_store::MemoryRepository;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Demo photo-organization server.
#[derive(Parser, Debug)]
#[command(name = "faceflow")]
#[command(about = "Demo photo-organization server with embedding clustering")]
#[command(version)]
struct Args {
    /// Config file (YAML). Missing file means defaults.
    #[arg(long, default_value = "faceflow.yaml")]
    config: PathBuf,

    /// Listen address, overrides the config (e.g. :8080, 127.0.0.1:9000)
    #[arg(short, long)]
    listen: Option<String>,

    /// Similarity threshold in (0, 1], overrides the config
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut cfg = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(listen) = args.listen {
        cfg.listen = listen;
    }
    if let Some(threshold) = args.threshold {
        cfg.similarity_threshold = threshold;
    }
    cfg.validate()?;

    info!(
        threshold = cfg.similarity_threshold,
        share_base_url = %cfg.share_base_url,
        "starting faceflow"
    );

    let addr = cfg.socket_addr()?;
    let service = Arc::new(Service::new(Arc::new(MemoryRepository::new()), &cfg));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    serve(listener, service).await?;
    Ok(())
}
