pub mod cli;
pub mod config;
pub mod datastore;
pub mod error;
pub mod routes;

use std::ffi::OsString;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::datastore::TaskStore;

#[tracing::instrument(skip_all)]
pub async fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::ServerCli::parse_from(raw_args);
    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting TaskNest server"
    );

    let mut cfg = ServerConfig::load(cli.config.as_deref())?;
    cfg.apply_env(std::env::vars())?;
    cfg.apply_cli(&cli);
    debug!(?cfg, "effective configuration");

    let store = open_store(&cfg)?;
    let app = build_app(&cfg, Arc::new(store))?;

    let listener = TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind))?;
    info!(addr = %listener.local_addr()?, "task API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated abnormally")?;

    info!("server stopped");
    Ok(())
}

pub fn open_store(cfg: &ServerConfig) -> anyhow::Result<TaskStore> {
    match cfg.data_file.as_deref() {
        Some(path) => TaskStore::open(path)
            .with_context(|| format!("failed to open task store at {}", path.display())),
        None => {
            warn!("no data file configured; tasks are kept in memory only");
            Ok(TaskStore::in_memory())
        }
    }
}

/// Routes plus the CORS and request tracing layers.
pub fn build_app(cfg: &ServerConfig, store: Arc<TaskStore>) -> anyhow::Result<Router> {
    Ok(routes::router(store)
        .layer(cors_layer(&cfg.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim())
                    .with_context(|| format!("invalid CORS origin {origin:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
