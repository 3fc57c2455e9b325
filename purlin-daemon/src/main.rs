//! purlind -- SBOM enrichment daemon.
//!
//! Startup order: parse flags, initialize logging, resolve config
//! (environment overrides, required email), open the persistent cache
//! (fatal on failure), then serve until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use purlin_cache::SqliteCache;
use purlin_core::cache::Cache;
use purlin_daemon::cli::DaemonCli;
use purlin_daemon::config::DaemonConfig;
use purlin_daemon::{logging, metrics_server, server};
use purlin_enricher::Enricher;
use purlin_provider::{ClientOptions, EcosystemsClient};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    logging::init_tracing(&cli.log_format, cli.verbose)?;

    let config = match DaemonConfig::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            tracing::error!(
                "an operator email is required for catalog polite pool access; \
                 provide it via --email or the EMAIL environment variable"
            );
            std::process::exit(1);
        }
    };

    if let Some(metrics_port) = config.metrics_port {
        metrics_server::install_metrics_recorder(metrics_port)?;
    }

    let cache: Arc<dyn Cache> = match SqliteCache::open(&config.cache_path) {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            tracing::error!(path = %config.cache_path, error = %e, "failed to open cache database");
            std::process::exit(1);
        }
    };
    tracing::info!(path = %config.cache_path, "opened cache database");

    let provider = EcosystemsClient::new(ClientOptions {
        email: Some(config.email.clone()),
        ..Default::default()
    })
    .map_err(|e| anyhow::anyhow!("failed to build catalog client: {}", e))?;

    let engine = Enricher::new(Arc::new(provider), Some(Arc::clone(&cache)), config.cache_ttl);
    let state = Arc::new(server::AppState {
        engine,
        default_parallelism: config.parallelism,
    });
    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind HTTP listener")?;
    tracing::info!(addr = %addr, "starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Err(e) = cache.close() {
        tracing::error!(error = %e, "failed to close cache database");
    }

    tracing::info!("server stopped gracefully");
    Ok(())
}

/// Resolve when the daemon should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install interrupt handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received interrupt signal"),
        _ = terminate => tracing::info!("received terminate signal"),
    }
}
