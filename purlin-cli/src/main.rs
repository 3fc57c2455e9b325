//! purlin -- Command-line SBOM license enrichment
//!
//! Reads one SBOM document, enriches missing license fields by purl
//! lookup against the ecosyste.ms catalog, and writes the result to
//! stdout. Lookups are cached in memory for the duration of the run.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod discover;
mod error;

use cli::Cli;
use error::CliError;

use purlin_cache::MemoryCache;
use purlin_core::cache::Cache;
use purlin_enricher::{EnrichOptions, Enricher};
use purlin_provider::{ClientOptions, EcosystemsClient};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so the enriched document on stdout stays clean.
    // Structured JSON would be noisy for interactive use, so we use the
    // compact format.
    let default_level = if cli.verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received interrupt, cancelling operation");
            std::process::exit(3);
        }
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::error!(error = %e, "enrichment failed");
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let sbom_path = discover::resolve_sbom_path(&cli.path)?;
    let sbom = std::fs::read(&sbom_path).map_err(|e| CliError::ReadInput {
        path: sbom_path.display().to_string(),
        source: e,
    })?;

    // One-off runs use the in-memory cache; nothing persists across runs,
    // so entries never need a TTL.
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    tracing::debug!("using in-memory cache");

    let provider = EcosystemsClient::new(ClientOptions {
        email: cli.email.clone(),
        ..Default::default()
    })
    .map_err(|e| CliError::Core(e.into()))?;

    let engine = Enricher::new(Arc::new(provider), Some(cache), None);

    tracing::debug!(
        path = %sbom_path.display(),
        parallel = cli.parallel,
        timeout = ?cli.timeout,
        "enriching SBOM"
    );

    // The deadline turns the run-level timeout into a soft cancellation:
    // lookups past the deadline are abandoned and the document is
    // marshalled with whatever completed in time.
    let enriched = engine
        .enrich(EnrichOptions {
            sbom,
            parallelism: cli.parallel,
            deadline: Some(Instant::now() + cli.timeout),
        })
        .await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&enriched).map_err(CliError::WriteOutput)?;
    stdout.flush().map_err(CliError::WriteOutput)?;

    Ok(())
}
