//! CLI argument parsing using clap derive API
//!
//! This module is purely declarative with no side effects or I/O.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Enrich SBOM files with license information.
///
/// Reads a single SPDX or CycloneDX JSON document, fills in missing
/// license fields by looking each package up by its purl, and writes the
/// enriched document to stdout. Logs go to stderr.
///
/// This tool is designed for local, one-off enrichment with in-memory
/// caching. For high-volume or long-running use cases, see the `purlind`
/// daemon.
#[derive(Parser, Debug)]
#[command(name = "purlin", about, long_about = None)]
#[command(version = concat!("version ", env!("CARGO_PKG_VERSION")))]
pub struct Cli {
    /// Path to an SBOM file, or a directory containing exactly one .json file.
    pub path: PathBuf,

    /// Email for the catalog's polite pool (optional).
    #[arg(long)]
    pub email: Option<String>,

    /// Number of concurrent workers for enrichment.
    #[arg(long, default_value_t = 10)]
    pub parallel: usize,

    /// Timeout for the whole enrichment run (e.g. "30s", "5m").
    #[arg(long, default_value = "5m", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Verbose output (debug logging).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}
