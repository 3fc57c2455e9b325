//! CLI argument definitions for purlind.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.
//! `PORT`, `CACHE_PATH`, and `EMAIL` environment variables override their
//! corresponding flags during config resolution (see `config`).

use std::time::Duration;

use clap::Parser;

/// Purlin SBOM enrichment daemon.
///
/// Serves a single enrichment endpoint plus a liveness probe, backed by
/// a persistent on-disk license cache.
#[derive(Parser, Debug)]
#[command(name = "purlind")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Path to the cache database file.
    #[arg(long, default_value = "./data/cache.db")]
    pub cache_path: String,

    /// Default number of concurrent workers for enrichment.
    #[arg(long, default_value_t = 20)]
    pub parallel: usize,

    /// Cache TTL for enrichment results (e.g. "24h"; "0s" = never expire).
    #[arg(long, default_value = "0s", value_parser = parse_duration)]
    pub cache_ttl: Duration,

    /// Email for the catalog's polite pool (required, also via EMAIL).
    #[arg(long)]
    pub email: Option<String>,

    /// Expose Prometheus metrics on this port (disabled when absent).
    #[arg(long)]
    pub metrics_port: Option<u16>,

    /// Log format (json, pretty).
    #[arg(long, default_value = "json")]
    pub log_format: String,

    /// Verbose output (debug logging).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn parse_with_defaults() {
        let cli = DaemonCli::try_parse_from(["purlind"]).expect("parse succeeded");
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.cache_path, "./data/cache.db");
        assert_eq!(cli.parallel, 20);
        assert_eq!(cli.cache_ttl, Duration::ZERO);
        assert_eq!(cli.email, None);
        assert_eq!(cli.metrics_port, None);
        assert_eq!(cli.log_format, "json");
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_with_overrides() {
        let cli = DaemonCli::try_parse_from([
            "purlind",
            "--port",
            "9090",
            "--cache-path",
            "/var/lib/purlin/cache.db",
            "--parallel",
            "8",
            "--cache-ttl",
            "24h",
            "--email",
            "ops@example.com",
            "--metrics-port",
            "9100",
            "--log-format",
            "pretty",
            "-v",
        ])
        .expect("parse succeeded");

        assert_eq!(cli.port, 9090);
        assert_eq!(cli.cache_path, "/var/lib/purlin/cache.db");
        assert_eq!(cli.parallel, 8);
        assert_eq!(cli.cache_ttl, Duration::from_secs(86400));
        assert_eq!(cli.email.as_deref(), Some("ops@example.com"));
        assert_eq!(cli.metrics_port, Some(9100));
        assert_eq!(cli.log_format, "pretty");
        assert!(cli.verbose);
    }

    #[test]
    fn invalid_cache_ttl_fails() {
        let result = DaemonCli::try_parse_from(["purlind", "--cache-ttl", "bogus"]);
        assert!(result.is_err());
    }

    #[test]
    fn verify_command_structure() {
        DaemonCli::command().debug_assert();
    }
}
