//! Daemon configuration resolution.
//!
//! Flags provide defaults; the `PORT`, `CACHE_PATH`, and `EMAIL`
//! environment variables override them. A `PORT` value that fails to
//! parse falls back silently to the flag value. An operator email is
//! required — the catalog's polite pool expects daemon-scale clients to
//! identify themselves.

use std::time::Duration;

use purlin_core::error::ConfigError;

use crate::cli::DaemonCli;

/// Effective daemon configuration after flag + environment resolution.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub port: u16,
    pub cache_path: String,
    pub parallelism: usize,
    /// `None` means cached entries never expire.
    pub cache_ttl: Option<Duration>,
    pub email: String,
    pub metrics_port: Option<u16>,
    pub log_format: String,
    pub verbose: bool,
}

impl DaemonConfig {
    /// Resolve configuration from parsed flags and the process environment.
    pub fn from_cli(cli: DaemonCli) -> Result<Self, ConfigError> {
        Self::resolve(
            cli,
            std::env::var("PORT").ok(),
            std::env::var("CACHE_PATH").ok(),
            std::env::var("EMAIL").ok(),
        )
    }

    /// Pure resolution step, separated from `std::env` for testability.
    fn resolve(
        cli: DaemonCli,
        env_port: Option<String>,
        env_cache_path: Option<String>,
        env_email: Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = match env_port.filter(|p| !p.is_empty()) {
            // An unparseable PORT falls back silently to the flag value
            Some(raw) => raw.parse::<u16>().unwrap_or(cli.port),
            None => cli.port,
        };

        let cache_path = env_cache_path
            .filter(|p| !p.is_empty())
            .unwrap_or(cli.cache_path);

        let email = env_email
            .filter(|e| !e.is_empty())
            .or(cli.email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ConfigError::MissingValue {
                field: "email".to_owned(),
            })?;

        if cli.parallel == 0 {
            return Err(ConfigError::InvalidValue {
                field: "parallel".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if cli.log_format != "json" && cli.log_format != "pretty" {
            return Err(ConfigError::InvalidValue {
                field: "log_format".to_owned(),
                reason: format!("unknown format '{}', expected 'json' or 'pretty'", cli.log_format),
            });
        }

        Ok(Self {
            port,
            cache_path,
            parallelism: cli.parallel,
            cache_ttl: (!cli.cache_ttl.is_zero()).then_some(cli.cache_ttl),
            email,
            metrics_port: cli.metrics_port,
            log_format: cli.log_format,
            verbose: cli.verbose,
        })
    }
}
