//! purlin-daemon - SBOM enrichment daemon library
//!
//! Library surface backing the `purlind` binary. Exposed as a lib so the
//! HTTP handlers and configuration resolution can be integration-tested.
//!
//! # Modules
//!
//! - [`cli`]: command-line argument definitions
//! - [`config`]: flag + environment configuration resolution
//! - [`logging`]: tracing subscriber setup (json / pretty)
//! - [`metrics_server`]: optional Prometheus exporter
//! - [`server`]: axum router and request handlers

pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics_server;
pub mod server;
