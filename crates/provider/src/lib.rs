#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`ecosystems`]: ecosyste.ms HTTP client (`EcosystemsClient`)
//! - [`lookup`]: cache-through wrapper (`CachedLookup`)

pub mod ecosystems;
pub mod lookup;

// --- Public API Re-exports ---

pub use ecosystems::{ClientOptions, DEFAULT_BASE_URL, EcosystemsClient};
pub use lookup::CachedLookup;
