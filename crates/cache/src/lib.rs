#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`memory`]: volatile in-memory backend (`MemoryCache`)
//! - [`sqlite`]: durable SQLite backend (`SqliteCache`)

pub mod memory;
pub mod sqlite;

// --- Public API Re-exports ---

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
