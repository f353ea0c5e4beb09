// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod categorize;
pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod present;
pub mod record;
pub mod render;
pub mod retention;
pub mod store;
pub mod timefmt;

// ---- Re-exports for stable public API ----
pub use crate::categorize::{CategoryRule, CategoryRules};
pub use crate::record::NewsRecord;
