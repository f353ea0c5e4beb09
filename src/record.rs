// src/record.rs
use serde::{Deserialize, Serialize};

/// One news item tracked through the fetch, categorize and render stages.
///
/// All fields are plain strings so the on-disk JSON stays stable and
/// hand-editable. Missing keys deserialize to `""`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NewsRecord {
    pub title: String,
    /// Canonical identifier, unique across the store.
    pub link: String,
    pub source: String,
    /// ISO-8601 UTC, or empty when the feed had no publish time.
    pub published: String,
    pub description: String,
    /// Empty means "not yet categorized".
    pub category: String,
    /// ISO-8601 UTC, time of ingestion.
    pub fetched_at: String,
}

impl NewsRecord {
    pub fn is_categorized(&self) -> bool {
        !self.category.is_empty()
    }
}
