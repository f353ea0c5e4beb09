// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One item as produced by a feed source, before it becomes a record.
/// Every field may be missing; ingestion substitutes empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Structured publish time, already converted to UTC.
    pub published: Option<DateTime<Utc>>,
    /// Publisher name (RSS `<source>` text).
    pub source: Option<String>,
    pub summary: Option<String>,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<RawFeedItem>>;
    fn name(&self) -> &str;
}
