// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{FeedSource, RawFeedItem};
use crate::record::NewsRecord;
use crate::timefmt::{to_fetched_iso, to_published_iso};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Raw items parsed from feed sources.");
        describe_counter!("ingest_new_total", "Items added to the store.");
        describe_counter!(
            "ingest_dup_total",
            "Items skipped because their link was already known."
        );
        describe_counter!(
            "ingest_empty_link_total",
            "Items dropped because they had no link."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Feed source fetch/parse errors."
        );
        describe_counter!(
            "retention_pruned_total",
            "Records removed by the retention window."
        );
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix timestamp of the last completed fetch run."
        );
    });
}

/// Counters from a single merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub duplicates: usize,
    pub empty_link: usize,
}

/// Build a fresh, uncategorized record from a raw feed item.
pub fn to_record(item: RawFeedItem, fetched_at: &str) -> NewsRecord {
    NewsRecord {
        title: item.title.unwrap_or_default(),
        link: item.link.unwrap_or_default(),
        source: item.source.unwrap_or_default(),
        published: item.published.map(to_published_iso).unwrap_or_default(),
        description: item.summary.unwrap_or_default(),
        category: String::new(),
        fetched_at: fetched_at.to_string(),
    }
}

/// Append items whose `link` is neither in `store` nor already added in this
/// call. Links are compared as exact strings. Items without a link are dropped.
pub fn merge_items<I>(
    mut store: Vec<NewsRecord>,
    items: I,
    now: DateTime<Utc>,
) -> (Vec<NewsRecord>, MergeStats)
where
    I: IntoIterator<Item = RawFeedItem>,
{
    let fetched_at = to_fetched_iso(now);
    let mut stats = MergeStats::default();

    let before = store.len();
    store.retain(|r| !r.link.is_empty());
    if store.len() != before {
        tracing::warn!(
            dropped = before - store.len(),
            "store contained records without link; dropping them"
        );
    }

    let mut seen: HashSet<String> = store.iter().map(|r| r.link.clone()).collect();

    for item in items {
        let rec = to_record(item, &fetched_at);
        if rec.link.is_empty() {
            stats.empty_link += 1;
            continue;
        }
        if !seen.insert(rec.link.clone()) {
            stats.duplicates += 1;
            continue;
        }
        store.push(rec);
        stats.added += 1;
    }

    counter!("ingest_new_total").increment(stats.added as u64);
    counter!("ingest_dup_total").increment(stats.duplicates as u64);
    counter!("ingest_empty_link_total").increment(stats.empty_link as u64);

    (store, stats)
}

/// Fetch every source in turn. A failing source logs a warning and
/// contributes nothing; the others still count.
/// Returns the collected items and the number of failed sources.
pub async fn fetch_all(sources: &[Box<dyn FeedSource>]) -> (Vec<RawFeedItem>, usize) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    let mut failed = 0usize;
    for s in sources {
        match s.fetch_items().await {
            Ok(mut v) => {
                tracing::debug!(source = s.name(), items = v.len(), "feed fetched");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = s.name(), "feed source error");
                counter!("ingest_source_errors_total").increment(1);
                failed += 1;
            }
        }
    }
    (raw, failed)
}

/// Fetch all sources and merge into `store`.
pub async fn run_once(
    sources: &[Box<dyn FeedSource>],
    store: Vec<NewsRecord>,
    now: DateTime<Utc>,
) -> (Vec<NewsRecord>, MergeStats, usize) {
    let (raw, failed) = fetch_all(sources).await;
    let (merged, stats) = merge_items(store, raw, now);
    gauge!("ingest_last_run_ts").set(now.timestamp() as f64);
    (merged, stats, failed)
}
