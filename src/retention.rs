// src/retention.rs
//! Retention pruning of the persisted store.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;

use crate::record::NewsRecord;
use crate::timefmt::{parse_iso, window_cutoff};

/// A record is live when its publish time is within the window. Without a
/// usable publish time, the fetch time decides. Neither usable → expired.
pub fn is_live(rec: &NewsRecord, cutoff: DateTime<Utc>) -> bool {
    match parse_iso(&rec.published) {
        Some(published) => published >= cutoff,
        None => parse_iso(&rec.fetched_at).is_some_and(|fetched| fetched >= cutoff),
    }
}

/// Keep live records, preserving their relative order.
pub fn prune(records: Vec<NewsRecord>, window: Duration, now: DateTime<Utc>) -> Vec<NewsRecord> {
    let cutoff = window_cutoff(now, window);
    let before = records.len();
    let kept: Vec<NewsRecord> = records.into_iter().filter(|r| is_live(r, cutoff)).collect();

    let dropped = before - kept.len();
    if dropped > 0 {
        tracing::debug!(dropped, %cutoff, "retention pruned records");
    }
    counter!("retention_pruned_total").increment(dropped as u64);
    kept
}
