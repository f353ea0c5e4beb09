// src/present.rs
//! Presentation filter: what ends up on the rendered page.

use chrono::{DateTime, Duration, Utc};

use crate::record::NewsRecord;
use crate::timefmt::{parse_iso, window_cutoff};

/// Select records published within `window`, newest first.
///
/// Records without a parseable `published` are left out; there is no
/// fallback to `fetched_at` here. The sort compares the ISO strings and is
/// stable, so equal timestamps keep their store order.
/// Returns `(records, count)`.
pub fn filter_recent(
    records: &[NewsRecord],
    window: Duration,
    now: DateTime<Utc>,
) -> (Vec<NewsRecord>, usize) {
    let cutoff = window_cutoff(now, window);
    let mut recent: Vec<NewsRecord> = records
        .iter()
        .filter(|r| parse_iso(&r.published).is_some_and(|p| p >= cutoff))
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.published.cmp(&a.published));
    let n = recent.len();
    (recent, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timefmt::{to_fetched_iso, to_published_iso};

    fn rec(link: &str, published: &str) -> NewsRecord {
        NewsRecord {
            link: link.into(),
            published: published.into(),
            fetched_at: to_fetched_iso(Utc::now()),
            ..Default::default()
        }
    }

    #[test]
    fn newest_first_with_stable_ties() {
        let now = Utc::now();
        let d1 = to_published_iso(now - Duration::days(1));
        let d2 = to_published_iso(now - Duration::days(2));
        let v = vec![rec("x", &d2), rec("y", &d1), rec("z", &d2), rec("w", &d1)];
        let (out, n) = filter_recent(&v, Duration::days(7), now);
        let links: Vec<_> = out.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["y", "w", "x", "z"]);
        assert_eq!(n, 4);
    }

    #[test]
    fn excludes_missing_and_stale_publish_times() {
        let now = Utc::now();
        let v = vec![
            rec("empty", ""),
            rec("junk", "??"),
            rec("stale", &to_published_iso(now - Duration::days(8))),
            rec("fresh", &to_published_iso(now - Duration::hours(3))),
        ];
        let (out, n) = filter_recent(&v, Duration::days(7), now);
        assert_eq!(n, 1);
        assert_eq!(out[0].link, "fresh");
    }

    #[test]
    fn oversized_window_does_not_overflow() {
        let now = Utc::now();
        let v = vec![
            rec("ancient", &to_published_iso(now - Duration::days(30_000))),
            rec("undated", ""),
        ];
        let (out, n) = filter_recent(&v, Duration::MAX, now);
        assert_eq!(n, 1);
        assert_eq!(out[0].link, "ancient");
    }
}
