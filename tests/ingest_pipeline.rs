use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use kasai_news::ingest::types::{FeedSource, RawFeedItem};
use kasai_news::ingest::{fetch_all, run_once};

struct StaticSource(Vec<RawFeedItem>);

#[async_trait]
impl FeedSource for StaticSource {
    async fn fetch_items(&self) -> Result<Vec<RawFeedItem>> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &str {
        "static"
    }
}

struct DownSource;

#[async_trait]
impl FeedSource for DownSource {
    async fn fetch_items(&self) -> Result<Vec<RawFeedItem>> {
        Err(anyhow!("connection timed out"))
    }
    fn name(&self) -> &str {
        "down"
    }
}

fn item(link: &str) -> RawFeedItem {
    RawFeedItem {
        title: Some(format!("title {link}")),
        link: Some(link.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn failing_source_does_not_abort_the_run() {
    let sources: Vec<Box<dyn FeedSource>> = vec![
        Box::new(DownSource),
        Box::new(StaticSource(vec![item("L1"), item("L2")])),
        Box::new(DownSource),
    ];
    let (raw, failed) = fetch_all(&sources).await;
    assert_eq!(raw.len(), 2);
    assert_eq!(failed, 2);
}

#[tokio::test]
async fn overlapping_sources_are_deduplicated() {
    let sources: Vec<Box<dyn FeedSource>> = vec![
        Box::new(StaticSource(vec![item("L1"), item("L2")])),
        Box::new(StaticSource(vec![item("L2"), item("L3")])),
    ];
    let (store, stats, failed) = run_once(&sources, vec![], Utc::now()).await;
    let links: Vec<_> = store.iter().map(|r| r.link.as_str()).collect();
    assert_eq!(links, vec!["L1", "L2", "L3"]);
    assert_eq!(stats.added, 3);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(failed, 0);

    // Second run over the same output adds nothing.
    let (again, stats2, _) = run_once(&sources, store.clone(), Utc::now()).await;
    assert_eq!(again, store);
    assert_eq!(stats2.added, 0);
}
