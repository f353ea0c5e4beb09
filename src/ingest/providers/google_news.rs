// src/ingest/providers/google_news.rs
//! Google News search RSS, one source per query string.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::ingest::types::{FeedSource, RawFeedItem};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<ItemSource>,
}

// <source url="https://...">Publisher</source>
#[derive(Debug, Deserialize)]
struct ItemSource {
    #[serde(rename = "$text", default)]
    name: Option<String>,
}

fn parse_pub_date(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .and_then(|dt| DateTime::from_timestamp(dt.unix_timestamp(), 0))
        .or_else(|| {
            DateTime::parse_from_rfc2822(ts)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// Shared HTTP client with a per-request timeout, so one slow feed cannot
/// stall the whole run.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("kasai-news/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building http client")
}

/// `base?q=<query>&<params...>`
pub fn search_url(base: &str, query: &str, params: &[(String, String)]) -> Result<Url> {
    let pairs = std::iter::once(("q", query))
        .chain(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    Url::parse_with_params(base, pairs).with_context(|| format!("building feed url from {base}"))
}

pub struct GoogleNewsSource {
    query: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: Url, client: Client },
}

impl GoogleNewsSource {
    pub fn from_query(
        base: &str,
        query: &str,
        params: &[(String, String)],
        client: Client,
    ) -> Result<Self> {
        let url = search_url(base, query, params)?;
        Ok(Self {
            query: query.to_string(),
            mode: Mode::Http { url, client },
        })
    }

    /// Serve a canned RSS document instead of hitting the network.
    pub fn from_fixture(query: &str, xml: &str) -> Self {
        Self {
            query: query.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn parse_items_from_str(s: &str) -> Result<Vec<RawFeedItem>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing google news rss xml")?;

        let out: Vec<RawFeedItem> = rss
            .channel
            .item
            .into_iter()
            .map(|it| RawFeedItem {
                title: it.title,
                link: it.link.map(|l| l.trim().to_string()),
                published: it.pub_date.as_deref().and_then(parse_pub_date),
                source: it.source.and_then(|s| s.name),
                summary: it.description,
            })
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_items_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl FeedSource for GoogleNewsSource {
    async fn fetch_items(&self) -> Result<Vec<RawFeedItem>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .with_context(|| format!("non-2xx from {url}"))?
                    .text()
                    .await
                    .context("reading feed body")?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.query
    }
}

// HTML entities that show up in feeds but are undeclared in XML.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
