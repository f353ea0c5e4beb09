// src/config/news.rs
use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/news.toml";

/// Upper bound for both windows (about a century).
pub const MAX_WINDOW_DAYS: i64 = 36_500;

pub const DEFAULT_FEED_URL: &str = "https://news.google.com/rss/search";

fn default_data_path() -> PathBuf {
    PathBuf::from("data/news.json")
}
fn default_output_path() -> PathBuf {
    PathBuf::from("docs/index.html")
}
fn default_retention_days() -> i64 {
    30
}
fn default_display_days() -> i64 {
    7
}
fn default_queries() -> Vec<String> {
    ["葛西 江戸川区", "西葛西", "葛西臨海公園"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}
fn default_feed_params() -> Vec<(String, String)> {
    [("hl", "ja"), ("gl", "JP"), ("ceid", "JP:ja")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
fn default_fetch_timeout_secs() -> u64 {
    15
}
fn default_display_utc_offset_hours() -> i32 {
    9
}
fn default_page_title() -> String {
    "葛西ニュース".to_string()
}

/// Pipeline settings. Every field has a default, so an empty file (or no
/// file at all) yields a working configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Records older than this are purged from the store.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Records older than this are left off the page.
    #[serde(default = "default_display_days")]
    pub display_days: i64,
    /// One feed request per query.
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// Extra query parameters appended after `q=`.
    #[serde(default = "default_feed_params")]
    pub feed_params: Vec<(String, String)>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_display_utc_offset_hours")]
    pub display_utc_offset_hours: i32,
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            output_path: default_output_path(),
            retention_days: default_retention_days(),
            display_days: default_display_days(),
            queries: default_queries(),
            feed_url: default_feed_url(),
            feed_params: default_feed_params(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            display_utc_offset_hours: default_display_utc_offset_hours(),
            page_title: default_page_title(),
        }
    }
}

impl NewsConfig {
    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let mut cfg: NewsConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $NEWS_CONFIG_PATH
    /// 2) config/news.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if p.exists() {
            return Self::load_from(&p);
        }
        Ok(Self::default())
    }

    pub fn retention_window(&self) -> Duration {
        Duration::try_days(self.retention_days).unwrap_or(Duration::MAX)
    }

    pub fn display_window(&self) -> Duration {
        Duration::try_days(self.display_days).unwrap_or(Duration::MAX)
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }

    fn sanitize(&mut self) {
        if self.retention_days <= 0 {
            self.retention_days = default_retention_days();
        }
        if self.display_days <= 0 {
            self.display_days = default_display_days();
        }
        for (field, days) in [
            ("retention_days", &mut self.retention_days),
            ("display_days", &mut self.display_days),
        ] {
            if *days > MAX_WINDOW_DAYS {
                tracing::warn!(field, days = *days, max = MAX_WINDOW_DAYS, "window too large; capping");
                *days = MAX_WINDOW_DAYS;
            }
        }
        if self.display_days > self.retention_days {
            // Allowed, but the page can then never show more than the store keeps.
            tracing::warn!(
                display_days = self.display_days,
                retention_days = self.retention_days,
                "display window is longer than retention window"
            );
        }
        if self.fetch_timeout_secs == 0 {
            self.fetch_timeout_secs = default_fetch_timeout_secs();
        }
        self.queries = self
            .queries
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect();
    }
}
