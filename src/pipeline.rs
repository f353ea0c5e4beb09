// src/pipeline.rs
//! The three independent stages over the shared store file:
//! fetch (ingest + prune + persist), categorize, render.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

use crate::categorize::{categorize_unlabeled, CategoryRules};
use crate::config::news::NewsConfig;
use crate::ingest::{
    self,
    providers::google_news::{build_client, GoogleNewsSource},
    types::FeedSource,
};
use crate::present::filter_recent;
use crate::record::NewsRecord;
use crate::render::{display_categories, render_page, PageContext};
use crate::retention::prune;
use crate::store::{self, StoreLoad};
use crate::timefmt::{display_offset, DISPLAY_FORMAT};

/// What a store-consuming stage did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<T> {
    Done(T),
    /// No store yet; fetch has to run first.
    StoreMissing,
    /// Store exists but could not be parsed.
    StoreCorrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    pub added: usize,
    pub duplicates: usize,
    pub pruned: usize,
    pub failed_sources: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorizeSummary {
    pub newly_categorized: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub shown: usize,
}

/// One Google News source per configured query, sharing one HTTP client.
pub fn build_sources(cfg: &NewsConfig) -> Result<Vec<Box<dyn FeedSource>>> {
    let client = build_client(cfg.fetch_timeout())?;
    cfg.queries
        .iter()
        .map(|q| {
            GoogleNewsSource::from_query(&cfg.feed_url, q, &cfg.feed_params, client.clone())
                .map(|s| Box::new(s) as Box<dyn FeedSource>)
        })
        .collect()
}

/// load (corrupt/missing → empty) → fetch + merge → prune → save.
pub async fn run_fetch(
    cfg: &NewsConfig,
    sources: &[Box<dyn FeedSource>],
    now: DateTime<Utc>,
) -> Result<FetchSummary> {
    let existing = store::load_or_empty(&cfg.data_path)?;
    let (merged, stats, failed_sources) = ingest::run_once(sources, existing, now).await;

    let before = merged.len();
    let live = prune(merged, cfg.retention_window(), now);
    let pruned = before - live.len();

    store::save_store(&cfg.data_path, &live)?;

    let summary = FetchSummary {
        added: stats.added,
        duplicates: stats.duplicates,
        pruned,
        failed_sources,
        total: live.len(),
    };
    info!(
        added = summary.added,
        duplicates = summary.duplicates,
        pruned = summary.pruned,
        failed_sources = summary.failed_sources,
        total = summary.total,
        "fetch stage finished"
    );
    Ok(summary)
}

/// load (must exist) → categorize unlabeled → save.
pub fn run_categorize(
    cfg: &NewsConfig,
    rules: &CategoryRules,
) -> Result<StageOutcome<CategorizeSummary>> {
    let mut records = match load_required(&cfg.data_path)? {
        StageOutcome::Done(v) => v,
        StageOutcome::StoreMissing => return Ok(StageOutcome::StoreMissing),
        StageOutcome::StoreCorrupt(e) => return Ok(StageOutcome::StoreCorrupt(e)),
    };

    let newly_categorized = categorize_unlabeled(&mut records, rules);
    store::save_store(&cfg.data_path, &records)?;

    info!(newly_categorized, total = records.len(), "categorize stage finished");
    Ok(StageOutcome::Done(CategorizeSummary {
        newly_categorized,
        total: records.len(),
    }))
}

/// load (must exist) → presentation filter → render → write page.
pub fn run_render(
    cfg: &NewsConfig,
    rules: &CategoryRules,
    now: DateTime<Utc>,
) -> Result<StageOutcome<RenderSummary>> {
    let records = match load_required(&cfg.data_path)? {
        StageOutcome::Done(v) => v,
        StageOutcome::StoreMissing => return Ok(StageOutcome::StoreMissing),
        StageOutcome::StoreCorrupt(e) => return Ok(StageOutcome::StoreCorrupt(e)),
    };

    let (recent, shown) = filter_recent(&records, cfg.display_window(), now);
    let offset = display_offset(cfg.display_utc_offset_hours);

    let ctx = PageContext {
        title: &cfg.page_title,
        entries: &recent,
        categories: display_categories(rules),
        updated_at: now.with_timezone(&offset).format(DISPLAY_FORMAT).to_string(),
        total_count: shown,
        rules,
        offset,
    };
    let html = render_page(&ctx);

    store::write_atomic(&cfg.output_path, html.as_bytes())
        .with_context(|| format!("writing page {}", cfg.output_path.display()))?;

    info!(shown, path = %cfg.output_path.display(), "render stage finished");
    Ok(StageOutcome::Done(RenderSummary { shown }))
}

fn load_required(path: &Path) -> Result<StageOutcome<Vec<NewsRecord>>> {
    Ok(match store::read_store(path)? {
        StoreLoad::Loaded(v) => StageOutcome::Done(v),
        StoreLoad::Missing => {
            warn!(path = %path.display(), "store not found");
            StageOutcome::StoreMissing
        }
        StoreLoad::Corrupt(e) => {
            warn!(path = %path.display(), error = %e, "store unreadable");
            StageOutcome::StoreCorrupt(e)
        }
    })
}
