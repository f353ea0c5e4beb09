//! kasai-news — CLI entrypoint.
//! Three independent stages over the shared store file: `fetch`, `categorize`, `render`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kasai_news::config::{categories::load_rules_default, news::NewsConfig};
use kasai_news::pipeline::{self, StageOutcome};

#[derive(Parser, Debug)]
#[command(name = "kasai-news", version, about = "Kasai-area local news digest")]
struct Cli {
    /// Pipeline config (TOML). Defaults to config/news.toml when present.
    #[arg(long, global = true, env = "NEWS_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Override the record store path.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch feeds, merge new items into the store and prune old ones.
    Fetch,
    /// Categorize records that have no category yet.
    Categorize,
    /// Render the static page from recent records.
    Render {
        /// Override the output HTML path.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Compact logs to stderr; level from RUST_LOG, default `kasai_news=info,warn`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kasai_news=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn print_store_missing(cfg: &NewsConfig) {
    println!(
        "{} が見つかりません。先に fetch を実行してください。",
        cfg.data_path.display()
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present; no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(p) => NewsConfig::load_from(p)?,
        None => NewsConfig::load_default()?,
    };
    if let Some(d) = cli.data {
        cfg.data_path = d;
    }

    match cli.command {
        Command::Fetch => {
            let sources = pipeline::build_sources(&cfg)?;
            let s = pipeline::run_fetch(&cfg, &sources, chrono::Utc::now()).await?;
            println!("取得: 新規 {} 件 / 合計 {} 件", s.added, s.total);
        }
        Command::Categorize => {
            let rules = load_rules_default()?;
            match pipeline::run_categorize(&cfg, &rules)? {
                StageOutcome::Done(s) => {
                    println!(
                        "分類: {} 件を新規分類 / 合計 {} 件",
                        s.newly_categorized, s.total
                    );
                }
                StageOutcome::StoreMissing => print_store_missing(&cfg),
                StageOutcome::StoreCorrupt(e) => {
                    println!("データの読み込みに失敗しました: {e}");
                }
            }
        }
        Command::Render { output } => {
            if let Some(o) = output {
                cfg.output_path = o;
            }
            let rules = load_rules_default()?;
            match pipeline::run_render(&cfg, &rules, chrono::Utc::now())? {
                StageOutcome::Done(s) => {
                    println!(
                        "生成: {} 件のニュースで {} を作成",
                        s.shown,
                        cfg.output_path.display()
                    );
                }
                StageOutcome::StoreMissing => print_store_missing(&cfg),
                StageOutcome::StoreCorrupt(e) => {
                    println!("データの読み込みに失敗しました: {e}");
                }
            }
        }
    }

    Ok(())
}
