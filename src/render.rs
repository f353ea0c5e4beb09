// src/render.rs
//! Static HTML page for the presentation-filtered records.
//!
//! The page is a single self-contained document: one card per record and a
//! row of category buttons that hide/show cards client-side. All record text
//! is HTML-escaped before it is interpolated.

use chrono::FixedOffset;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::categorize::CategoryRules;
use crate::record::NewsRecord;
use crate::timefmt::format_local;

/// Label of the pseudo-category that shows every card.
pub const ALL_CATEGORY: &str = "すべて";

/// Everything the page needs.
#[derive(Debug)]
pub struct PageContext<'a> {
    pub title: &'a str,
    /// Already filtered and sorted for display.
    pub entries: &'a [NewsRecord],
    /// Filter buttons in order, starting with [`ALL_CATEGORY`].
    pub categories: Vec<String>,
    pub updated_at: String,
    pub total_count: usize,
    pub rules: &'a CategoryRules,
    pub offset: FixedOffset,
}

/// `すべて` followed by the rule categories and the default.
pub fn display_categories(rules: &CategoryRules) -> Vec<String> {
    std::iter::once(ALL_CATEGORY)
        .chain(rules.category_names())
        .map(str::to_string)
        .collect()
}

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let mut html = String::with_capacity(4096 + ctx.entries.len() * 512);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
{STYLE}</style>
</head>
<body>
<header>
<h1>{title}</h1>
<p class="meta">最終更新: {updated} / {count} 件</p>
</header>
<nav class="filters">
"#,
        title = encode_text(ctx.title),
        updated = encode_text(&ctx.updated_at),
        count = ctx.total_count,
    );

    for (i, cat) in ctx.categories.iter().enumerate() {
        let value = if i == 0 && cat == ALL_CATEGORY { "all" } else { cat.as_str() };
        let active = if i == 0 { " active" } else { "" };
        let _ = writeln!(
            html,
            r#"<button type="button" class="filter{active}" data-category="{value}">{label}</button>"#,
            value = encode_double_quoted_attribute(value),
            label = encode_text(cat),
        );
    }
    html.push_str("</nav>\n<main>\n");

    if ctx.entries.is_empty() {
        html.push_str("<p class=\"empty\">表示できるニュースはありません。</p>\n");
    }

    for rec in ctx.entries {
        let class = ctx.rules.tag_for(&rec.category);
        let category_label = if rec.category.is_empty() {
            ctx.rules.default_category()
        } else {
            rec.category.as_str()
        };
        let _ = write!(
            html,
            r#"<article class="card" data-category="{cat_attr}">
<span class="badge badge-{class}">{cat_label}</span>
<h2><a href="{href}" target="_blank" rel="noopener">{title}</a></h2>
<p class="meta">"#,
            cat_attr = encode_double_quoted_attribute(category_label),
            class = encode_double_quoted_attribute(class),
            cat_label = encode_text(category_label),
            href = encode_double_quoted_attribute(&rec.link),
            title = encode_text(&rec.title),
        );
        if !rec.source.is_empty() {
            let _ = write!(
                html,
                r#"<span class="source">{}</span> "#,
                encode_text(&rec.source)
            );
        }
        let _ = write!(
            html,
            "<time datetime=\"{}\">{}</time></p>\n</article>\n",
            encode_double_quoted_attribute(&rec.published),
            encode_text(&format_local(&rec.published, ctx.offset)),
        );
    }

    html.push_str("</main>\n<script>\n");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

const STYLE: &str = r#"body { font-family: sans-serif; margin: 0 auto; max-width: 48rem; padding: 1rem; color: #222; }
header h1 { margin-bottom: 0.25rem; }
.meta { color: #666; font-size: 0.85rem; }
.filters { display: flex; flex-wrap: wrap; gap: 0.5rem; margin: 1rem 0; }
.filter { border: 1px solid #ccc; background: #fff; border-radius: 1rem; padding: 0.25rem 0.75rem; cursor: pointer; }
.filter.active { background: #333; color: #fff; }
.card { border-bottom: 1px solid #eee; padding: 0.75rem 0; }
.card h2 { font-size: 1.05rem; margin: 0.25rem 0; }
.card a { color: inherit; }
.badge { font-size: 0.75rem; padding: 0.1rem 0.5rem; border-radius: 0.25rem; color: #fff; }
.badge-incident { background: #c0392b; }
.badge-event { background: #2980b9; }
.badge-gourmet { background: #d68910; }
.badge-other { background: #7f8c8d; }
.empty { color: #666; }
"#;

const SCRIPT: &str = r#"document.querySelectorAll('.filter').forEach(function (btn) {
  btn.addEventListener('click', function () {
    var cat = btn.dataset.category;
    document.querySelectorAll('.filter').forEach(function (b) { b.classList.toggle('active', b === btn); });
    document.querySelectorAll('.card').forEach(function (card) {
      card.hidden = !(cat === 'all' || card.dataset.category === cat);
    });
  });
});
"#;
