// src/config/categories.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::categorize::{CategoryRule, CategoryRules, FALLBACK_TAG};

pub const ENV_CATEGORIES_PATH: &str = "NEWS_CATEGORIES_PATH";

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    default_tag: Option<String>,
    #[serde(default)]
    rules: Vec<CategoryRule>,
}

/// Load category rules from an explicit path. Supports TOML or JSON.
pub fn load_rules_from(path: &Path) -> Result<CategoryRules> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading category rules from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_rules(&content, ext.as_str())
}

/// Load rules using env var + fallbacks:
/// 1) $NEWS_CATEGORIES_PATH
/// 2) config/categories.toml
/// 3) config/categories.json
/// 4) built-in seed
pub fn load_rules_default() -> Result<CategoryRules> {
    if let Ok(p) = std::env::var(ENV_CATEGORIES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_rules_from(&pb);
        }
        return Err(anyhow!("{ENV_CATEGORIES_PATH} points to non-existent path"));
    }
    for candidate in ["config/categories.toml", "config/categories.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_rules_from(&p);
        }
    }
    Ok(CategoryRules::default_seed())
}

fn parse_rules(s: &str, hint_ext: &str) -> Result<CategoryRules> {
    let file: RulesFile = if hint_ext == "json" {
        serde_json::from_str(s).context("parsing category rules json")?
    } else if hint_ext == "toml" {
        toml::from_str(s).context("parsing category rules toml")?
    } else if let Ok(f) = toml::from_str::<RulesFile>(s) {
        f
    } else {
        serde_json::from_str(s).map_err(|_| anyhow!("unsupported category rules format"))?
    };
    Ok(clean(file))
}

fn clean(file: RulesFile) -> CategoryRules {
    let seed = CategoryRules::default_seed();

    let rules = file
        .rules
        .into_iter()
        .filter_map(|r| {
            let name = r.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let keywords = r
                .keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            let tag = r
                .tag
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            Some(CategoryRule {
                name,
                tag,
                keywords,
            })
        })
        .collect();

    let default = file
        .default
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| seed.default_category().to_string());
    let default_tag = file
        .default_tag
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_TAG.to_string());

    CategoryRules::new(rules, default, default_tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_rules_keep_order_and_trim() {
        let toml = r#"
default = "その他"

[[rules]]
name = " 公園 "
tag = "park"
keywords = [" 公園 ", "", "水族園"]

[[rules]]
name = ""
keywords = ["ignored"]

[[rules]]
name = "駅"
keywords = ["駅"]
"#;
        let rules = parse_rules(toml, "toml").unwrap();
        assert_eq!(rules.category_names(), vec!["公園", "駅", "その他"]);
        assert_eq!(rules.rules()[0].keywords, vec!["公園", "水族園"]);
        assert_eq!(rules.tag_for("公園"), "park");
        assert_eq!(rules.tag_for("駅"), FALLBACK_TAG);
    }

    #[test]
    fn json_without_hint_is_accepted() {
        let json = r#"{"default":"Misc","default_tag":"misc","rules":[{"name":"A","keywords":["a"]}]}"#;
        let rules = parse_rules(json, "").unwrap();
        assert_eq!(rules.classify_text("xax"), "A");
        assert_eq!(rules.classify_text("zzz"), "Misc");
        assert_eq!(rules.tag_for("Misc"), "misc");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_rules("[[[", "").is_err());
    }
}
