// src/categorize.rs
//! Keyword categorizer.
//!
//! Rules are evaluated in declaration order over `title + " " + description`:
//! - a rule matches if ANY of its keywords is a substring of that text
//! - the first matching rule wins, later rules are not looked at
//! - no match → the rule set's default category
//!
//! Only records with an empty `category` are touched, so running the stage
//! again over the same store is a no-op.

use serde::Deserialize;

use crate::record::NewsRecord;

/// Style tag used for categories the rule set does not know.
pub const FALLBACK_TAG: &str = "other";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    /// Short identifier for styling (e.g. `incident`).
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Ordered, immutable rule set plus the default category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    default_category: String,
    default_tag: String,
}

impl CategoryRules {
    pub fn new(
        rules: Vec<CategoryRule>,
        default_category: impl Into<String>,
        default_tag: impl Into<String>,
    ) -> Self {
        Self {
            rules,
            default_category: default_category.into(),
            default_tag: default_tag.into(),
        }
    }

    /// Built-in rules for Kasai-area local news.
    pub fn default_seed() -> Self {
        let rule = |name: &str, tag: &str, kws: &[&str]| CategoryRule {
            name: name.to_string(),
            tag: Some(tag.to_string()),
            keywords: kws.iter().map(|k| k.to_string()).collect(),
        };
        Self::new(
            vec![
                rule(
                    "事件・事故",
                    "incident",
                    &[
                        "逮捕", "事故", "火災", "事件", "容疑", "死亡", "被害", "犯罪", "詐欺",
                        "窃盗", "暴行",
                    ],
                ),
                rule(
                    "イベント・お知らせ",
                    "event",
                    &[
                        "祭り", "イベント", "開催", "募集", "教室", "講座", "ボランティア", "選挙",
                        "行政", "区議",
                    ],
                ),
                rule(
                    "グルメ・新店舗",
                    "gourmet",
                    &[
                        "オープン", "開店", "閉店", "ランチ", "カフェ", "レストラン", "ラーメン",
                        "新店", "グルメ",
                    ],
                ),
            ],
            "その他",
            FALLBACK_TAG,
        )
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Category names in display order: rules first, default last.
    pub fn category_names(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.name.as_str())
            .chain(std::iter::once(self.default_category.as_str()))
            .collect()
    }

    /// Whether `name` is one of the categories this rule set can assign.
    pub fn is_known(&self, name: &str) -> bool {
        name == self.default_category || self.rules.iter().any(|r| r.name == name)
    }

    /// Style tag for a category name; unknown or empty → `other`.
    pub fn tag_for(&self, category: &str) -> &str {
        if category.is_empty() {
            return FALLBACK_TAG;
        }
        if category == self.default_category {
            return &self.default_tag;
        }
        self.rules
            .iter()
            .find(|r| r.name == category)
            .and_then(|r| r.tag.as_deref())
            .unwrap_or(FALLBACK_TAG)
    }

    /// First-match classification of a single haystack.
    pub fn classify_text(&self, text: &str) -> &str {
        for rule in &self.rules {
            if rule.keywords.iter().any(|kw| text.contains(kw.as_str())) {
                return &rule.name;
            }
        }
        &self.default_category
    }

    pub fn classify(&self, rec: &NewsRecord) -> &str {
        let text = format!("{} {}", rec.title, rec.description);
        self.classify_text(&text)
    }
}

/// Assign a category to every uncategorized record. Returns how many were
/// newly categorized.
pub fn categorize_unlabeled(records: &mut [NewsRecord], rules: &CategoryRules) -> usize {
    let mut n = 0usize;
    for rec in records.iter_mut().filter(|r| !r.is_categorized()) {
        rec.category = rules.classify(rec).to_string();
        n += 1;
    }
    n
}
