// src/services/news.rs
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::models::{ArticleRecord, Severity};

/// Facet selections for the news feed. An empty list selects everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsFilter {
    pub severity: Vec<Severity>,
    pub theme: Vec<String>,
    pub outlet: Vec<String>,
    pub developer: Vec<String>,
}

fn split_list(raw: Option<&String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl NewsFilter {
    /// Build from `?severity=critical,warning&theme=legal&...`. Unknown
    /// severities are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let severity = split_list(params.get("severity"))
            .iter()
            .filter_map(|s| {
                serde_json::from_value::<Severity>(serde_json::Value::String(s.to_lowercase())).ok()
            })
            .collect();
        NewsFilter {
            severity,
            theme: split_list(params.get("theme")),
            outlet: split_list(params.get("outlet")),
            developer: split_list(params.get("developer")),
        }
    }

    pub fn matches(&self, article: &ArticleRecord) -> bool {
        let allows = |selected: &[String], value: &str| selected.is_empty() || selected.iter().any(|s| s == value);

        (self.severity.is_empty() || self.severity.contains(&article.severity))
            && allows(&self.theme, &article.theme)
            && allows(&self.outlet, &article.outlet)
            && (self.developer.is_empty()
                || article.developers.iter().any(|dev| self.developer.contains(dev)))
    }

    pub fn apply(&self, articles: &[ArticleRecord]) -> Vec<ArticleRecord> {
        articles.iter().filter(|a| self.matches(a)).cloned().collect()
    }
}

/// Sorted distinct values available for filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsFacets {
    pub severities: Vec<Severity>,
    pub themes: Vec<String>,
    pub outlets: Vec<String>,
    pub developers: Vec<String>,
}

impl NewsFacets {
    pub fn collect(articles: &[ArticleRecord]) -> Self {
        let severities: BTreeSet<Severity> = articles.iter().map(|a| a.severity).collect();
        let themes: BTreeSet<&str> = articles.iter().map(|a| a.theme.as_str()).collect();
        let outlets: BTreeSet<&str> = articles.iter().map(|a| a.outlet.as_str()).collect();
        let developers: BTreeSet<&str> = articles
            .iter()
            .flat_map(|a| a.developers.iter().map(String::as_str))
            .collect();

        NewsFacets {
            severities: severities.into_iter().collect(),
            themes: themes.into_iter().map(str::to_string).collect(),
            outlets: outlets.into_iter().map(str::to_string).collect(),
            developers: developers.into_iter().map(str::to_string).collect(),
        }
    }
}
