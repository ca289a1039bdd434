// src/services/classifier.rs
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::MonitorError;
use crate::models::{ArticleRecord, Severity, GENERAL};

/// One taxonomy entry: a theme key and its ordered match patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRule {
    pub theme: String,
    pub patterns: Vec<String>,
}

impl ThemeRule {
    fn new(theme: &str, patterns: &[&str]) -> Self {
        ThemeRule {
            theme: theme.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Ordered taxonomy plus the severity policy derived from it.
/// Themes are tried in declaration order and the first hit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub themes: Vec<ThemeRule>,
    /// Matched terms containing any of these escalate to critical.
    pub alarm_terms: Vec<String>,
    pub critical_themes: Vec<String>,
    pub warning_themes: Vec<String>,
    pub watch_themes: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Taxonomy {
            themes: vec![
                ThemeRule::new("legal", &["winding up", "lawsuit", "judicial management", "default"]),
                ThemeRule::new(
                    "refinancing",
                    &["refinanc", "facility", "bridge loan", "maturity", "liquidity"],
                ),
                ThemeRule::new("covenant", &["covenant", "waiver", "breach"]),
                ThemeRule::new(
                    "distress_sale",
                    &["discount", "price cut", "bulk sale", "fire sale", "weak sales"],
                ),
                ThemeRule::new("project_delay", &["delay", "stop work", "construction", r"\btop\b"]),
                ThemeRule::new("ratings", &["downgrade", "negative outlook", "rating"]),
            ],
            alarm_terms: vec!["default".to_string(), "winding up".to_string()],
            critical_themes: vec!["legal".to_string()],
            warning_themes: vec!["covenant".to_string(), "refinancing".to_string()],
            watch_themes: vec![
                "distress_sale".to_string(),
                "project_delay".to_string(),
                "ratings".to_string(),
            ],
        }
    }
}

impl Taxonomy {
    pub fn severity(&self, theme: &str, matched: &[String]) -> Severity {
        let has = |set: &[String]| set.iter().any(|t| t == theme);
        let alarm = matched.iter().map(|term| term.to_lowercase()).any(|term| {
            self.alarm_terms
                .iter()
                .any(|alarm| term.contains(&alarm.to_lowercase()))
        });

        if has(&self.critical_themes) || alarm {
            Severity::Critical
        } else if has(&self.warning_themes) {
            Severity::Warning
        } else if has(&self.watch_themes) {
            Severity::Watch
        } else {
            Severity::Info
        }
    }
}

struct CompiledTheme {
    theme: String,
    patterns: Vec<Regex>,
}

/// Taxonomy with its patterns compiled once, ready to label articles.
pub struct Classifier {
    taxonomy: Taxonomy,
    compiled: Vec<CompiledTheme>,
}

/// Outcome of labelling a single piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub theme: String,
    pub severity: Severity,
    pub matched_terms: Vec<String>,
    pub developers: Vec<String>,
}

impl Classifier {
    pub fn new(taxonomy: Taxonomy) -> Result<Self, MonitorError> {
        let mut compiled = Vec::with_capacity(taxonomy.themes.len());
        for rule in &taxonomy.themes {
            let patterns = rule
                .patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| MonitorError::InvalidPattern {
                            theme: rule.theme.clone(),
                            pattern: p.clone(),
                            reason: e.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            compiled.push(CompiledTheme { theme: rule.theme.clone(), patterns });
        }
        Ok(Classifier { taxonomy, compiled })
    }

    /// Label `title + summary` against the taxonomy and the entity list.
    /// Matched terms are the patterns that hit, in rule order.
    pub fn classify_text(&self, title: &str, summary: &str, entities: &[String]) -> Classification {
        let text = format!("{} {}", title, summary).to_lowercase();

        let mut theme = GENERAL.to_string();
        let mut matched_terms = Vec::new();
        for candidate in &self.compiled {
            let hits: Vec<String> = candidate
                .patterns
                .iter()
                .filter(|re| re.is_match(&text))
                .map(|re| re.as_str().to_string())
                .collect();
            if !hits.is_empty() {
                theme = candidate.theme.clone();
                matched_terms = hits;
                break;
            }
        }

        let severity = self.taxonomy.severity(&theme, &matched_terms);

        let mut developers: Vec<String> = entities
            .iter()
            .filter(|name| !name.trim().is_empty() && text.contains(&name.to_lowercase()))
            .cloned()
            .collect();
        if developers.is_empty() {
            developers.push(GENERAL.to_string());
        }

        Classification { theme, severity, matched_terms, developers }
    }

    /// Populate the classification fields of every article, preserving order.
    pub fn classify(&self, mut articles: Vec<ArticleRecord>, entities: &[String]) -> Vec<ArticleRecord> {
        for article in articles.iter_mut() {
            let result = self.classify_text(&article.title, &article.summary, entities);
            debug!(
                "Classified '{}' as {}/{} ({:?})",
                article.title, result.theme, result.severity, result.matched_terms
            );
            article.theme = result.theme;
            article.severity = result.severity;
            article.matched_terms = result.matched_terms;
            article.developers = result.developers;
        }
        articles
    }
}
