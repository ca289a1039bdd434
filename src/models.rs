// src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for themes and developer links when nothing more specific matched.
pub const GENERAL: &str = "general";

/// One company's balance-sheet snapshot. `None` ratios mean "unknown", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRecord {
    pub company: String,
    pub ticker: String,
    pub cash: Option<f64>,
    pub total_debt: Option<f64>,
    pub net_debt: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub net_debt_to_ebitda: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub interest_coverage: Option<f64>,
    #[serde(default)]
    pub prior_quarter_delta: f64,
    #[serde(default = "default_data_source")]
    pub data_source: String,
}

fn default_data_source() -> String {
    "mock".to_string()
}

impl RatioRecord {
    /// A record with identifiers only; every figure unknown.
    pub fn new(company: impl Into<String>, ticker: impl Into<String>) -> Self {
        RatioRecord {
            company: company.into(),
            ticker: ticker.into(),
            cash: None,
            total_debt: None,
            net_debt: None,
            debt_to_equity: None,
            net_debt_to_ebitda: None,
            current_ratio: None,
            quick_ratio: None,
            interest_coverage: None,
            prior_quarter_delta: 0.0,
            data_source: default_data_source(),
        }
    }

    /// Reported net debt, or `max(0, total_debt - cash)` when both parts are known.
    pub fn derived_net_debt(&self) -> Option<f64> {
        self.net_debt.or_else(|| match (self.total_debt, self.cash) {
            (Some(debt), Some(cash)) => Some((debt - cash).max(0.0)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Red,
    Amber,
    Green,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Status::Green => "Green",
            Status::Amber => "Amber",
            Status::Red => "Red",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub status: Status,
    pub drivers: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Watch,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Watch => "watch",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One news item. The last four fields are filled in by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub summary: String,
    pub outlet: String,
    pub published: DateTime<Utc>,
    pub link: String,
    #[serde(default = "general")]
    pub theme: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub matched_terms: Vec<String>,
    #[serde(default = "general_list")]
    pub developers: Vec<String>,
}

fn general() -> String {
    GENERAL.to_string()
}

fn general_list() -> Vec<String> {
    vec![general()]
}

impl ArticleRecord {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        outlet: impl Into<String>,
        published: DateTime<Utc>,
        link: impl Into<String>,
    ) -> Self {
        ArticleRecord {
            title: title.into(),
            summary: summary.into(),
            outlet: outlet.into(),
            published,
            link: link.into(),
            theme: general(),
            severity: Severity::Info,
            matched_terms: Vec::new(),
            developers: general_list(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSeries {
    pub name: String,
    pub source: String,
    pub unit: String,
    pub values: Vec<MacroPoint>,
}

/// A ratio record flattened with its score, as shown in the listed developers table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedRow {
    pub company: String,
    pub ticker: String,
    pub cash: Option<f64>,
    pub total_debt: Option<f64>,
    pub net_debt: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub net_debt_to_ebitda: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub health_score: f64,
    pub status: Status,
    pub source: String,
    pub drivers: Vec<String>,
}

impl ListedRow {
    pub fn from_scored(record: &RatioRecord, result: ScoreResult) -> Self {
        ListedRow {
            company: record.company.clone(),
            ticker: record.ticker.clone(),
            cash: record.cash,
            total_debt: record.total_debt,
            net_debt: record.derived_net_debt(),
            debt_to_equity: record.debt_to_equity,
            net_debt_to_ebitda: record.net_debt_to_ebitda,
            current_ratio: record.current_ratio,
            quick_ratio: record.quick_ratio,
            interest_coverage: record.interest_coverage,
            health_score: result.score,
            status: result.status,
            source: record.data_source.clone(),
            drivers: result.drivers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_debt_is_derived_only_when_both_parts_known() {
        let mut record = RatioRecord::new("UOL Group", "U14");
        assert_eq!(record.derived_net_debt(), None);

        record.total_debt = Some(500.0);
        record.cash = Some(800.0);
        assert_eq!(record.derived_net_debt(), Some(0.0));

        record.net_debt = Some(42.0);
        assert_eq!(record.derived_net_debt(), Some(42.0));
    }

    #[test]
    fn article_defaults_to_general_classification() {
        let article = ArticleRecord::new("t", "s", "CNA", Utc::now(), "");
        assert_eq!(article.theme, "general");
        assert_eq!(article.severity, Severity::Info);
        assert!(article.matched_terms.is_empty());
        assert_eq!(article.developers, vec!["general".to_string()]);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
