// src/services/dashboard.rs
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::Serialize;

use super::news::{NewsFacets, NewsFilter};
use super::{ratios, rss};
use crate::models::{ArticleRecord, ListedRow, MacroSeries, RatioRecord};
use crate::services::scoring::ScoringPolicy;
use crate::state::AppState;

pub const PLANNED_MACRO_CONNECTORS: [&str; 3] = ["data.gov.sg", "SingStat", "URA"];

#[derive(Debug, Serialize)]
pub struct MacroReport {
    pub source: String,
    pub series: Vec<MacroSeries>,
    pub planned_connectors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NewsReport {
    pub lookback_days: i64,
    pub total: usize,
    pub failures: Vec<String>,
    pub facets: NewsFacets,
    pub articles: Vec<ArticleRecord>,
}

#[derive(Debug, Serialize)]
pub struct ListedReport {
    pub rows: Vec<ListedRow>,
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub updated_at: DateTime<Utc>,
    pub pipeline: String,
    pub ok: bool,
    pub errors: Vec<String>,
    pub notes: Vec<String>,
}

pub fn macro_report(state: &AppState, today: NaiveDate) -> MacroReport {
    MacroReport {
        source: state.macro_connector.source_label().to_string(),
        series: state.macro_connector.series(today),
        planned_connectors: PLANNED_MACRO_CONNECTORS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Fetch, classify, then filter. Facets describe the unfiltered feed.
pub async fn news_report(state: &AppState, filter: &NewsFilter, now: DateTime<Utc>) -> NewsReport {
    let settings = &state.config.settings;
    let (articles, failures) = rss::fetch_rss_articles(
        &state.client,
        &state.config.rss_feeds,
        settings.lookback_days,
        settings.cache_ttl_minutes,
        &state.cache,
        now,
    )
    .await;
    if !failures.is_empty() {
        warn!("{} feed(s) failed: {:?}", failures.len(), failures);
    }

    let classified = state.classifier.classify(articles, &state.config.company_names());
    let facets = NewsFacets::collect(&classified);
    let articles = filter.apply(&classified);
    info!("News feed: {} of {} articles after filtering", articles.len(), classified.len());

    NewsReport {
        lookback_days: settings.lookback_days,
        total: classified.len(),
        failures,
        facets,
        articles,
    }
}

pub fn score_rows(policy: &ScoringPolicy, records: &[RatioRecord]) -> Vec<ListedRow> {
    records
        .iter()
        .zip(policy.score_all(records))
        .map(|(record, result)| ListedRow::from_scored(record, result))
        .collect()
}

pub fn scrape_warning(failures: &[String]) -> Option<String> {
    if failures.is_empty() {
        return None;
    }
    Some(format!(
        "StockAnalysis scrape failed for: {}. Falling back to mock ratios for those tickers.",
        failures.join(", ")
    ))
}

pub async fn listed_report(state: &AppState) -> ListedReport {
    let settings = &state.config.settings;
    let (records, failures) = ratios::load_ratios(
        &state.client,
        &state.config.companies,
        settings.ratios_seed,
        settings.enable_stockanalysis_scrape,
    )
    .await;

    ListedReport {
        rows: score_rows(state.scoring(), &records),
        warning: scrape_warning(&failures),
    }
}

pub fn status_report(state: &AppState, now: DateTime<Utc>) -> StatusReport {
    let mut notes = vec![format!(
        "Macro series source: {}.",
        state.macro_connector.source_label()
    )];
    if state.config.settings.enable_stockanalysis_scrape {
        notes.push("Listed ratios: best-effort StockAnalysis scrape over mock fallback.".to_string());
    } else {
        notes.push("Listed ratios: deterministic mock data.".to_string());
    }
    notes.push(format!(
        "News: {} RSS feed(s), {}-day lookback, {}-minute cache.",
        state.config.rss_feeds.len(),
        state.config.settings.lookback_days,
        state.config.settings.cache_ttl_minutes
    ));

    StatusReport {
        updated_at: now,
        pipeline: "live_api".to_string(),
        ok: true,
        errors: Vec::new(),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, CompanyConfig};
    use crate::models::Status;

    fn state() -> AppState {
        let mut config = AppConfig::default();
        config.companies = vec![CompanyConfig {
            name: "UOL Group".to_string(),
            ticker: "U14".to_string(),
            stockanalysis_url: None,
        }];
        config.settings.cache_dir = std::env::temp_dir().join("sgdev-dashboard-test").display().to_string();
        AppState::new(config).unwrap()
    }

    #[test]
    fn rows_carry_scores_and_drivers() {
        let record = RatioRecord::new("Unknown Dev", "XXX");
        let rows = score_rows(&ScoringPolicy::default(), &[record]);
        assert_eq!(rows[0].health_score, 17.0);
        assert_eq!(rows[0].status, Status::Red);
        assert_eq!(rows[0].drivers.len(), 5);
    }

    #[test]
    fn scrape_warning_lists_tickers() {
        assert_eq!(scrape_warning(&[]), None);
        assert_eq!(
            scrape_warning(&["C09".to_string(), "U14".to_string()]).unwrap(),
            "StockAnalysis scrape failed for: C09, U14. Falling back to mock ratios for those tickers."
        );
    }

    #[tokio::test]
    async fn listed_report_scores_mock_rows() {
        let report = listed_report(&state()).await;
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].ticker, "U14");
        assert_eq!(report.rows[0].source, "mock");
        assert!(report.warning.is_none());
    }

    #[tokio::test]
    async fn news_report_without_feeds_is_empty() {
        let report = news_report(&state(), &NewsFilter::default(), Utc::now()).await;
        assert_eq!(report.total, 0);
        assert!(report.failures.is_empty());
        assert!(report.articles.is_empty());
    }

    #[test]
    fn macro_report_lists_planned_connectors() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let report = macro_report(&state(), today);
        assert_eq!(report.source, "MOCK");
        assert_eq!(report.series.len(), 4);
        assert_eq!(report.planned_connectors, vec!["data.gov.sg", "SingStat", "URA"]);
    }
}
