// src/config.rs
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::MonitorError;
use crate::services::classifier::Taxonomy;
use crate::services::macro_data::MacroSourceKind;
use crate::services::scoring::ScoringPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub stockanalysis_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "unknown_feed")]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

fn unknown_feed() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lookback_days: i64,
    pub cache_ttl_minutes: i64,
    pub cache_dir: String,
    pub enable_stockanalysis_scrape: bool,
    pub http_timeout_secs: u64,
    pub macro_source: MacroSourceKind,
    pub macro_seed: u64,
    pub ratios_seed: u64,
    /// Six-field cron expression for the background RSS refresh; `None` disables it.
    pub refresh_cron: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            lookback_days: 30,
            cache_ttl_minutes: 60,
            cache_dir: "data".to_string(),
            enable_stockanalysis_scrape: false,
            http_timeout_secs: 10,
            macro_source: MacroSourceKind::Mock,
            macro_seed: 42,
            ratios_seed: 7,
            refresh_cron: None,
        }
    }
}

impl Settings {
    pub const MAX_LOOKBACK_DAYS: i64 = 3650;
    pub const MAX_CACHE_TTL_MINUTES: i64 = 60 * 24 * 365;

    /// Reset out-of-range windows to their defaults.
    pub fn sanitize(&mut self) {
        let defaults = Settings::default();
        if !(1..=Self::MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            warn!(
                "lookback_days {} outside 1..={}, using {}",
                self.lookback_days,
                Self::MAX_LOOKBACK_DAYS,
                defaults.lookback_days
            );
            self.lookback_days = defaults.lookback_days;
        }
        if !(0..=Self::MAX_CACHE_TTL_MINUTES).contains(&self.cache_ttl_minutes) {
            warn!(
                "cache_ttl_minutes {} outside 0..={}, using {}",
                self.cache_ttl_minutes,
                Self::MAX_CACHE_TTL_MINUTES,
                defaults.cache_ttl_minutes
            );
            self.cache_ttl_minutes = defaults.cache_ttl_minutes;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub companies: Vec<CompanyConfig>,
    pub rss_feeds: Vec<FeedConfig>,
    pub settings: Settings,
    pub scoring: ScoringPolicy,
    pub taxonomy: Taxonomy,
}

impl AppConfig {
    pub fn from_json(raw: &str, path: &str) -> Result<Self, MonitorError> {
        let mut config: AppConfig =
            serde_json::from_str(raw).map_err(|source| MonitorError::ConfigParse {
                path: path.to_string(),
                source,
            })?;
        config.settings.sanitize();
        Ok(config)
    }

    /// Read the config document. A missing file yields the built-in defaults.
    pub fn load(path: &str) -> Result<Self, MonitorError> {
        if !Path::new(path).exists() {
            warn!("Config {} not found, using built-in defaults", path);
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| MonitorError::ConfigIo {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_json(&raw, path)?;
        info!(
            "Loaded config {} ({} companies, {} feeds)",
            path,
            config.companies.len(),
            config.rss_feeds.len()
        );
        Ok(config)
    }

    /// `CONFIG_PATH` (or the default path) with environment overrides applied.
    pub fn from_env() -> Result<Self, MonitorError> {
        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(&path)?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup("ENABLE_STOCKANALYSIS_SCRAPE") {
            self.settings.enable_stockanalysis_scrape = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Some(dir) = lookup("CACHE_DIR") {
            if !dir.trim().is_empty() {
                self.settings.cache_dir = dir;
            }
        }
    }

    /// Entity display names used for news linkage, in config order.
    pub fn company_names(&self) -> Vec<String> {
        self.companies.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_json("{}", "inline").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.settings.lookback_days, 30);
        assert_eq!(config.taxonomy.themes[0].theme, "legal");
    }

    #[test]
    fn sections_parse_and_merge_with_defaults() {
        let raw = r#"{
            "companies": [
                { "name": "City Developments", "ticker": "C09",
                  "stockanalysis_url": "https://stockanalysis.com/quote/sgx/C09/financials/ratios/" }
            ],
            "rss_feeds": [ { "name": "Business Times", "url": "https://example.com/rss" }, {} ],
            "settings": { "lookback_days": 7, "macro_source": "mock" }
        }"#;
        let config = AppConfig::from_json(raw, "inline").unwrap();
        assert_eq!(config.company_names(), vec!["City Developments".to_string()]);
        assert_eq!(config.rss_feeds[1].name, "unknown");
        assert_eq!(config.rss_feeds[1].url, "");
        assert_eq!(config.settings.lookback_days, 7);
        assert_eq!(config.settings.cache_ttl_minutes, 60);
    }

    #[test]
    fn out_of_range_windows_fall_back_to_defaults() {
        let raw = format!(
            r#"{{ "settings": {{ "lookback_days": {}, "cache_ttl_minutes": {} }} }}"#,
            i64::MAX / 2,
            i64::MAX
        );
        let config = AppConfig::from_json(&raw, "inline").unwrap();
        assert_eq!(config.settings.lookback_days, 30);
        assert_eq!(config.settings.cache_ttl_minutes, 60);

        let config =
            AppConfig::from_json(r#"{ "settings": { "lookback_days": 0, "cache_ttl_minutes": -5 } }"#, "inline")
                .unwrap();
        assert_eq!(config.settings.lookback_days, 30);
        assert_eq!(config.settings.cache_ttl_minutes, 60);

        let config =
            AppConfig::from_json(r#"{ "settings": { "lookback_days": 3650, "cache_ttl_minutes": 0 } }"#, "inline")
                .unwrap();
        assert_eq!(config.settings.lookback_days, 3650);
        assert_eq!(config.settings.cache_ttl_minutes, 0);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = AppConfig::from_json("{ not json", "broken.json").unwrap_err();
        assert!(matches!(err, MonitorError::ConfigParse { .. }));
    }

    #[test]
    fn env_flag_overrides_scrape_setting() {
        let mut config = AppConfig::default();
        config.settings.enable_stockanalysis_scrape = true;
        config.apply_overrides(|key| match key {
            "ENABLE_STOCKANALYSIS_SCRAPE" => Some("FALSE".to_string()),
            "CACHE_DIR" => Some("/tmp/sgdev".to_string()),
            _ => None,
        });
        assert!(!config.settings.enable_stockanalysis_scrape);
        assert_eq!(config.settings.cache_dir, "/tmp/sgdev");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does/not/exist.json").unwrap();
        assert!(config.companies.is_empty());
    }
}
