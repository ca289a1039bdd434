// src/state.rs
use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

use crate::config::AppConfig;
use crate::services::cache::FileCache;
use crate::services::classifier::Classifier;
use crate::services::macro_data::MacroConnector;
use crate::services::scoring::ScoringPolicy;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; sg-developer-monitor/0.1)";

/// Everything a request needs; built once at startup and shared read-only.
pub struct AppState {
    pub config: AppConfig,
    pub classifier: Classifier,
    pub macro_connector: MacroConnector,
    pub client: Client,
    pub cache: FileCache,
}

impl AppState {
    /// Fails for an invalid taxonomy or an unimplemented macro source, so
    /// misconfiguration surfaces before the server starts.
    pub fn new(config: AppConfig) -> Result<Self> {
        let classifier = Classifier::new(config.taxonomy.clone())?;
        let macro_connector =
            MacroConnector::resolve(config.settings.macro_source, config.settings.macro_seed)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.settings.http_timeout_secs))
            .build()?;
        let cache = FileCache::new(&config.settings.cache_dir);

        Ok(AppState {
            config,
            classifier,
            macro_connector,
            client,
            cache,
        })
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.config.scoring
    }
}
