// src/services/refresh.rs
use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{error, info};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use super::rss::fetch_rss_articles;
use crate::state::AppState;

/// Pull every feed once so the file cache is warm for the next request.
pub async fn refresh_feeds(state: &AppState) -> usize {
    let settings = &state.config.settings;
    let (articles, failures) = fetch_rss_articles(
        &state.client,
        &state.config.rss_feeds,
        settings.lookback_days,
        settings.cache_ttl_minutes,
        &state.cache,
        Utc::now(),
    )
    .await;
    for failure in &failures {
        error!("Feed refresh failure: {}", failure);
    }
    info!("Feed refresh complete: {} articles, {} failures", articles.len(), failures.len());
    articles.len()
}

/// Start the background refresh job if `settings.refresh_cron` is set.
pub async fn start_scheduler(state: Arc<AppState>) -> Result<Option<JobScheduler>> {
    let Some(schedule) = state.config.settings.refresh_cron.clone() else {
        info!("No refresh_cron configured, background feed refresh disabled");
        return Ok(None);
    };

    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| anyhow!("failed to create scheduler: {:?}", e))?;

    let job_state = state.clone();
    let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
        let state = job_state.clone();
        Box::pin(async move {
            refresh_feeds(&state).await;
        })
    })
    .map_err(|e| anyhow!("invalid refresh_cron '{}': {:?}", schedule, e))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| anyhow!("failed to add refresh job: {:?}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| anyhow!("failed to start scheduler: {:?}", e))?;
    info!("Background feed refresh scheduled: {}", schedule);

    Ok(Some(scheduler))
}
