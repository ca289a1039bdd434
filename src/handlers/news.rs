// src/handlers/news.rs
use chrono::Utc;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::dashboard::news_report;
use crate::services::news::NewsFilter;
use crate::state::AppState;

pub async fn get_news(
    params: HashMap<String, String>,
    state: Arc<AppState>,
) -> Result<Json, Rejection> {
    info!("Handling request to get developer news");
    let filter = NewsFilter::from_query(&params);
    debug!("News filter: {:?}", filter);

    let report = news_report(&state, &filter, Utc::now()).await;
    Ok(warp::reply::json(&report))
}
