// src/handlers/macro_series.rs
use chrono::Utc;
use log::info;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::dashboard::macro_report;
use crate::state::AppState;

pub async fn get_macro(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to get macro series");
    let report = macro_report(&state, Utc::now().date_naive());
    Ok(warp::reply::json(&report))
}
