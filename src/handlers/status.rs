// src/handlers/status.rs
use chrono::Utc;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::dashboard::status_report;
use crate::state::AppState;

pub async fn get_status(state: Arc<AppState>) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&status_report(&state, Utc::now())))
}
