// src/handlers/listed.rs
use log::{error, info, warn};
use std::sync::Arc;
use warp::reply::Json;
use warp::{Rejection, Reply};

use super::error::ApiError;
use crate::services::dashboard::listed_report;
use crate::services::export::listed_to_csv;
use crate::state::AppState;

pub async fn get_listed(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to get listed developer health");
    let report = listed_report(&state).await;
    if let Some(warning) = &report.warning {
        warn!("{}", warning);
    }
    Ok(warp::reply::json(&report))
}

pub async fn get_listed_csv(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    info!("Handling request to export listed developers as CSV");
    let report = listed_report(&state).await;
    let body = listed_to_csv(&report.rows).map_err(|e| {
        error!("Failed to export listed developers: {}", e);
        warp::reject::custom(ApiError::export_error(e.to_string()))
    })?;
    Ok(warp::reply::with_header(body, "content-type", "text/csv; charset=utf-8"))
}
