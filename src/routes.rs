// src/routes.rs
use log::info;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::{
    listed::get_listed, listed::get_listed_csv, macro_series::get_macro, news::get_news,
    status::get_status,
};
use crate::state::AppState;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found";
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = api_error.message.as_str();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query string";
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed";
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error";
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let macro_route = warp::path!("api" / "v1" / "macro")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_macro);

    let news_route = warp::path!("api" / "v1" / "news")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(state_filter.clone())
        .and_then(get_news);

    let listed_route = warp::path!("api" / "v1" / "listed")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_listed);

    let listed_csv_route = warp::path!("api" / "v1" / "listed.csv")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_listed_csv);

    let status_route = warp::path!("api" / "v1" / "status")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_status);

    info!("All routes configured successfully.");

    macro_route
        .or(news_route)
        .or(listed_route)
        .or(listed_csv_route)
        .or(status_route)
        .recover(handle_rejection)
}
