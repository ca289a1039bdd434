// src/main.rs
use dotenv::dotenv;
use log::{error, info, warn};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use sg_developer_monitor::config::AppConfig;
use sg_developer_monitor::logging;
use sg_developer_monitor::routes;
use sg_developer_monitor::services::refresh;
use sg_developer_monitor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();
    info!("Logger initialized. Starting the application...");

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });
    let port: u16 = port_str.parse()?;
    info!("Using PORT: {}", port);

    let config = AppConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;
    let state = Arc::new(AppState::new(config).map_err(|e| {
        error!("Startup error: {}", e);
        e
    })?);

    // Kept alive for the lifetime of the server.
    let _scheduler = refresh::start_scheduler(state.clone()).await?;

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
