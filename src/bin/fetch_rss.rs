// src/bin/fetch_rss.rs
use chrono::Utc;
use dotenv::dotenv;

use sg_developer_monitor::config::AppConfig;
use sg_developer_monitor::logging;
use sg_developer_monitor::services::dashboard::news_report;
use sg_developer_monitor::services::dates::display_sgt;
use sg_developer_monitor::services::news::NewsFilter;
use sg_developer_monitor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let state = AppState::new(AppConfig::from_env()?)?;
    let report = news_report(&state, &NewsFilter::default(), Utc::now()).await;

    for failure in &report.failures {
        println!("FAILED  {}", failure);
    }
    for article in &report.articles {
        println!(
            "{:<8} {} | {} | theme={} | matched={} | developer={}",
            article.severity.as_str().to_uppercase(),
            display_sgt(article.published),
            article.outlet,
            article.theme,
            if article.matched_terms.is_empty() { "none".to_string() } else { article.matched_terms.join(", ") },
            article.developers.join(", "),
        );
        println!("         {}", article.title);
    }
    println!(
        "{} articles in the last {} days, {} feed failure(s)",
        report.total,
        report.lookback_days,
        report.failures.len()
    );
    Ok(())
}
