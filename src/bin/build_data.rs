// src/bin/build_data.rs
//
// Writes the static dashboard datasets (macro, news, listed, status) from
// mock inputs so the frontend can be served without the API.
use chrono::{Duration, TimeZone, Utc};
use dotenv::dotenv;
use log::info;
use serde::Serialize;
use serde_json::json;
use std::env;
use std::fs;
use std::path::Path;

use sg_developer_monitor::config::AppConfig;
use sg_developer_monitor::logging;
use sg_developer_monitor::models::ArticleRecord;
use sg_developer_monitor::services::dashboard::score_rows;
use sg_developer_monitor::services::export::listed_to_csv;
use sg_developer_monitor::services::ratios::mock_ratios;
use sg_developer_monitor::state::AppState;

const SAMPLE_NEWS: [(&str, &str, &str, &str); 6] = [
    (
        "City Developments secures bridge loan ahead of debt maturity",
        "Business Times",
        "The group refinanced a major facility as liquidity planning intensifies.",
        "https://example.com/news/cdl-bridge-loan",
    ),
    (
        "GuocoLand reports construction delay at flagship mixed-use project",
        "The Edge Singapore",
        "Delay may push TOP timelines and raise carrying costs.",
        "https://example.com/news/guocoland-delay",
    ),
    (
        "Mapletree Pan Asia Commercial Trust receives covenant waiver from lenders",
        "Reuters",
        "Waiver tied to temporary covenant breach after valuation decline.",
        "https://example.com/news/mpact-waiver",
    ),
    (
        "CapitaLand Investment sees stable sales despite price cut campaign",
        "CNA",
        "Bulk sale discount strategy used to sustain momentum in select assets.",
        "https://example.com/news/cli-price-cut",
    ),
    (
        "Legal filing seeks winding up of small contractor tied to project",
        "Straits Times",
        "No immediate default by listed sponsor was disclosed.",
        "https://example.com/news/winding-up-filing",
    ),
    (
        "UOL Group reports resilient liquidity position in latest update",
        "SG Investors",
        "Management highlighted conservative balance sheet and rating stability.",
        "https://example.com/news/uol-liquidity",
    ),
];

fn sample_articles() -> Vec<ArticleRecord> {
    let base = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).single().unwrap_or_else(Utc::now);
    SAMPLE_NEWS
        .iter()
        .enumerate()
        .map(|(i, (title, outlet, summary, url))| {
            ArticleRecord::new(*title, *summary, *outlet, base + Duration::days(i as i64), *url)
        })
        .collect()
}

fn write_json<T: Serialize>(dir: &Path, filename: &str, payload: &T) -> anyhow::Result<()> {
    let path = dir.join(filename);
    fs::write(&path, serde_json::to_string_pretty(payload)?)?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let out_dir = env::args().nth(1).unwrap_or_else(|| "public/data".to_string());
    let out_dir = Path::new(&out_dir);
    fs::create_dir_all(out_dir)?;

    let state = AppState::new(AppConfig::from_env()?)?;
    let config = &state.config;
    let updated_at = Utc::now();

    let records = mock_ratios(&config.companies, config.settings.ratios_seed);
    let rows = score_rows(state.scoring(), &records);
    write_json(
        out_dir,
        "listed.json",
        &json!({
            "updated_at": updated_at,
            "companies": config.company_names(),
            "rows": rows,
        }),
    )?;
    fs::write(out_dir.join("listed.csv"), listed_to_csv(&rows)?)?;

    let mut items = state.classifier.classify(sample_articles(), &config.company_names());
    items.sort_by(|a, b| b.published.cmp(&a.published));
    write_json(out_dir, "news.json", &json!({ "updated_at": updated_at, "items": items }))?;

    let today = updated_at.date_naive();
    write_json(
        out_dir,
        "macro.json",
        &json!({
            "updated_at": updated_at,
            "source": state.macro_connector.source_label(),
            "series": state.macro_connector.series(today),
        }),
    )?;

    write_json(
        out_dir,
        "status.json",
        &json!({
            "updated_at": updated_at,
            "pipeline": "mock_build",
            "ok": true,
            "errors": [],
            "notes": [
                "POC mode with deterministic mock data.",
                "Live connectors for macro, news and ratios are not wired into this build.",
            ],
        }),
    )?;

    println!("Datasets written to {}", out_dir.display());
    Ok(())
}
