// src/bin/fetch_ratios.rs
use dotenv::dotenv;
use log::error;

use sg_developer_monitor::config::AppConfig;
use sg_developer_monitor::logging;
use sg_developer_monitor::services::ratios::fetch_ratios_from_stockanalysis;
use sg_developer_monitor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let state = AppState::new(AppConfig::from_env()?)?;

    for company in &state.config.companies {
        match fetch_ratios_from_stockanalysis(&state.client, company).await {
            Ok(Some(record)) => {
                let result = state.scoring().score(&record);
                println!(
                    "{:<6} {:<40} score={:>5} status={:<5} D/E={:?} ND/EBITDA={:?} CR={:?} QR={:?} IC={:?}",
                    record.ticker,
                    record.company,
                    result.score,
                    result.status,
                    record.debt_to_equity,
                    record.net_debt_to_ebitda,
                    record.current_ratio,
                    record.quick_ratio,
                    record.interest_coverage,
                );
                for driver in &result.drivers {
                    println!("       - {}", driver);
                }
            }
            Ok(None) => println!("{:<6} no ratios found", company.ticker),
            Err(e) => error!("Failed to fetch ratios for {}: {}", company.ticker, e),
        }
    }
    Ok(())
}
