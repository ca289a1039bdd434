// src/services/ratios.rs
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::config::CompanyConfig;
use crate::models::RatioRecord;

pub type Result<T> = std::result::Result<T, crate::BoxError>;

pub const SCRAPE_SOURCE: &str = "stockanalysis_stub";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Deterministic ratio rows, one per company in config order.
pub fn mock_ratios(companies: &[CompanyConfig], seed: u64) -> Vec<RatioRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    companies
        .iter()
        .map(|company| {
            let cash = round2(rng.gen_range(120.0..2800.0));
            let debt = round2(rng.gen_range(300.0..6500.0));
            let debt_to_equity = round2(rng.gen_range(0.2..2.4));
            let net_debt_to_ebitda = round2(rng.gen_range(1.2..10.5));
            let current_ratio = round2(rng.gen_range(0.6..2.1));
            let quick_ratio = round2((current_ratio - rng.gen_range(0.0..0.5)).max(0.2));
            let interest_coverage = round2(rng.gen_range(0.5..8.5));
            let prior_quarter_delta = round2(rng.gen_range(-1.5..2.5));

            RatioRecord {
                company: company.name.clone(),
                ticker: company.ticker.clone(),
                cash: Some(cash),
                total_debt: Some(debt),
                net_debt: Some(round2((debt - cash).max(0.0))),
                debt_to_equity: Some(debt_to_equity),
                net_debt_to_ebitda: Some(net_debt_to_ebitda),
                current_ratio: Some(current_ratio),
                quick_ratio: Some(quick_ratio),
                interest_coverage: Some(interest_coverage),
                prior_quarter_delta,
                data_source: "mock".to_string(),
            }
        })
        .collect()
}

/// Ratios found on a StockAnalysis page. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScrapedRatios {
    pub debt_to_equity: Option<f64>,
    pub net_debt_to_ebitda: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub interest_coverage: Option<f64>,
}

impl ScrapedRatios {
    pub fn is_empty(&self) -> bool {
        self == &ScrapedRatios::default()
    }

    fn slot(&mut self, label: &str) -> Option<&mut Option<f64>> {
        match label {
            "Debt / Equity" => Some(&mut self.debt_to_equity),
            "Net Debt / EBITDA" => Some(&mut self.net_debt_to_ebitda),
            "Current Ratio" => Some(&mut self.current_ratio),
            "Quick Ratio" => Some(&mut self.quick_ratio),
            "Interest Coverage" => Some(&mut self.interest_coverage),
            _ => None,
        }
    }
}

/// Strip everything but digits, '-' and '.', then parse. Blank cells are unknown.
pub fn to_float(raw: &str) -> Option<f64> {
    let re = Regex::new(r"[^\d\-.]").ok()?;
    let cleaned = re.replace_all(raw, "");
    match cleaned.as_ref() {
        "" | "-" | "." => None,
        value => value.parse::<f64>().ok(),
    }
}

/// Walk every table row and pick up the labelled ratios (first cell label,
/// second cell value).
pub fn parse_ratio_tables(html: &str) -> ScrapedRatios {
    let document = Html::parse_document(html);
    let mut ratios = ScrapedRatios::default();
    let (Ok(row_selector), Ok(cell_selector)) = (Selector::parse("table tr"), Selector::parse("th, td"))
    else {
        return ratios;
    };

    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        if cells.len() < 2 {
            continue;
        }
        if let Some(slot) = ratios.slot(&cells[0]) {
            *slot = to_float(&cells[1]);
        }
    }
    ratios
}

/// Best effort: `Ok(None)` when the company has no page or the page had no ratios.
pub async fn fetch_ratios_from_stockanalysis(
    client: &Client,
    company: &CompanyConfig,
) -> Result<Option<RatioRecord>> {
    let Some(url) = company.stockanalysis_url.as_deref().filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    info!("Fetching StockAnalysis ratios for {} from {}", company.ticker, url);

    let html = client.get(url).send().await?.error_for_status()?.text().await?;
    let scraped = parse_ratio_tables(&html);
    if scraped.is_empty() {
        warn!("No ratios found on StockAnalysis page for {}", company.ticker);
        return Ok(None);
    }

    Ok(Some(RatioRecord {
        debt_to_equity: scraped.debt_to_equity,
        net_debt_to_ebitda: scraped.net_debt_to_ebitda,
        current_ratio: scraped.current_ratio,
        quick_ratio: scraped.quick_ratio,
        interest_coverage: scraped.interest_coverage,
        data_source: SCRAPE_SOURCE.to_string(),
        ..RatioRecord::new(company.name.clone(), company.ticker.clone())
    }))
}

/// Scraped ratios keep the mock row's absolute figures and trend signal.
pub fn merge_scraped(mut scraped: RatioRecord, mock_row: &RatioRecord) -> RatioRecord {
    scraped.cash = mock_row.cash;
    scraped.total_debt = mock_row.total_debt;
    scraped.net_debt = mock_row.net_debt;
    scraped.prior_quarter_delta = mock_row.prior_quarter_delta;
    scraped
}

/// Mock rows, with scraped ratios swapped in where scraping succeeds.
/// Returns the rows and the tickers whose scrape failed.
pub async fn load_ratios(
    client: &Client,
    companies: &[CompanyConfig],
    seed: u64,
    use_scrape: bool,
) -> (Vec<RatioRecord>, Vec<String>) {
    let mock = mock_ratios(companies, seed);
    if !use_scrape {
        return (mock, Vec::new());
    }

    let mut merged = Vec::with_capacity(mock.len());
    let mut failures = Vec::new();
    for (company, mock_row) in companies.iter().zip(mock) {
        match fetch_ratios_from_stockanalysis(client, company).await {
            Ok(Some(parsed)) => merged.push(merge_scraped(parsed, &mock_row)),
            Ok(None) => {
                failures.push(company.ticker.clone());
                merged.push(mock_row);
            }
            Err(e) => {
                warn!("Failed to fetch StockAnalysis page for {}: {}", company.ticker, e);
                failures.push(company.ticker.clone());
                merged.push(mock_row);
            }
        }
    }
    (merged, failures)
}
