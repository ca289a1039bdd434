// src/services/export.rs
use anyhow::Result;
use csv::Writer;

use crate::models::ListedRow;

const HEADERS: [&str; 14] = [
    "Company",
    "Ticker",
    "Cash",
    "Total Debt",
    "Net Debt",
    "Debt/Equity",
    "Net Debt/EBITDA",
    "Current Ratio",
    "Quick Ratio",
    "Interest Coverage",
    "Health Score",
    "Status",
    "Source",
    "Drivers",
];

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Listed developers table as CSV; unknown ratios are left blank and drivers
/// are joined with "; ".
pub fn listed_to_csv(rows: &[ListedRow]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record([
            row.company.clone(),
            row.ticker.clone(),
            cell(row.cash),
            cell(row.total_debt),
            cell(row.net_debt),
            cell(row.debt_to_equity),
            cell(row.net_debt_to_ebitda),
            cell(row.current_ratio),
            cell(row.quick_ratio),
            cell(row.interest_coverage),
            row.health_score.to_string(),
            row.status.to_string(),
            row.source.clone(),
            row.drivers.join("; "),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
