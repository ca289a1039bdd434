// src/services/macro_data.rs
use chrono::{Duration, NaiveDate};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::MonitorError;
use crate::models::{MacroPoint, MacroSeries};

const POINTS_PER_SERIES: i64 = 36;
const DAYS_BETWEEN_POINTS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroSourceKind {
    #[default]
    Mock,
    DataGov,
    SingStat,
    Ura,
}

/// Where the macro tab gets its series from. Only the mock is wired up.
#[derive(Debug, Clone, PartialEq)]
pub enum MacroConnector {
    Mock { seed: u64 },
}

impl MacroConnector {
    /// Resolve the configured source, failing at startup for live sources
    /// that have no implementation yet.
    pub fn resolve(kind: MacroSourceKind, seed: u64) -> Result<Self, MonitorError> {
        match kind {
            MacroSourceKind::Mock => Ok(MacroConnector::Mock { seed }),
            MacroSourceKind::DataGov => Err(MonitorError::NotConfigured("data.gov.sg")),
            MacroSourceKind::SingStat => Err(MonitorError::NotConfigured("SingStat")),
            MacroSourceKind::Ura => Err(MonitorError::NotConfigured("URA")),
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            MacroConnector::Mock { .. } => "MOCK",
        }
    }

    pub fn series(&self, today: NaiveDate) -> Vec<MacroSeries> {
        match self {
            MacroConnector::Mock { seed } => mock_dashboard_series(*seed, today),
        }
    }
}

struct SeriesShape {
    name: &'static str,
    unit: &'static str,
    base: f64,
    step: f64,
    noise: f64,
}

const DASHBOARD_SERIES: [SeriesShape; 4] = [
    SeriesShape { name: "SORA Proxy", unit: "%", base: 2.4, step: 0.01, noise: 0.08 },
    SeriesShape {
        name: "Private Residential Price Index Proxy",
        unit: "index",
        base: 150.0,
        step: 0.6,
        noise: 1.2,
    },
    SeriesShape { name: "New Home Sales Volume Proxy", unit: "units", base: 780.0, step: 3.0, noise: 40.0 },
    SeriesShape {
        name: "Construction Cost Pressure Proxy",
        unit: "index",
        base: 110.0,
        step: 0.35,
        noise: 0.7,
    },
];

// FNV-1a, so per-series seeds stay stable across toolchains.
fn series_seed(seed: u64, name: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325 ^ seed;
    for byte in name.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn build_series(shape: &SeriesShape, seed: u64, today: NaiveDate) -> MacroSeries {
    let mut rng = StdRng::seed_from_u64(series_seed(seed, shape.name));
    let values = (0..POINTS_PER_SERIES)
        .map(|idx| {
            let date = today - Duration::days((POINTS_PER_SERIES - 1 - idx) * DAYS_BETWEEN_POINTS);
            let jitter = rng.gen_range(-shape.noise..=shape.noise);
            let value = (shape.base + idx as f64 * shape.step + jitter).max(0.0);
            MacroPoint { date, value: (value * 100.0).round() / 100.0 }
        })
        .collect();

    MacroSeries {
        name: shape.name.to_string(),
        source: "MOCK".to_string(),
        unit: shape.unit.to_string(),
        values,
    }
}

pub fn mock_dashboard_series(seed: u64, today: NaiveDate) -> Vec<MacroSeries> {
    info!("Generating mock macro series (seed {})", seed);
    DASHBOARD_SERIES.iter().map(|shape| build_series(shape, seed, today)).collect()
}
