// src/services/scoring.rs
use serde::{Deserialize, Serialize};

use crate::models::{RatioRecord, ScoreResult, Status};

/// Which side of the threshold counts as a breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breach {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: f64,
    pub penalty: f64,
}

/// Two-tier penalty for one ratio. Only severe breaches produce a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRule {
    pub breach: Breach,
    /// Value assumed when the ratio is unknown.
    pub fallback: f64,
    pub severe: Tier,
    #[serde(default)]
    pub moderate: Option<Tier>,
    pub driver: String,
}

impl DimensionRule {
    fn breached(&self, value: f64, tier: &Tier) -> bool {
        match self.breach {
            Breach::Above => value > tier.threshold,
            Breach::Below => value < tier.threshold,
        }
    }

    /// Penalty and optional driver for a (possibly unknown) ratio.
    pub fn evaluate(&self, value: Option<f64>) -> (f64, Option<&str>) {
        let value = value.unwrap_or(self.fallback);
        if self.breached(value, &self.severe) {
            return (self.severe.penalty, Some(self.driver.as_str()));
        }
        match &self.moderate {
            Some(tier) if self.breached(value, tier) => (tier.penalty, None),
            _ => (0.0, None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRule {
    pub multiplier: f64,
    pub cap: f64,
    pub driver: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusCutoffs {
    pub green: f64,
    pub amber: f64,
}

impl StatusCutoffs {
    pub fn status_for(&self, score: f64) -> Status {
        if score >= self.green {
            Status::Green
        } else if score >= self.amber {
            Status::Amber
        } else {
            Status::Red
        }
    }
}

/// Every constant the scorer uses. `Default` is the baseline policy; any part
/// can be overridden from the configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub baseline: f64,
    pub net_debt_to_ebitda: DimensionRule,
    pub debt_to_equity: DimensionRule,
    pub current_ratio: DimensionRule,
    pub quick_ratio: DimensionRule,
    pub interest_coverage: DimensionRule,
    pub trend: TrendRule,
    pub cutoffs: StatusCutoffs,
    pub no_driver_message: String,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            baseline: 100.0,
            net_debt_to_ebitda: DimensionRule {
                breach: Breach::Above,
                fallback: 8.0,
                severe: Tier { threshold: 6.0, penalty: 20.0 },
                moderate: Some(Tier { threshold: 4.0, penalty: 10.0 }),
                driver: "High net debt/EBITDA".to_string(),
            },
            debt_to_equity: DimensionRule {
                breach: Breach::Above,
                fallback: 2.0,
                severe: Tier { threshold: 1.5, penalty: 18.0 },
                moderate: Some(Tier { threshold: 1.0, penalty: 10.0 }),
                driver: "High debt/equity".to_string(),
            },
            current_ratio: DimensionRule {
                breach: Breach::Below,
                fallback: 0.8,
                severe: Tier { threshold: 1.0, penalty: 15.0 },
                moderate: None,
                driver: "Low current ratio".to_string(),
            },
            quick_ratio: DimensionRule {
                breach: Breach::Below,
                fallback: 0.6,
                severe: Tier { threshold: 0.8, penalty: 10.0 },
                moderate: None,
                driver: "Low quick ratio".to_string(),
            },
            interest_coverage: DimensionRule {
                breach: Breach::Below,
                fallback: 1.0,
                severe: Tier { threshold: 1.5, penalty: 20.0 },
                moderate: Some(Tier { threshold: 3.0, penalty: 8.0 }),
                driver: "Weak interest coverage".to_string(),
            },
            trend: TrendRule {
                multiplier: 6.0,
                cap: 15.0,
                driver: "Deterioration vs prior quarter".to_string(),
            },
            cutoffs: StatusCutoffs { green: 70.0, amber: 45.0 },
            no_driver_message: "No major risk drivers from selected ratios".to_string(),
        }
    }
}

impl ScoringPolicy {
    pub fn score(&self, record: &RatioRecord) -> ScoreResult {
        let mut score = self.baseline;
        let mut drivers: Vec<String> = Vec::new();

        let dimensions = [
            (&self.net_debt_to_ebitda, record.net_debt_to_ebitda),
            (&self.debt_to_equity, record.debt_to_equity),
            (&self.current_ratio, record.current_ratio),
            (&self.quick_ratio, record.quick_ratio),
            (&self.interest_coverage, record.interest_coverage),
        ];
        for (rule, value) in dimensions {
            let (penalty, driver) = rule.evaluate(value);
            score -= penalty;
            if let Some(driver) = driver {
                drivers.push(driver.to_string());
            }
        }

        if record.prior_quarter_delta > 0.0 {
            score -= (record.prior_quarter_delta * self.trend.multiplier).min(self.trend.cap);
            drivers.push(self.trend.driver.clone());
        }

        let score = round_one_decimal(score.clamp(0.0, 100.0));
        let status = self.cutoffs.status_for(score);

        if drivers.is_empty() {
            drivers.push(self.no_driver_message.clone());
        }

        ScoreResult { score, status, drivers }
    }

    /// One result per record, in input order.
    pub fn score_all(&self, records: &[RatioRecord]) -> Vec<ScoreResult> {
        records.iter().map(|r| self.score(r)).collect()
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Score a company with the baseline policy.
pub fn score_company(record: &RatioRecord) -> ScoreResult {
    ScoringPolicy::default().score(record)
}
