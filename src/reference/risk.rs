//! Risk levels and their discount rates

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ReferenceError;

/// Discount rate used when a risk level has no entry in the table
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.15;

/// Qualitative risk tolerance selected for a valuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(ReferenceError::UnknownRiskLevel(other.to_string())),
        }
    }
}

/// Discount rate by risk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRates {
    rates: BTreeMap<RiskLevel, f64>,
}

impl RiskRates {
    /// Build from explicit (level, rate) pairs. Rates must lie in (0, 1).
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = (RiskLevel, f64)>,
    {
        let mut rates = BTreeMap::new();
        for (level, rate) in pairs {
            if !(rate > 0.0 && rate < 1.0) {
                return Err(ReferenceError::InvalidRate {
                    level: level.to_string(),
                    rate,
                });
            }
            rates.insert(level, rate);
        }
        Ok(Self { rates })
    }

    /// Rate for a level, falling back to [`DEFAULT_DISCOUNT_RATE`]
    pub fn rate(&self, level: RiskLevel) -> f64 {
        self.rates.get(&level).copied().unwrap_or(DEFAULT_DISCOUNT_RATE)
    }

    /// Rate looked up by raw name; unrecognized names get [`DEFAULT_DISCOUNT_RATE`]
    pub fn rate_by_name(&self, name: &str) -> f64 {
        name.parse::<RiskLevel>()
            .map(|level| self.rate(level))
            .unwrap_or(DEFAULT_DISCOUNT_RATE)
    }

    /// Whether the table carries its own entry for a level
    pub fn contains(&self, level: RiskLevel) -> bool {
        self.rates.contains_key(&level)
    }
}

impl Default for RiskRates {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(RiskLevel::Low, 0.10);    // 10% discount rate
        rates.insert(RiskLevel::Medium, 0.15); // 15% discount rate
        rates.insert(RiskLevel::High, 0.20);   // 20% discount rate
        Self { rates }
    }
}
