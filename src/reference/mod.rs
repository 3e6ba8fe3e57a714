//! Valuation reference data: industry multiples and risk discount rates
//!
//! Tables are built once and never mutated, so a single `ReferenceData`
//! can be shared across threads during batch valuation.

mod multiples;
mod risk;
pub mod loader;

pub use multiples::{IndustryMultipleRange, IndustryMultiples, DEFAULT_MULTIPLE_RANGE};
pub use risk::{RiskLevel, RiskRates, DEFAULT_DISCOUNT_RATE};

use log::info;
use std::path::Path;

use crate::error::ReferenceError;

/// Container for all reference tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub industries: IndustryMultiples,
    pub risk_rates: RiskRates,
}

impl ReferenceData {
    pub fn new(industries: IndustryMultiples, risk_rates: RiskRates) -> Self {
        Self { industries, risk_rates }
    }

    /// Load reference tables from CSV files in the default location (data/reference/)
    pub fn from_csv() -> Result<Self, ReferenceError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_REFERENCE_PATH))
    }

    /// Load reference tables from CSV files in a specific directory.
    /// `risk_rates.csv` is optional; without it the default rates apply.
    pub fn from_csv_path(path: &Path) -> Result<Self, ReferenceError> {
        let industries = loader::load_industry_multiples(&path.join(loader::INDUSTRY_MULTIPLES_FILE))?;

        let risk_path = path.join(loader::RISK_RATES_FILE);
        let risk_rates = if risk_path.exists() {
            loader::load_risk_rates(&risk_path)?
        } else {
            RiskRates::default()
        };

        info!(
            "Loaded {} industry multiples from {}",
            industries.len(),
            path.display()
        );

        Ok(Self { industries, risk_rates })
    }

    /// Multiple range for an industry key, if present
    pub fn lookup_industry_range(&self, industry: &str) -> Option<IndustryMultipleRange> {
        self.industries.get(industry)
    }

    /// Discount rate for a risk level (0.15 when the table has no entry)
    pub fn lookup_risk_rate(&self, level: RiskLevel) -> f64 {
        self.risk_rates.rate(level)
    }

    /// Discount rate for a raw risk name (0.15 when unrecognized)
    pub fn lookup_risk_rate_by_name(&self, name: &str) -> f64 {
        self.risk_rates.rate_by_name(name)
    }
}
