//! Valuation request inputs and their validation rules

use serde::{Deserialize, Serialize};

use crate::error::{ValuationError, ValuationResult};
use crate::reference::RiskLevel;

/// Financial figures describing the business being valued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    /// Annual revenue, must be positive
    pub revenue: f64,

    /// Annual EBITDA; zero and negative values are allowed
    pub ebitda: f64,

    /// Expected annual growth rate in percent (5.0 = 5%)
    pub growth_rate: f64,

    /// Industry key into the multiples table
    pub industry: String,

    pub risk_level: RiskLevel,

    /// Used only to narrow comparables
    #[serde(default)]
    pub location: Option<String>,

    /// Gross margin in percent, informational
    #[serde(default)]
    pub gross_margin: Option<f64>,
}

impl ValuationInput {
    /// Check every rule and report all failures together
    pub fn validate(&self) -> ValuationResult<()> {
        let mut errors = Vec::new();

        if !(self.revenue > 0.0) || !self.revenue.is_finite() {
            errors.push("Revenue must be greater than 0".to_string());
        }

        if !self.ebitda.is_finite() {
            errors.push("EBITDA is required".to_string());
        }

        if !self.growth_rate.is_finite() {
            errors.push("Growth rate must be a number".to_string());
        }

        if let Some(margin) = self.gross_margin {
            if !(0.0..=100.0).contains(&margin) {
                errors.push("Gross Margin must be between 0 and 100".to_string());
            }
        }

        if self.industry.trim().is_empty() {
            errors.push("Industry is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValuationError::InvalidInput(errors))
        }
    }

    /// EBITDA as a percentage of revenue
    pub fn ebitda_margin(&self) -> Option<f64> {
        if self.revenue > 0.0 {
            Some(self.ebitda / self.revenue * 100.0)
        } else {
            None
        }
    }
}
