//! Valuation engine: EBITDA multiple and discounted cash flow methods
//!
//! Both methods are closed-form. The engine resolves reference data
//! (industry multiple range, risk discount rate) and applies the configured
//! policies for unknown industries and terminal growth.

mod multiple;
mod dcf;
mod engine;

pub use multiple::{EbitdaValuation, risk_adjusted_multiple};
pub use dcf::{
    DcfConfig, DcfValuation, ProjectedYear, TerminalGrowthPolicy, discounted_cash_flow, present_value,
    DEFAULT_PROJECTION_YEARS, DEFAULT_TERMINAL_GROWTH, DEFAULT_TERMINAL_GROWTH_CAP,
};
pub use engine::{IndustryLookup, ValuationEngine};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValuationError;

/// What to do when an industry key is not in the reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Use the default multiple range and flag the result
    #[default]
    Substitute,
    /// Fail with `ValuationError::UnknownIndustry`
    Reject,
}

impl FromStr for FallbackPolicy {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substitute" => Ok(FallbackPolicy::Substitute),
            "reject" => Ok(FallbackPolicy::Reject),
            other => Err(ValuationError::InvalidConfig(format!(
                "unknown fallback policy '{}' (expected substitute or reject)",
                other
            ))),
        }
    }
}

/// Configuration for a valuation engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Unknown industry handling
    pub fallback: FallbackPolicy,

    /// DCF horizon and terminal growth
    pub dcf: DcfConfig,
}

impl ValuationConfig {
    /// Strict variant: unknown industries are errors
    pub fn strict() -> Self {
        Self {
            fallback: FallbackPolicy::Reject,
            ..Default::default()
        }
    }

    pub fn with_terminal_growth(mut self, policy: TerminalGrowthPolicy) -> Self {
        self.dcf.terminal_growth = policy;
        self
    }
}
