//! Discounted cash flow valuation with a Gordon growth terminal value
//!
//! EBITDA is used as the cash flow proxy. Cash flows grow at the input
//! growth rate over the explicit horizon, each year is discounted at the
//! risk-driven rate, and the final year's cash flow seeds a perpetuity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ValuationError, ValuationResult};

/// Terminal growth rate used by [`TerminalGrowthPolicy::Fixed`] by default
pub const DEFAULT_TERMINAL_GROWTH: f64 = 0.02;

/// Cap used by [`TerminalGrowthPolicy::CappedAtGrowth`] by default
pub const DEFAULT_TERMINAL_GROWTH_CAP: f64 = 0.03;

/// Explicit projection horizon in years
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

/// Longest explicit horizon a config may request
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// How the perpetuity growth rate is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TerminalGrowthPolicy {
    /// Same rate regardless of the input growth rate
    Fixed { rate: f64 },
    /// Input growth rate, capped: `min(growth / 100, cap)`
    CappedAtGrowth { cap: f64 },
}

impl TerminalGrowthPolicy {
    /// Terminal growth rate (decimal) for an input growth rate in percent
    pub fn rate_for(&self, growth_rate_percent: f64) -> f64 {
        match *self {
            TerminalGrowthPolicy::Fixed { rate } => rate,
            TerminalGrowthPolicy::CappedAtGrowth { cap } => (growth_rate_percent / 100.0).min(cap),
        }
    }
}

impl Default for TerminalGrowthPolicy {
    fn default() -> Self {
        TerminalGrowthPolicy::Fixed { rate: DEFAULT_TERMINAL_GROWTH }
    }
}

impl fmt::Display for TerminalGrowthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalGrowthPolicy::Fixed { rate } => write!(f, "fixed at {:.1}%", rate * 100.0),
            TerminalGrowthPolicy::CappedAtGrowth { cap } => {
                write!(f, "growth capped at {:.1}%", cap * 100.0)
            }
        }
    }
}

impl FromStr for TerminalGrowthPolicy {
    type Err = ValuationError;

    /// Accepts `fixed` and `capped` with their default rates
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(TerminalGrowthPolicy::Fixed { rate: DEFAULT_TERMINAL_GROWTH }),
            "capped" => Ok(TerminalGrowthPolicy::CappedAtGrowth { cap: DEFAULT_TERMINAL_GROWTH_CAP }),
            other => Err(ValuationError::InvalidConfig(format!(
                "unknown terminal growth policy '{}' (expected fixed or capped)",
                other
            ))),
        }
    }
}

/// Configuration for DCF valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfConfig {
    /// Number of explicitly projected years before the terminal value
    pub projection_years: u32,

    /// Terminal growth rate policy
    pub terminal_growth: TerminalGrowthPolicy,
}

impl Default for DcfConfig {
    fn default() -> Self {
        Self {
            projection_years: DEFAULT_PROJECTION_YEARS,
            terminal_growth: TerminalGrowthPolicy::default(),
        }
    }
}

/// One year of the explicit projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedYear {
    pub year: u32,
    pub cash_flow: f64,
    pub present_value: f64,
}

/// DCF result with its components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfValuation {
    pub discount_rate: f64,
    pub terminal_growth_rate: f64,
    pub years: Vec<ProjectedYear>,
    /// Sum of present values over the explicit horizon
    pub explicit_present_value: f64,
    /// Terminal value at the end of the horizon (undiscounted)
    pub terminal_value: f64,
    pub present_terminal_value: f64,
    /// Enterprise value: explicit PV plus discounted terminal value
    pub total: f64,
}

impl DcfValuation {
    /// Share of the total that comes from the terminal value
    pub fn terminal_share(&self) -> Option<f64> {
        if self.total.abs() < 1e-12 {
            None
        } else {
            Some(self.present_terminal_value / self.total)
        }
    }
}

/// Present value of a single amount received `periods` years out
pub fn present_value(amount: f64, annual_rate: f64, periods: u32) -> f64 {
    amount / (1.0 + annual_rate).powf(f64::from(periods))
}

/// Run the DCF for an EBITDA base, growth rate (percent) and discount rate (decimal)
pub fn discounted_cash_flow(
    ebitda: f64,
    growth_rate_percent: f64,
    discount_rate: f64,
    config: &DcfConfig,
) -> ValuationResult<DcfValuation> {
    if !ebitda.is_finite() {
        return Err(ValuationError::NonFiniteInput("ebitda"));
    }
    if !growth_rate_percent.is_finite() {
        return Err(ValuationError::NonFiniteInput("growth rate"));
    }
    if config.projection_years == 0 || config.projection_years > MAX_PROJECTION_YEARS {
        return Err(ValuationError::InvalidConfig(format!(
            "projection horizon must be between 1 and {} years, got {}",
            MAX_PROJECTION_YEARS, config.projection_years
        )));
    }

    let terminal_growth_rate = config.terminal_growth.rate_for(growth_rate_percent);
    if discount_rate <= terminal_growth_rate {
        return Err(ValuationError::DomainArithmetic {
            discount_rate,
            terminal_growth_rate,
        });
    }

    let growth_factor = 1.0 + growth_rate_percent / 100.0;
    let mut cash_flow = ebitda;
    let mut years = Vec::with_capacity(config.projection_years as usize);

    for year in 1..=config.projection_years {
        cash_flow *= growth_factor;
        years.push(ProjectedYear {
            year,
            cash_flow,
            present_value: present_value(cash_flow, discount_rate, year),
        });
    }

    let explicit_present_value: f64 = years.iter().map(|y| y.present_value).sum();

    // Gordon growth on the final projected year
    let terminal_value = cash_flow * (1.0 + terminal_growth_rate) / (discount_rate - terminal_growth_rate);
    let present_terminal_value = present_value(terminal_value, discount_rate, config.projection_years);

    Ok(DcfValuation {
        discount_rate,
        terminal_growth_rate,
        years,
        explicit_present_value,
        terminal_value,
        present_terminal_value,
        total: explicit_present_value + present_terminal_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_zero_growth_reference_value() {
        let dcf = discounted_cash_flow(100.0, 0.0, 0.10, &DcfConfig::default()).unwrap();

        // Level 100/yr annuity over 5 years at 10%
        assert_abs_diff_eq!(dcf.explicit_present_value, 379.0787, epsilon = 1e-4);
        // 100 * 1.02 / 0.08 = 1275, discounted 5 years
        assert_abs_diff_eq!(dcf.terminal_value, 1275.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dcf.present_terminal_value, 791.6747, epsilon = 1e-4);
        assert_abs_diff_eq!(dcf.total, 1170.7534, epsilon = 1e-4);
        assert_eq!(dcf.years.len(), 5);
        assert!(dcf.years.iter().all(|y| (y.cash_flow - 100.0).abs() < 1e-12));
    }

    #[test]
    fn test_growth_compounds_each_year() {
        let dcf = discounted_cash_flow(100.0, 5.0, 0.10, &DcfConfig::default()).unwrap();
        assert_relative_eq!(dcf.years[0].cash_flow, 105.0, epsilon = 1e-12);
        assert_relative_eq!(dcf.years[4].cash_flow, 100.0 * 1.05_f64.powi(5), epsilon = 1e-12);
        assert_abs_diff_eq!(dcf.total, 1446.2119, epsilon = 1e-4);
    }

    #[test]
    fn test_capped_policy_zero_growth() {
        let config = DcfConfig {
            terminal_growth: TerminalGrowthPolicy::CappedAtGrowth { cap: 0.03 },
            ..Default::default()
        };
        let dcf = discounted_cash_flow(100.0, 0.0, 0.10, &config).unwrap();
        // Zero terminal growth turns the whole stream into a level perpetuity: 100 / 0.10
        assert_eq!(dcf.terminal_growth_rate, 0.0);
        assert_abs_diff_eq!(dcf.total, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_capped_policy_caps_high_growth() {
        let policy = TerminalGrowthPolicy::CappedAtGrowth { cap: 0.03 };
        assert_eq!(policy.rate_for(25.0), 0.03);
        assert_relative_eq!(policy.rate_for(1.5), 0.015);
        assert_relative_eq!(policy.rate_for(-4.0), -0.04);
    }

    #[test]
    fn test_discount_rate_must_exceed_terminal_growth() {
        let err = discounted_cash_flow(100.0, 0.0, 0.02, &DcfConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ValuationError::DomainArithmetic {
                discount_rate: 0.02,
                terminal_growth_rate: 0.02
            }
        );

        let config = DcfConfig {
            terminal_growth: TerminalGrowthPolicy::Fixed { rate: 0.12 },
            ..Default::default()
        };
        assert!(discounted_cash_flow(100.0, 0.0, 0.10, &config).is_err());
    }

    #[test]
    fn test_higher_discount_rate_lowers_value() {
        let config = DcfConfig::default();
        let low = discounted_cash_flow(100.0, 8.0, 0.10, &config).unwrap();
        let high = discounted_cash_flow(100.0, 8.0, 0.20, &config).unwrap();
        assert!(high.total < low.total);
    }

    #[test]
    fn test_rejects_non_finite_inputs() {
        let config = DcfConfig::default();
        assert_eq!(
            discounted_cash_flow(f64::NAN, 0.0, 0.10, &config).unwrap_err(),
            ValuationError::NonFiniteInput("ebitda")
        );
        assert_eq!(
            discounted_cash_flow(100.0, f64::INFINITY, 0.10, &config).unwrap_err(),
            ValuationError::NonFiniteInput("growth rate")
        );
    }

    #[test]
    fn test_zero_horizon_is_config_error() {
        let config = DcfConfig {
            projection_years: 0,
            ..Default::default()
        };
        assert!(matches!(
            discounted_cash_flow(100.0, 0.0, 0.10, &config),
            Err(ValuationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_horizon_upper_bound() {
        let longest = DcfConfig {
            projection_years: MAX_PROJECTION_YEARS,
            ..Default::default()
        };
        let dcf = discounted_cash_flow(100.0, 0.0, 0.10, &longest).unwrap();
        assert_eq!(dcf.years.len(), MAX_PROJECTION_YEARS as usize);

        let too_long = DcfConfig {
            projection_years: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            discounted_cash_flow(100.0, 0.0, 0.10, &too_long),
            Err(ValuationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_terminal_share() {
        let dcf = discounted_cash_flow(100.0, 0.0, 0.10, &DcfConfig::default()).unwrap();
        let share = dcf.terminal_share().unwrap();
        assert_abs_diff_eq!(share, 791.6747 / 1170.7534, epsilon = 1e-6);

        let zero = discounted_cash_flow(0.0, 0.0, 0.10, &DcfConfig::default()).unwrap();
        assert_eq!(zero.total, 0.0);
        assert!(zero.terminal_share().is_none());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "capped".parse::<TerminalGrowthPolicy>().unwrap(),
            TerminalGrowthPolicy::CappedAtGrowth { cap: 0.03 }
        );
        assert_eq!("fixed".parse::<TerminalGrowthPolicy>().unwrap(), TerminalGrowthPolicy::default());
        assert!("gordon".parse::<TerminalGrowthPolicy>().is_err());
    }

    #[test]
    fn test_present_value() {
        assert_relative_eq!(present_value(121.0, 0.10, 2), 100.0, epsilon = 1e-12);
        assert_eq!(present_value(50.0, 0.10, 0), 50.0);
    }
}
