//! EBITDA multiple (comparables) valuation

use serde::{Deserialize, Serialize};

use crate::reference::IndustryMultipleRange;

/// Valuation range from applying an industry multiple range to EBITDA
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EbitdaValuation {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    /// Multiple range that produced the figures
    pub multiple: IndustryMultipleRange,
    /// True when the industry was unknown and the default range was used
    pub fallback_applied: bool,
}

impl EbitdaValuation {
    /// Apply a multiple range to EBITDA. Negative EBITDA gives negative values.
    pub fn from_range(ebitda: f64, multiple: IndustryMultipleRange, fallback_applied: bool) -> Self {
        let min = ebitda * multiple.min;
        let max = ebitda * multiple.max;
        Self {
            min,
            max,
            average: (min + max) / 2.0,
            multiple,
            fallback_applied,
        }
    }
}

/// Midpoint multiple haircut by the discount rate: `(min+max)/2 * (1 - rate)`
pub fn risk_adjusted_multiple(multiple: IndustryMultipleRange, discount_rate: f64) -> f64 {
    multiple.midpoint() * (1.0 - discount_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TECH: IndustryMultipleRange = IndustryMultipleRange { min: 10.0, max: 15.0 };

    #[test]
    fn test_range_valuation() {
        let v = EbitdaValuation::from_range(1_000_000.0, TECH, false);
        assert_relative_eq!(v.min, 10_000_000.0);
        assert_relative_eq!(v.max, 15_000_000.0);
        assert_relative_eq!(v.average, 12_500_000.0);
        assert!(!v.fallback_applied);
    }

    #[test]
    fn test_zero_ebitda() {
        let v = EbitdaValuation::from_range(0.0, TECH, false);
        assert_eq!((v.min, v.max, v.average), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_negative_ebitda_passes_through() {
        let v = EbitdaValuation::from_range(-100.0, TECH, false);
        assert_relative_eq!(v.min, -1_000.0);
        assert_relative_eq!(v.max, -1_500.0);
        assert_relative_eq!(v.average, -1_250.0);
    }

    #[test]
    fn test_ordering_for_positive_ebitda() {
        for ebitda in [0.01, 1.0, 250_000.0, 1e9] {
            let v = EbitdaValuation::from_range(ebitda, TECH, false);
            assert!(v.min <= v.average && v.average <= v.max);
        }
    }

    #[test]
    fn test_risk_adjusted_multiple() {
        // (10 + 15) / 2 * (1 - 0.20) = 10.0
        assert_relative_eq!(risk_adjusted_multiple(TECH, 0.20), 10.0);
    }
}
