//! Valuation engine tying reference data to the valuation formulas

use log::{debug, warn};

use super::dcf::{discounted_cash_flow, DcfValuation};
use super::multiple::{risk_adjusted_multiple, EbitdaValuation};
use super::{FallbackPolicy, ValuationConfig};
use crate::comparables::{comparable_valuation, fetch_comparables, ComparablesQuery, ComparablesSource};
use crate::error::{ValuationError, ValuationResult};
use crate::input::ValuationInput;
use crate::reference::{IndustryMultipleRange, ReferenceData, RiskLevel, DEFAULT_MULTIPLE_RANGE};
use crate::report::ValuationReport;

/// Resolved multiple range for an industry key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndustryLookup {
    pub range: IndustryMultipleRange,
    /// True when the key was unknown and the default range was substituted
    pub fallback_applied: bool,
}

/// Main valuation engine
///
/// Holds read-only reference data, so one engine can serve many
/// calculations, including from multiple threads.
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    reference: ReferenceData,
    config: ValuationConfig,
}

impl ValuationEngine {
    /// Create a new engine with given reference data and config
    pub fn new(reference: ReferenceData, config: ValuationConfig) -> Self {
        Self { reference, config }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Resolve an industry key according to the fallback policy
    pub fn lookup_industry_range(&self, industry: &str) -> ValuationResult<IndustryLookup> {
        if let Some(range) = self.reference.lookup_industry_range(industry) {
            return Ok(IndustryLookup {
                range,
                fallback_applied: false,
            });
        }

        match self.config.fallback {
            FallbackPolicy::Substitute => {
                warn!(
                    "Unknown industry '{}', using default multiple range {}x-{}x",
                    industry, DEFAULT_MULTIPLE_RANGE.min, DEFAULT_MULTIPLE_RANGE.max
                );
                Ok(IndustryLookup {
                    range: DEFAULT_MULTIPLE_RANGE,
                    fallback_applied: true,
                })
            }
            FallbackPolicy::Reject => Err(ValuationError::UnknownIndustry(industry.to_string())),
        }
    }

    /// Discount rate for a risk level
    pub fn lookup_risk_rate(&self, level: RiskLevel) -> f64 {
        self.reference.lookup_risk_rate(level)
    }

    /// EBITDA multiple valuation as a {min, max, average} range
    pub fn valuate_by_multiple(&self, ebitda: f64, industry: &str) -> ValuationResult<EbitdaValuation> {
        if !ebitda.is_finite() {
            return Err(ValuationError::NonFiniteInput("ebitda"));
        }
        let lookup = self.lookup_industry_range(industry)?;
        let valuation = EbitdaValuation::from_range(ebitda, lookup.range, lookup.fallback_applied);
        debug!(
            "Multiple valuation for {}: {:.2} - {:.2}",
            industry, valuation.min, valuation.max
        );
        Ok(valuation)
    }

    /// Single-figure valuation: EBITDA times the midpoint multiple haircut by the risk rate
    pub fn risk_adjusted_value(&self, ebitda: f64, industry: &str, risk: RiskLevel) -> ValuationResult<f64> {
        if !ebitda.is_finite() {
            return Err(ValuationError::NonFiniteInput("ebitda"));
        }
        let lookup = self.lookup_industry_range(industry)?;
        Ok(ebitda * risk_adjusted_multiple(lookup.range, self.lookup_risk_rate(risk)))
    }

    /// Full DCF breakdown
    pub fn dcf_breakdown(
        &self,
        ebitda: f64,
        growth_rate_percent: f64,
        risk: RiskLevel,
    ) -> ValuationResult<DcfValuation> {
        let discount_rate = self.lookup_risk_rate(risk);
        let dcf = discounted_cash_flow(ebitda, growth_rate_percent, discount_rate, &self.config.dcf)?;
        debug!(
            "DCF at {:.1}% discount, {:.1}% terminal growth: {:.2}",
            discount_rate * 100.0,
            dcf.terminal_growth_rate * 100.0,
            dcf.total
        );
        Ok(dcf)
    }

    /// DCF present value (explicit horizon plus terminal value)
    pub fn valuate_by_dcf(&self, ebitda: f64, growth_rate_percent: f64, risk: RiskLevel) -> ValuationResult<f64> {
        self.dcf_breakdown(ebitda, growth_rate_percent, risk).map(|dcf| dcf.total)
    }

    /// Validate input, run both methods, then attach comparables when a source is given.
    /// Comparables failures never affect the valuation figures.
    pub fn valuate(
        &self,
        input: &ValuationInput,
        comparables: Option<&dyn ComparablesSource>,
    ) -> ValuationResult<ValuationReport> {
        input.validate()?;

        let ebitda = self.valuate_by_multiple(input.ebitda, &input.industry)?;
        let dcf = self.dcf_breakdown(input.ebitda, input.growth_rate, input.risk_level)?;

        let companies = comparables.and_then(|source| {
            let query = ComparablesQuery::from_input(input);
            fetch_comparables(source, &query)
        });
        let implied = companies
            .as_deref()
            .and_then(|list| comparable_valuation(input.ebitda, list));

        Ok(ValuationReport::new(input.clone(), ebitda, dcf, companies, implied))
    }
}
