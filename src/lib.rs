//! Business Valuation - EBITDA multiple and DCF valuation engine
//!
//! This library provides:
//! - Industry multiple and risk discount rate reference tables
//! - EBITDA multiple (comparables) valuation ranges
//! - Discounted cash flow valuation with a Gordon growth terminal value
//! - Pluggable comparable-company sources
//! - Batch valuation and DCF sensitivity grids

pub mod error;
pub mod reference;
pub mod valuation;
pub mod input;
pub mod format;
pub mod comparables;
pub mod report;
pub mod batch;

// Re-export commonly used types
pub use error::{ValuationError, ValuationResult};
pub use reference::{IndustryMultipleRange, ReferenceData, RiskLevel};
pub use valuation::{DcfValuation, EbitdaValuation, ValuationConfig, ValuationEngine};
pub use input::ValuationInput;
pub use comparables::{ComparableCompany, ComparablesSource};
pub use report::ValuationReport;
pub use batch::BatchValuator;
