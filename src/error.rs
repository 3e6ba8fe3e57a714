//! Error types shared across the valuation crate

use thiserror::Error;

/// Errors raised by the valuation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Industry key is not in the reference table and the fallback policy rejects it
    #[error("Unknown industry: {0}")]
    UnknownIndustry(String),

    /// Terminal value is undefined because the discount rate does not exceed terminal growth
    #[error(
        "Discount rate {discount_rate:.4} must exceed terminal growth rate {terminal_growth_rate:.4}"
    )]
    DomainArithmetic {
        discount_rate: f64,
        terminal_growth_rate: f64,
    },

    /// A numeric input was NaN or infinite
    #[error("Non-finite value for {0}")]
    NonFiniteInput(&'static str),

    /// One or more input validation rules failed
    #[error("Invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    /// Engine configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading reference tables
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to read reference file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed reference CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Row describes a multiple range that is non-positive or inverted
    #[error("Invalid multiple range for '{industry}': min {min}, max {max}")]
    InvalidRange { industry: String, min: f64, max: f64 },

    #[error("Unknown risk level '{0}' (expected low, medium or high)")]
    UnknownRiskLevel(String),

    /// Discount rate outside (0, 1)
    #[error("Invalid discount rate {rate} for risk level '{level}'")]
    InvalidRate { level: String, rate: f64 },

    #[error("Reference table '{0}' is empty")]
    EmptyTable(String),
}

/// Errors raised by comparables sources
#[derive(Error, Debug)]
pub enum ComparablesError {
    #[error("Failed to read comparables file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed comparables CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Source could not answer the query
    #[error("Comparables source '{source_name}' unavailable: {message}")]
    Unavailable { source_name: String, message: String },
}

/// Errors raised while reading or writing batch valuation files
#[derive(Error, Debug)]
pub enum BatchFileError {
    #[error("Failed to access batch file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed batch CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row '{id}': unknown risk level '{value}'")]
    UnknownRiskLevel { id: String, value: String },
}

/// Result alias used by valuation operations
pub type ValuationResult<T> = Result<T, ValuationError>;
