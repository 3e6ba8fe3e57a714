//! CSV-based reference table loader
//!
//! Loads industry multiples and risk discount rates from CSV files in data/reference/

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{IndustryMultiples, RiskLevel, RiskRates};
use crate::error::ReferenceError;

/// Default path to reference data directory
pub const DEFAULT_REFERENCE_PATH: &str = "data/reference";

/// Industry multiples file name within a reference directory
pub const INDUSTRY_MULTIPLES_FILE: &str = "industry_multiples.csv";

/// Risk rates file name within a reference directory
pub const RISK_RATES_FILE: &str = "risk_rates.csv";

#[derive(Debug, Deserialize)]
struct MultipleRow {
    industry: String,
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct RiskRow {
    risk_level: String,
    discount_rate: f64,
}

/// Load industry multiples from any reader (`industry,min,max`)
pub fn load_industry_multiples_from_reader<R: Read>(reader: R) -> Result<IndustryMultiples, ReferenceError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: MultipleRow = result?;
        rows.push((row.industry, row.min, row.max));
    }

    IndustryMultiples::from_rows(rows)
}

/// Load industry multiples from a CSV file
pub fn load_industry_multiples(path: &Path) -> Result<IndustryMultiples, ReferenceError> {
    load_industry_multiples_from_reader(File::open(path)?)
}

/// Load risk discount rates from any reader (`risk_level,discount_rate`)
pub fn load_risk_rates_from_reader<R: Read>(reader: R) -> Result<RiskRates, ReferenceError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut pairs = Vec::new();

    for result in csv_reader.deserialize() {
        let row: RiskRow = result?;
        let level: RiskLevel = row.risk_level.parse()?;
        pairs.push((level, row.discount_rate));
    }

    RiskRates::from_pairs(pairs)
}

/// Load risk discount rates from a CSV file
pub fn load_risk_rates(path: &Path) -> Result<RiskRates, ReferenceError> {
    load_risk_rates_from_reader(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_multiples_from_reader() {
        let data = "industry,min,max\nsaas, 8, 14\nlogistics,5,8\n";
        let table = load_industry_multiples_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let saas = table.get("saas").unwrap();
        assert_eq!((saas.min, saas.max), (8.0, 14.0));
    }

    #[test]
    fn test_load_multiples_rejects_inverted_row() {
        let data = "industry,min,max\nsaas,14,8\n";
        let err = load_industry_multiples_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ReferenceError::InvalidRange { .. }));
    }

    #[test]
    fn test_load_multiples_rejects_non_numeric() {
        let data = "industry,min,max\nsaas,eight,14\n";
        let err = load_industry_multiples_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ReferenceError::Csv(_)));
    }

    #[test]
    fn test_load_risk_rates_from_reader() {
        let data = "risk_level,discount_rate\nlow,0.09\nhigh,0.25\n";
        let rates = load_risk_rates_from_reader(data.as_bytes()).unwrap();
        assert_eq!(rates.rate(RiskLevel::Low), 0.09);
        assert_eq!(rates.rate(RiskLevel::High), 0.25);
        assert_eq!(rates.rate(RiskLevel::Medium), 0.15);
    }

    #[test]
    fn test_load_risk_rates_unknown_level() {
        let data = "risk_level,discount_rate\nextreme,0.4\n";
        let err = load_risk_rates_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ReferenceError::UnknownRiskLevel(ref s) if s == "extreme"));
    }

    #[test]
    fn test_load_default_reference_files() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_REFERENCE_PATH);

        let industries = load_industry_multiples(&dir.join(INDUSTRY_MULTIPLES_FILE)).unwrap();
        assert_eq!(industries, IndustryMultiples::default());

        let rates = load_risk_rates(&dir.join(RISK_RATES_FILE)).unwrap();
        assert_eq!(rates, RiskRates::default());

        let sectors = load_industry_multiples(&dir.join("sector_multiples.csv")).unwrap();
        assert_eq!(sectors.len(), 20);
        assert!(sectors.get("financial").is_some());
    }
}
