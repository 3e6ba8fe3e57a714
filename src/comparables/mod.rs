//! Comparable companies: pluggable sources and the implied valuation
//!
//! Comparables are optional enrichment. A source that fails or returns
//! nothing degrades to "no data" and never changes the EBITDA or DCF figures.

mod csv_source;

pub use csv_source::{load_comparables, load_comparables_from_reader, StaticComparables, DEFAULT_COMPARABLES_LIMIT};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ComparablesError;
use crate::format::format_currency;
use crate::input::ValuationInput;

/// A company used as a valuation comparable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableCompany {
    pub name: String,
    pub industry: String,
    pub location: Option<String>,
    pub revenue: f64,
    pub ebitda_multiple: f64,
    pub market_cap: f64,
}

/// What a source is asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparablesQuery {
    pub industry: String,
    pub location: Option<String>,
    pub revenue: f64,
}

impl ComparablesQuery {
    pub fn from_input(input: &ValuationInput) -> Self {
        Self {
            industry: input.industry.clone(),
            location: input.location.clone(),
            revenue: input.revenue,
        }
    }

    /// Natural-language form of the query, for text-based sources
    pub fn prompt(&self) -> String {
        let location = self.location.as_deref().unwrap_or("any location");
        format!(
            "List 5 comparable companies for a {} company in {} with {} revenue.",
            self.industry,
            location,
            format_currency(self.revenue)
        )
    }
}

/// Strategy for supplying comparable companies
pub trait ComparablesSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Look up comparables for a query
    fn fetch(&self, query: &ComparablesQuery) -> Result<Vec<ComparableCompany>, ComparablesError>;
}

/// Source that never has data
#[derive(Debug, Clone, Copy, Default)]
pub struct NoComparables;

impl ComparablesSource for NoComparables {
    fn name(&self) -> &str {
        "none"
    }

    fn fetch(&self, _query: &ComparablesQuery) -> Result<Vec<ComparableCompany>, ComparablesError> {
        Ok(Vec::new())
    }
}

/// Query a source, turning errors and empty results into `None`
pub fn fetch_comparables(source: &dyn ComparablesSource, query: &ComparablesQuery) -> Option<Vec<ComparableCompany>> {
    match source.fetch(query) {
        Ok(companies) if companies.is_empty() => {
            info!("No comparables from '{}' for {}", source.name(), query.industry);
            None
        }
        Ok(companies) => {
            info!(
                "Fetched {} comparables from '{}' for {}",
                companies.len(),
                source.name(),
                query.industry
            );
            Some(companies)
        }
        Err(e) => {
            warn!("Error fetching comparables from '{}': {}", source.name(), e);
            None
        }
    }
}

/// EBITDA times the mean comparable multiple. None for an empty list.
pub fn comparable_valuation(ebitda: f64, companies: &[ComparableCompany]) -> Option<f64> {
    if companies.is_empty() {
        return None;
    }
    let mean_multiple =
        companies.iter().map(|c| c.ebitda_multiple).sum::<f64>() / companies.len() as f64;
    Some(ebitda * mean_multiple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Broken;

    impl ComparablesSource for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn fetch(&self, _query: &ComparablesQuery) -> Result<Vec<ComparableCompany>, ComparablesError> {
            Err(ComparablesError::Unavailable {
                source_name: "broken".to_string(),
                message: "API request failed".to_string(),
            })
        }
    }

    fn query() -> ComparablesQuery {
        ComparablesQuery {
            industry: "technology".to_string(),
            location: Some("Denver, CO".to_string()),
            revenue: 4_500_000.0,
        }
    }

    fn company(multiple: f64) -> ComparableCompany {
        ComparableCompany {
            name: "Initech".to_string(),
            industry: "technology".to_string(),
            location: None,
            revenue: 1.0,
            ebitda_multiple: multiple,
            market_cap: 1.0,
        }
    }

    #[test]
    fn test_prompt() {
        assert_eq!(
            query().prompt(),
            "List 5 comparable companies for a technology company in Denver, CO with $4,500,000 revenue."
        );
        let anywhere = ComparablesQuery { location: None, ..query() };
        assert!(anywhere.prompt().contains("in any location"));
    }

    #[test]
    fn test_failures_degrade_to_none() {
        assert!(fetch_comparables(&Broken, &query()).is_none());
        assert!(fetch_comparables(&NoComparables, &query()).is_none());
    }

    #[test]
    fn test_comparable_valuation() {
        assert!(comparable_valuation(100.0, &[]).is_none());
        let value = comparable_valuation(100.0, &[company(8.0), company(10.0), company(12.0)]).unwrap();
        assert_relative_eq!(value, 1_000.0);
    }
}
