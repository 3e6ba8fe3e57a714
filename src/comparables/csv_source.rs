//! Comparables loaded from a CSV file

use csv::Reader;
use std::cmp::Ordering;
use std::io::Read;
use std::path::Path;

use super::{ComparableCompany, ComparablesQuery, ComparablesSource};
use crate::error::ComparablesError;

/// Maximum number of companies returned per query
pub const DEFAULT_COMPARABLES_LIMIT: usize = 5;

/// Raw CSV row matching the comparables file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    name: String,
    industry: String,
    #[serde(default)]
    location: Option<String>,
    revenue: f64,
    ebitda_multiple: f64,
    market_cap: f64,
}

impl CsvRow {
    fn into_company(self) -> ComparableCompany {
        ComparableCompany {
            name: self.name,
            industry: self.industry,
            location: self.location.filter(|l| !l.trim().is_empty()),
            revenue: self.revenue,
            ebitda_multiple: self.ebitda_multiple,
            market_cap: self.market_cap,
        }
    }
}

/// Load comparables from any reader
pub fn load_comparables_from_reader<R: Read>(reader: R) -> Result<Vec<ComparableCompany>, ComparablesError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut companies = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        companies.push(row.into_company());
    }

    Ok(companies)
}

/// Load comparables from a CSV file
pub fn load_comparables<P: AsRef<Path>>(path: P) -> Result<Vec<ComparableCompany>, ComparablesError> {
    let mut reader = Reader::from_path(path)?;
    let mut companies = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        companies.push(row.into_company());
    }

    Ok(companies)
}

/// Fixed comparables set, typically loaded from CSV
#[derive(Debug, Clone)]
pub struct StaticComparables {
    companies: Vec<ComparableCompany>,
    limit: usize,
}

impl StaticComparables {
    pub fn new(companies: Vec<ComparableCompany>) -> Self {
        Self {
            companies,
            limit: DEFAULT_COMPARABLES_LIMIT,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ComparablesError> {
        Ok(Self::new(load_comparables(path)?))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

impl ComparablesSource for StaticComparables {
    fn name(&self) -> &str {
        "static"
    }

    /// Same-industry companies, same location first, then closest revenue
    fn fetch(&self, query: &ComparablesQuery) -> Result<Vec<ComparableCompany>, ComparablesError> {
        let mut matches: Vec<&ComparableCompany> = self
            .companies
            .iter()
            .filter(|c| c.industry == query.industry)
            .collect();

        let same_location = |c: &ComparableCompany| match (&c.location, &query.location) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        };

        matches.sort_by(|a, b| {
            same_location(*b)
                .cmp(&same_location(*a))
                .then_with(|| {
                    let da = (a.revenue - query.revenue).abs();
                    let db = (b.revenue - query.revenue).abs();
                    da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                })
        });

        Ok(matches.into_iter().take(self.limit).cloned().collect())
    }
}
