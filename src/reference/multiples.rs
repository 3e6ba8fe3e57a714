//! Industry EV/EBITDA multiple ranges

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ReferenceError;

/// Range used when an industry is missing from the table
pub const DEFAULT_MULTIPLE_RANGE: IndustryMultipleRange = IndustryMultipleRange { min: 5.0, max: 8.0 };

/// Low and high EBITDA multiple observed for an industry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndustryMultipleRange {
    pub min: f64,
    pub max: f64,
}

impl IndustryMultipleRange {
    /// Create a range, rejecting non-positive or inverted bounds
    pub fn new(industry: &str, min: f64, max: f64) -> Result<Self, ReferenceError> {
        if !(min > 0.0 && max > 0.0 && min <= max) || !min.is_finite() || !max.is_finite() {
            return Err(ReferenceError::InvalidRange {
                industry: industry.to_string(),
                min,
                max,
            });
        }
        Ok(Self { min, max })
    }

    /// Midpoint of the range
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Industry key to multiple range. Keys are case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryMultiples {
    ranges: BTreeMap<String, IndustryMultipleRange>,
}

impl IndustryMultiples {
    /// Build from (industry, min, max) rows
    pub fn from_rows<I, S>(rows: I) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let mut ranges = BTreeMap::new();
        for (industry, min, max) in rows {
            let industry = industry.into();
            let range = IndustryMultipleRange::new(&industry, min, max)?;
            ranges.insert(industry, range);
        }
        if ranges.is_empty() {
            return Err(ReferenceError::EmptyTable("industry multiples".to_string()));
        }
        Ok(Self { ranges })
    }

    pub fn get(&self, industry: &str) -> Option<IndustryMultipleRange> {
        self.ranges.get(industry).copied()
    }

    /// Industry keys in sorted order
    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl Default for IndustryMultiples {
    fn default() -> Self {
        let rows = [
            ("technology", 10.0, 15.0),
            ("healthcare", 8.0, 12.0),
            ("finance", 6.0, 10.0),
            ("retail", 5.0, 8.0),
            ("manufacturing", 4.0, 7.0),
            ("energy", 6.0, 9.0),
            ("telecom", 5.0, 8.0),
            ("real_estate", 12.0, 18.0),
            ("consumer_goods", 7.0, 11.0),
            ("automotive", 4.0, 7.0),
            ("aerospace", 8.0, 12.0),
            ("biotech", 12.0, 18.0),
            ("media", 6.0, 10.0),
            ("agriculture", 4.0, 7.0),
            ("construction", 4.0, 7.0),
            ("education", 8.0, 12.0),
            ("hospitality", 5.0, 8.0),
            ("logistics", 5.0, 8.0),
            ("mining", 4.0, 7.0),
            ("pharma", 10.0, 15.0),
        ];
        let ranges = rows
            .into_iter()
            .map(|(industry, min, max)| (industry.to_string(), IndustryMultipleRange { min, max }))
            .collect();
        Self { ranges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = IndustryMultiples::default();
        assert_eq!(table.len(), 20);
        assert_eq!(table.get("technology"), Some(IndustryMultipleRange { min: 10.0, max: 15.0 }));
        assert_eq!(table.get("pharma"), Some(IndustryMultipleRange { min: 10.0, max: 15.0 }));
        assert!(table.get("Technology").is_none());
        assert!(table.get("unknown").is_none());
    }

    #[test]
    fn test_default_table_ranges_are_ordered() {
        let table = IndustryMultiples::default();
        for industry in table.industries() {
            let range = table.get(industry).unwrap();
            assert!(range.min > 0.0 && range.min <= range.max, "{industry}");
        }
    }

    #[test]
    fn test_range_validation() {
        assert!(IndustryMultipleRange::new("x", 5.0, 8.0).is_ok());
        assert!(IndustryMultipleRange::new("x", 8.0, 8.0).is_ok());
        assert!(IndustryMultipleRange::new("x", 9.0, 8.0).is_err());
        assert!(IndustryMultipleRange::new("x", 0.0, 8.0).is_err());
        assert!(IndustryMultipleRange::new("x", 5.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        let rows: Vec<(String, f64, f64)> = Vec::new();
        assert!(matches!(
            IndustryMultiples::from_rows(rows),
            Err(ReferenceError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(DEFAULT_MULTIPLE_RANGE.midpoint(), 6.5);
    }
}
