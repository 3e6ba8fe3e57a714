//! Batch valuation and DCF sensitivity grids
//!
//! Holds one engine and runs many independent valuations against it in
//! parallel. Reference tables are shared read-only across workers.

use csv::{Reader, Writer};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

use crate::comparables::ComparablesSource;
use crate::error::{BatchFileError, ValuationError};
use crate::input::ValuationInput;
use crate::reference::RiskLevel;
use crate::report::ValuationReport;
use crate::valuation::ValuationEngine;

/// A valuation input tagged with a caller-supplied identifier
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInput {
    pub id: String,
    pub input: ValuationInput,
}

/// Result of one batch entry
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub id: String,
    pub result: Result<ValuationReport, ValuationError>,
}

/// DCF value for one growth rate and risk level pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub growth_rate: f64,
    pub risk_level: RiskLevel,
    /// None when the pair is outside the DCF domain
    pub value: Option<f64>,
}

/// Runs batches of valuations with a shared engine
///
/// # Example
/// ```ignore
/// let valuator = BatchValuator::new(ValuationEngine::default());
/// let outcomes = valuator.run(&load_inputs("data/samples/inputs.csv")?, None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchValuator {
    engine: ValuationEngine,
}

impl BatchValuator {
    pub fn new(engine: ValuationEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ValuationEngine {
        &self.engine
    }

    /// Value every input in parallel. Output order matches input order.
    pub fn run(&self, inputs: &[BatchInput], comparables: Option<&dyn ComparablesSource>) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = inputs
            .par_iter()
            .map(|entry| BatchOutcome {
                id: entry.id.clone(),
                result: self.engine.valuate(&entry.input, comparables),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!("Valued {} inputs ({} failed)", outcomes.len(), failed);
        outcomes
    }

    /// DCF totals over every growth rate and risk level pair, growth-major order
    pub fn sensitivity(&self, ebitda: f64, growth_rates: &[f64], risk_levels: &[RiskLevel]) -> Vec<SensitivityPoint> {
        let grid: Vec<(f64, RiskLevel)> = growth_rates
            .iter()
            .flat_map(|&g| risk_levels.iter().map(move |&r| (g, r)))
            .collect();

        grid.par_iter()
            .map(|&(growth_rate, risk_level)| SensitivityPoint {
                growth_rate,
                risk_level,
                value: self.engine.valuate_by_dcf(ebitda, growth_rate, risk_level).ok(),
            })
            .collect()
    }
}

/// Raw CSV row matching the batch input columns
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    revenue: Option<f64>,
    ebitda: Option<f64>,
    growth_rate: Option<f64>,
    industry: String,
    risk_level: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    gross_margin: Option<f64>,
}

impl CsvRow {
    /// Missing numbers become NaN so validation reports them per row
    fn into_batch_input(self) -> Result<BatchInput, BatchFileError> {
        let risk_level: RiskLevel = self
            .risk_level
            .parse()
            .map_err(|_| BatchFileError::UnknownRiskLevel {
                id: self.id.clone(),
                value: self.risk_level.clone(),
            })?;

        Ok(BatchInput {
            id: self.id,
            input: ValuationInput {
                revenue: self.revenue.unwrap_or(f64::NAN),
                ebitda: self.ebitda.unwrap_or(f64::NAN),
                growth_rate: self.growth_rate.unwrap_or(f64::NAN),
                industry: self.industry,
                risk_level,
                location: self.location.filter(|l| !l.trim().is_empty()),
                gross_margin: self.gross_margin,
            },
        })
    }
}

/// Load batch inputs from any reader
pub fn load_inputs_from_reader<R: Read>(reader: R) -> Result<Vec<BatchInput>, BatchFileError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut inputs = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        inputs.push(row.into_batch_input()?);
    }

    Ok(inputs)
}

/// Load batch inputs from a CSV file
pub fn load_inputs<P: AsRef<Path>>(path: P) -> Result<Vec<BatchInput>, BatchFileError> {
    load_inputs_from_reader(std::fs::File::open(path)?)
}

/// One output row per outcome
#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    id: &'a str,
    ebitda_min: Option<f64>,
    ebitda_max: Option<f64>,
    ebitda_average: Option<f64>,
    fallback_applied: Option<bool>,
    dcf_value: Option<f64>,
    comparable_valuation: Option<f64>,
    error: Option<String>,
}

/// Write outcomes as CSV
pub fn write_outcomes<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<(), BatchFileError> {
    let mut csv_writer = Writer::from_writer(writer);

    for outcome in outcomes {
        let row = match &outcome.result {
            Ok(report) => OutcomeRow {
                id: &outcome.id,
                ebitda_min: Some(report.ebitda.min),
                ebitda_max: Some(report.ebitda.max),
                ebitda_average: Some(report.ebitda.average),
                fallback_applied: Some(report.ebitda.fallback_applied),
                dcf_value: Some(report.dcf.total),
                comparable_valuation: report.comparable_valuation,
                error: None,
            },
            Err(e) => OutcomeRow {
                id: &outcome.id,
                ebitda_min: None,
                ebitda_max: None,
                ebitda_average: None,
                fallback_applied: None,
                dcf_value: None,
                comparable_valuation: None,
                error: Some(e.to_string()),
            },
        };
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
