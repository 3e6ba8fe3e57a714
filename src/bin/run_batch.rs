//! Value every business in a CSV file
//!
//! Usage: run_batch <inputs.csv> [output.csv] [comparables.csv]
//! Output defaults to batch_valuation_output.csv

use anyhow::{Context, Result};
use business_valuation::{
    batch::{load_inputs, write_outcomes, BatchValuator},
    comparables::StaticComparables,
    ComparablesSource, ReferenceData, ValuationConfig, ValuationEngine,
};
use std::env;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let input_path = args
        .first()
        .context("usage: run_batch <inputs.csv> [output.csv] [comparables.csv]")?;
    let output_path = args.get(1).map(String::as_str).unwrap_or("batch_valuation_output.csv");

    let start = Instant::now();

    let reference = match env::var("VALUATION_REFERENCE_DIR") {
        Ok(dir) => ReferenceData::from_csv_path(Path::new(&dir))
            .with_context(|| format!("Failed to load reference data from {}", dir))?,
        Err(_) => ReferenceData::default(),
    };

    let mut config = ValuationConfig::default();
    if let Ok(policy) = env::var("VALUATION_TERMINAL_GROWTH") {
        config = config.with_terminal_growth(policy.parse()?);
    }

    let comparables = match args.get(2) {
        Some(path) => Some(
            StaticComparables::from_path(path)
                .with_context(|| format!("Failed to load comparables from {}", path))?,
        ),
        None => None,
    };

    let inputs = load_inputs(input_path).with_context(|| format!("Failed to load {}", input_path))?;
    println!("Loaded {} inputs in {:?}", inputs.len(), start.elapsed());

    let valuator = BatchValuator::new(ValuationEngine::new(reference, config));
    let outcomes = valuator.run(&inputs, comparables.as_ref().map(|c| c as &dyn ComparablesSource));

    let file = File::create(output_path).with_context(|| format!("Failed to create {}", output_path))?;
    write_outcomes(file, &outcomes)?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    println!("Output written to {}", output_path);
    println!("  Valued: {}", outcomes.len() - failed);
    println!("  Failed: {}", failed);
    for outcome in outcomes.iter().filter(|o| o.result.is_err()) {
        if let Err(e) = &outcome.result {
            println!("    {}: {}", outcome.id, e);
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
