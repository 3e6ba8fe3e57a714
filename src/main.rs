//! Business Valuation CLI
//!
//! Values a single business from the command line. Reference tables and the
//! terminal growth policy can also come from the environment:
//!   VALUATION_REFERENCE_DIR, VALUATION_TERMINAL_GROWTH (fixed|capped)

use anyhow::{Context, Result};
use business_valuation::{
    batch::BatchValuator,
    comparables::StaticComparables,
    format::{format_currency, format_percentage},
    valuation::{TerminalGrowthPolicy, ValuationConfig},
    ComparablesSource, ReferenceData, RiskLevel, ValuationEngine, ValuationInput,
};
use clap::Parser;
use log::info;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(author, version, about = "Estimate a business valuation from EBITDA and growth", long_about = None)]
struct Cli {
    /// Annual EBITDA
    #[arg(long, allow_hyphen_values = true)]
    ebitda: f64,

    /// Annual revenue
    #[arg(long)]
    revenue: f64,

    /// Expected annual growth rate in percent
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    growth_rate: f64,

    /// Industry key (e.g. technology, healthcare, retail)
    #[arg(long)]
    industry: String,

    /// Risk level: low, medium or high
    #[arg(long, default_value = "medium", value_parser = RiskLevel::from_str)]
    risk_level: RiskLevel,

    /// Business location, used to rank comparables
    #[arg(long)]
    location: Option<String>,

    /// Gross margin in percent
    #[arg(long)]
    gross_margin: Option<f64>,

    /// CSV file of comparable companies
    #[arg(long)]
    comparables: Option<PathBuf>,

    /// Directory holding industry_multiples.csv and risk_rates.csv
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Terminal growth policy: fixed or capped
    #[arg(long, value_parser = TerminalGrowthPolicy::from_str)]
    terminal_growth: Option<TerminalGrowthPolicy>,

    /// Fail on industries missing from the reference table
    #[arg(long)]
    strict: bool,

    /// Print a DCF sensitivity grid across growth rates and risk levels
    #[arg(long)]
    sensitivity: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let reference_dir = cli
        .reference_dir
        .clone()
        .or_else(|| env::var("VALUATION_REFERENCE_DIR").ok().map(PathBuf::from));

    let reference = match &reference_dir {
        Some(dir) => ReferenceData::from_csv_path(dir)
            .with_context(|| format!("Failed to load reference data from {}", dir.display()))?,
        None => ReferenceData::default(),
    };

    let terminal_growth = match (cli.terminal_growth, env::var("VALUATION_TERMINAL_GROWTH")) {
        (Some(policy), _) => policy,
        (None, Ok(name)) => name
            .parse::<TerminalGrowthPolicy>()
            .with_context(|| format!("Invalid VALUATION_TERMINAL_GROWTH '{}'", name))?,
        (None, Err(_)) => TerminalGrowthPolicy::default(),
    };

    let config = if cli.strict {
        ValuationConfig::strict()
    } else {
        ValuationConfig::default()
    }
    .with_terminal_growth(terminal_growth);

    let input = ValuationInput {
        revenue: cli.revenue,
        ebitda: cli.ebitda,
        growth_rate: cli.growth_rate,
        industry: cli.industry.clone(),
        risk_level: cli.risk_level,
        location: cli.location.clone(),
        gross_margin: cli.gross_margin,
    };

    let comparables = match &cli.comparables {
        Some(path) => {
            let source = StaticComparables::from_path(path)
                .with_context(|| format!("Failed to load comparables from {}", path.display()))?;
            info!("Loaded {} comparables from {}", source.len(), path.display());
            Some(source)
        }
        None => None,
    };

    let engine = ValuationEngine::new(reference, config);
    let report = engine
        .valuate(&input, comparables.as_ref().map(|c| c as &dyn ComparablesSource))
        .context("Valuation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    if cli.sensitivity {
        let growth_rates = [0.0, 2.5, 5.0, 7.5, 10.0, 15.0];
        let grid = BatchValuator::new(engine).sensitivity(input.ebitda, &growth_rates, &RiskLevel::ALL);

        println!("\nDCF Sensitivity (terminal growth {})", terminal_growth);
        println!("{:>8} {:>16} {:>16} {:>16}", "Growth", "Low", "Medium", "High");
        for row in grid.chunks(RiskLevel::ALL.len()) {
            let cells: Vec<String> = row
                .iter()
                .map(|p| p.value.map(format_currency).unwrap_or_else(|| "n/a".to_string()))
                .collect();
            println!(
                "{:>8} {:>16} {:>16} {:>16}",
                format_percentage(row[0].growth_rate),
                cells[0],
                cells[1],
                cells[2]
            );
        }
    }

    Ok(())
}
