//! AWS Lambda handler for single valuations
//!
//! Accepts a valuation request as JSON through a Lambda Function URL and
//! returns the valuation report, plus an optional DCF sensitivity grid.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use business_valuation::{
    batch::{BatchValuator, SensitivityPoint},
    comparables::StaticComparables,
    reference::{IndustryMultiples, RiskRates},
    valuation::TerminalGrowthPolicy,
    ComparableCompany, ComparablesSource, ReferenceData, RiskLevel, ValuationConfig, ValuationEngine,
    ValuationError, ValuationInput, ValuationReport,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input for one valuation
#[derive(Debug, Deserialize)]
pub struct ValuationRequest {
    #[serde(flatten)]
    pub input: ValuationInput,

    /// Terminal growth policy: "fixed" (default) or "capped"
    #[serde(default)]
    pub terminal_growth: Option<String>,

    /// Reject industries missing from the reference table
    #[serde(default)]
    pub strict: bool,

    /// Caller-supplied comparable companies
    #[serde(default)]
    pub comparables: Option<Vec<ComparableCompany>>,

    /// Discount rates overriding the built-in table, keyed by risk level
    #[serde(default)]
    pub risk_rates: Option<BTreeMap<RiskLevel, f64>>,

    /// Growth rates (percent) for a DCF sensitivity grid across all risk levels
    #[serde(default)]
    pub sensitivity_growth_rates: Option<Vec<f64>>,
}

/// Most growth rates accepted for one sensitivity grid
const MAX_SENSITIVITY_GROWTH_RATES: usize = 50;

/// Output from the valuation
#[derive(Debug, Serialize)]
pub struct ValuationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ValuationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<Vec<SensitivityPoint>>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn status_for(error: &ValuationError) -> i64 {
    match error {
        ValuationError::DomainArithmetic { .. } => 422,
        _ => 400,
    }
}

fn response(status_code: i64, body: String) -> LambdaFunctionUrlResponse {
    let mut response = LambdaFunctionUrlResponse {
        status_code,
        headers: Default::default(),
        body: Some(body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    for (name, value) in [
        ("content-type", "application/json"),
        ("access-control-allow-origin", "*"),
        ("access-control-allow-methods", "POST, OPTIONS"),
        ("access-control-allow-headers", "Content-Type"),
    ] {
        if let Ok(value) = value.parse() {
            response.headers.insert(name, value);
        }
    }
    response
}

fn error_response(status_code: i64, message: &str, started: std::time::Instant) -> LambdaFunctionUrlResponse {
    let body = ValuationResponse {
        report: None,
        sensitivity: None,
        execution_time_ms: started.elapsed().as_millis() as u64,
        error: Some(message.to_string()),
    };
    response(
        status_code,
        serde_json::to_string(&body).unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, message)),
    )
}

/// Built-in discount rates with the caller's overrides applied
fn risk_rates_with(overrides: &BTreeMap<RiskLevel, f64>) -> Result<RiskRates, ValuationError> {
    let defaults = RiskRates::default();
    RiskRates::from_pairs(
        RiskLevel::ALL
            .iter()
            .map(|&level| (level, overrides.get(&level).copied().unwrap_or_else(|| defaults.rate(level)))),
    )
    .map_err(|e| ValuationError::InvalidConfig(e.to_string()))
}

/// Value a parsed request
fn evaluate(request: ValuationRequest, started: std::time::Instant) -> Result<ValuationResponse, ValuationError> {
    let terminal_growth = match request.terminal_growth.as_deref() {
        Some(name) => name.parse()?,
        None => TerminalGrowthPolicy::default(),
    };
    let config = if request.strict {
        ValuationConfig::strict()
    } else {
        ValuationConfig::default()
    }
    .with_terminal_growth(terminal_growth);

    if let Some(rates) = &request.sensitivity_growth_rates {
        if rates.len() > MAX_SENSITIVITY_GROWTH_RATES {
            return Err(ValuationError::InvalidInput(vec![format!(
                "At most {} sensitivity growth rates are allowed, got {}",
                MAX_SENSITIVITY_GROWTH_RATES,
                rates.len()
            )]));
        }
    }

    let reference = match &request.risk_rates {
        Some(overrides) => ReferenceData::new(IndustryMultiples::default(), risk_rates_with(overrides)?),
        None => ReferenceData::default(),
    };
    let engine = ValuationEngine::new(reference, config);
    let comparables = request.comparables.map(StaticComparables::new);
    let report = engine.valuate(
        &request.input,
        comparables.as_ref().map(|c| c as &dyn ComparablesSource),
    )?;

    let sensitivity = request.sensitivity_growth_rates.map(|rates| {
        BatchValuator::new(engine).sensitivity(request.input.ebitda, &rates, &RiskLevel::ALL)
    });

    Ok(ValuationResponse {
        report: Some(report),
        sensitivity,
        execution_time_ms: started.elapsed().as_millis() as u64,
        error: None,
    })
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let started = std::time::Instant::now();
    let request = event.payload;

    // CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(response(200, String::new()));
    }

    if request.is_base64_encoded {
        return Ok(error_response(400, "Base64-encoded bodies are not supported", started));
    }

    let body = request.body.unwrap_or_else(|| "{}".to_string());
    let parsed: ValuationRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e), started));
        }
    };

    match evaluate(parsed, started) {
        Ok(result) => {
            info!("Valuation completed in {} ms", result.execution_time_ms);
            Ok(response(200, serde_json::to_string(&result)?))
        }
        Err(e) => {
            warn!("Valuation rejected: {}", e);
            Ok(error_response(status_for(&e), &e.to_string(), started))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
