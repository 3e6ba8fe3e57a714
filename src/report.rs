//! Valuation report combining both methods and any comparables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::comparables::ComparableCompany;
use crate::format::{format_currency, format_multiple, format_percentage};
use crate::input::ValuationInput;
use crate::valuation::{DcfValuation, EbitdaValuation};

/// Output of a single valuation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub valued_at: DateTime<Utc>,
    pub input: ValuationInput,
    pub ebitda: EbitdaValuation,
    pub dcf: DcfValuation,
    /// None when no source was given or the source had no data
    pub comparables: Option<Vec<ComparableCompany>>,
    /// EBITDA times the mean comparable multiple
    pub comparable_valuation: Option<f64>,
    pub recommendations: Vec<String>,
}

impl ValuationReport {
    pub fn new(
        input: ValuationInput,
        ebitda: EbitdaValuation,
        dcf: DcfValuation,
        comparables: Option<Vec<ComparableCompany>>,
        comparable_valuation: Option<f64>,
    ) -> Self {
        let recommendations = recommendations(&ebitda, &dcf);
        Self {
            valued_at: Utc::now(),
            input,
            ebitda,
            dcf,
            comparables,
            comparable_valuation,
            recommendations,
        }
    }

    /// Human-readable report: valuation cards, comparables table, recommendations
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValuationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Business Valuation ({})", self.input.industry)?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(
            f,
            "Revenue: {}   EBITDA: {}   Growth: {}   Risk: {}",
            format_currency(self.input.revenue),
            format_currency(self.input.ebitda),
            format_percentage(self.input.growth_rate),
            self.input.risk_level
        )?;
        if let Some(margin) = self.input.gross_margin {
            writeln!(f, "Gross Margin: {}", format_percentage(margin))?;
        }
        writeln!(f)?;

        writeln!(f, "EBITDA Multiple Valuation")?;
        writeln!(
            f,
            "  Range: {} - {}",
            format_currency(self.ebitda.min),
            format_currency(self.ebitda.max)
        )?;
        writeln!(f, "  Average: {}", format_currency(self.ebitda.average))?;
        writeln!(
            f,
            "  Multiples: {} - {}{}",
            format_multiple(self.ebitda.multiple.min),
            format_multiple(self.ebitda.multiple.max),
            if self.ebitda.fallback_applied { " (default range, industry not listed)" } else { "" }
        )?;
        writeln!(f)?;

        writeln!(f, "DCF Valuation")?;
        writeln!(f, "  Valuation: {}", format_currency(self.dcf.total))?;
        writeln!(
            f,
            "  Discount rate: {}   Terminal growth: {}",
            format_percentage(self.dcf.discount_rate * 100.0),
            format_percentage(self.dcf.terminal_growth_rate * 100.0)
        )?;
        writeln!(
            f,
            "  Projection PV: {}   Terminal PV: {}",
            format_currency(self.dcf.explicit_present_value),
            format_currency(self.dcf.present_terminal_value)
        )?;
        writeln!(f)?;

        writeln!(f, "Comparable Companies")?;
        match &self.comparables {
            Some(companies) if !companies.is_empty() => {
                writeln!(
                    f,
                    "  {:<28} {:>14} {:>9} {:>16}",
                    "Company", "Revenue", "Multiple", "Market Cap"
                )?;
                for company in companies {
                    writeln!(
                        f,
                        "  {:<28} {:>14} {:>9} {:>16}",
                        company.name,
                        format_currency(company.revenue),
                        format_multiple(company.ebitda_multiple),
                        format_currency(company.market_cap)
                    )?;
                }
                if let Some(value) = self.comparable_valuation {
                    writeln!(f, "  Implied valuation: {}", format_currency(value))?;
                }
            }
            _ => writeln!(f, "  No comparable data available")?,
        }
        writeln!(f)?;

        writeln!(f, "Based on our analysis:")?;
        for line in &self.recommendations {
            writeln!(f, "  - {}", line)?;
        }
        Ok(())
    }
}

/// Summary bullets for a valuation
pub fn recommendations(ebitda: &EbitdaValuation, dcf: &DcfValuation) -> Vec<String> {
    vec![
        format!(
            "EBITDA Multiple Valuation suggests a range of {} - {}",
            format_currency(ebitda.min),
            format_currency(ebitda.max)
        ),
        format!("DCF Analysis indicates a value of {}", format_currency(dcf.total)),
        "Consider the industry trends and growth potential when making final decisions".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::RiskLevel;
    use crate::valuation::ValuationEngine;

    fn report() -> ValuationReport {
        let input = ValuationInput {
            revenue: 500.0,
            ebitda: 100.0,
            growth_rate: 0.0,
            industry: "technology".to_string(),
            risk_level: RiskLevel::Low,
            location: None,
            gross_margin: None,
        };
        ValuationEngine::default().valuate(&input, None).unwrap()
    }

    #[test]
    fn test_recommendations() {
        let report = report();
        assert_eq!(
            report.recommendations,
            vec![
                "EBITDA Multiple Valuation suggests a range of $1,000 - $1,500",
                "DCF Analysis indicates a value of $1,171",
                "Consider the industry trends and growth potential when making final decisions",
            ]
        );
    }

    #[test]
    fn test_render_text_without_comparables() {
        let text = report().render_text();
        assert!(text.contains("Range: $1,000 - $1,500"));
        assert!(text.contains("Average: $1,250"));
        assert!(text.contains("Valuation: $1,171"));
        assert!(text.contains("Discount rate: 10.0%"));
        assert!(text.contains("No comparable data available"));
        assert!(!text.contains("default range"));
    }

    #[test]
    fn test_display_matches_render_text() {
        let report = report();
        let text = report.render_text();
        assert_eq!(format!("{}", report), text);
        assert!(text.starts_with("Business Valuation (technology)\n"));
        assert!(text.ends_with("when making final decisions\n"));
    }

    #[test]
    fn test_render_text_with_comparables() {
        let mut report = report();
        report.comparables = Some(vec![ComparableCompany {
            name: "Initech".to_string(),
            industry: "technology".to_string(),
            location: None,
            revenue: 2_000_000.0,
            ebitda_multiple: 11.5,
            market_cap: 9_000_000.0,
        }]);
        report.comparable_valuation = Some(1_150.0);
        let text = report.render_text();
        assert!(text.contains("Initech"));
        assert!(text.contains("11.5x"));
        assert!(text.contains("$9,000,000"));
        assert!(text.contains("Implied valuation: $1,150"));
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["ebitda"]["min"], 1000.0);
        assert_eq!(json["input"]["risk_level"], "low");
        assert!(json["comparables"].is_null());
        assert_eq!(json["dcf"]["years"].as_array().map(Vec::len), Some(5));
    }
}
