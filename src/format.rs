//! Display formatting for currency, percentages and multiples (en-US)

/// Format as whole US dollars with thousands separators: `-$1,234,568`
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "$∞".to_string() } else { "-$∞".to_string() };
    }

    // f64::round rounds half away from zero; negatives keep their sign at zero
    let rounded = value.round();
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&format!("{:.0}", rounded.abs())))
}

/// Format a percent number with one decimal: `12.5` -> `12.5%`
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}%", value);
    }

    let formatted = format!("{:.1}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "0"));
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{}{}.{}%", sign, group_thousands(whole), fraction)
}

/// Format an EBITDA multiple: `12.5x`
pub fn format_multiple(value: f64) -> String {
    let formatted = format!("{:.1}", value);
    match formatted.strip_suffix(".0") {
        Some(whole) => format!("{}x", whole),
        None => format!("{}x", formatted),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(12_500_000.0), "$12,500,000");
        assert_eq!(format_currency(1170.7534), "$1,171");
        assert_eq!(format_currency(-1_234_567.5), "-$1,234,568");
        assert_eq!(format_currency(0.5), "$1");
    }

    #[test]
    fn test_negative_values_rounding_to_zero_keep_sign() {
        assert_eq!(format_currency(-0.4), "-$0");
        assert_eq!(format_currency(-0.0), "-$0");
        assert_eq!(format_percentage(-0.01), "-0.0%");
        assert_eq!(format_currency(0.4), "$0");
        assert_eq!(format_percentage(0.01), "0.0%");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "$NaN");
        assert_eq!(format_currency(f64::INFINITY), "$∞");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-$∞");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.5), "12.5%");
        assert_eq!(format_percentage(8.0), "8.0%");
        assert_eq!(format_percentage(-3.26), "-3.3%");
        assert_eq!(format_percentage(1234.56), "1,234.6%");
    }

    #[test]
    fn test_format_multiple() {
        assert_eq!(format_multiple(12.0), "12x");
        assert_eq!(format_multiple(12.5), "12.5x");
    }
}
