//! Display formatting for report cells.
//!
//! Guarded formatters print `N/A` for absent, non-numeric, and zero values, so a
//! neutral default never shows up as a real reading.

use stockscope_core::Value;

/// Placeholder for values that cannot be shown.
pub const NOT_AVAILABLE: &str = "N/A";

/// Returns the value as a number if it is numeric and non-zero.
#[must_use]
pub fn truthy(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| *v != 0.0)
}

fn guarded(value: &Value, render: impl FnOnce(f64) -> String) -> String {
    truthy(value).map_or_else(|| NOT_AVAILABLE.to_string(), render)
}

/// `$x.xx` for any number, zero included.
#[must_use]
pub fn price(value: &Value) -> String {
    value
        .as_f64()
        .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${v:.2}"))
}

/// `$x.xx`, guarded.
#[must_use]
pub fn money(value: &Value) -> String {
    guarded(value, |v| format!("${v:.2}"))
}

/// `$x.xxB` from a raw dollar amount, guarded.
#[must_use]
pub fn billions(value: &Value) -> String {
    guarded(value, |v| format!("${:.2}B", v / 1e9))
}

/// `x.xxM` from a raw count, guarded.
#[must_use]
pub fn millions(value: &Value) -> String {
    guarded(value, |v| format!("{:.2}M", v / 1e6))
}

/// `x.xx`, guarded.
#[must_use]
pub fn ratio(value: &Value) -> String {
    guarded(value, |v| format!("{v:.2}"))
}

/// `x.xx%` from a fraction, guarded.
#[must_use]
pub fn percent(value: &Value) -> String {
    guarded(value, |v| format!("{:.2}%", v * 100.0))
}

/// Whole numbers with thousands separators (`161,000`), guarded.
#[must_use]
pub fn thousands(value: &Value) -> String {
    guarded(value, |v| {
        if v.fract() == 0.0 && v.abs() < 9.0e15 {
            group_digits(&format!("{v:.0}"))
        } else {
            group_digits(&format!("{v:.2}"))
        }
    })
}

/// Inserts commas every three digits of the integer part.
fn group_digits(number: &str) -> String {
    let (sign, unsigned) = number
        .strip_prefix('-')
        .map_or(("", number), |rest| ("-", rest));
    let (integer, fraction) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// The value as text; absent shows as `N/A`.
#[must_use]
pub fn text(value: &Value) -> String {
    value.to_string()
}

/// The value as upper-cased text.
#[must_use]
pub fn upper(value: &Value) -> String {
    value.to_string().to_uppercase()
}

/// Statement amounts: `$x.xxB` at or above one billion in magnitude, otherwise `$x.xxM`.
#[must_use]
pub fn statement_amount(value: f64) -> String {
    if value.abs() >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else {
        format!("${:.2}M", value / 1e6)
    }
}

/// Title-cases a line item name: underscores become spaces, each run of letters
/// starts upper-case and continues lower-case.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Absent, "N/A")]
    #[case(Value::Int(0), "N/A")]
    #[case(Value::Float(0.0), "N/A")]
    #[case(Value::from("N/A"), "N/A")]
    #[case(Value::Float(1.234), "1.23")]
    #[case(Value::Int(-2), "-2.00")]
    fn test_ratio_guard(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(ratio(&value), expected);
    }

    #[test]
    fn test_price_is_unguarded_for_zero() {
        assert_eq!(price(&Value::Int(0)), "$0.00");
        assert_eq!(price(&Value::Float(227.456)), "$227.46");
        assert_eq!(price(&Value::Absent), "N/A");
    }

    #[test]
    fn test_units() {
        assert_eq!(billions(&Value::Float(3.4e12)), "$3400.00B");
        assert_eq!(millions(&Value::Int(52_164_000)), "52.16M");
        assert_eq!(percent(&Value::Float(0.2397)), "23.97%");
        assert_eq!(money(&Value::Float(6.08)), "$6.08");
    }

    #[rstest]
    #[case(Value::Int(161_000), "161,000")]
    #[case(Value::Int(999), "999")]
    #[case(Value::Int(1_234_567), "1,234,567")]
    #[case(Value::Float(1500.5), "1,500.50")]
    #[case(Value::Int(-12_000), "-12,000")]
    #[case(Value::Absent, "N/A")]
    fn test_thousands(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(thousands(&value), expected);
    }

    #[rstest]
    #[case(391_035_000_000.0, "$391.04B")]
    #[case(1e9, "$1.00B")]
    #[case(-2.5e9, "$-2.50B")]
    #[case(999_999_999.0, "$1000.00M")]
    #[case(-45_000_000.0, "$-45.00M")]
    fn test_statement_amount(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(statement_amount(value), expected);
    }

    #[rstest]
    #[case("Total Revenue", "Total Revenue")]
    #[case("net_income", "Net Income")]
    #[case("EBITDA", "Ebitda")]
    #[case("gross profit 3rd", "Gross Profit 3Rd")]
    fn test_title_case(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(title_case(name), expected);
    }

    #[test]
    fn test_text_and_upper() {
        assert_eq!(upper(&Value::from("buy")), "BUY");
        assert_eq!(upper(&Value::Absent), "N/A");
        assert_eq!(text(&Value::Int(38)), "38");
    }
}
