//! Canonical numeric and display forms of [`EstimateValue`].
//!
//! Both reductions are total: every input, however malformed, produces a
//! finite number and a printable string.

use crate::quote::EstimateValue;

/// Unit used when displaying prices.
pub const CURRENCY_UNIT: &str = "€";
/// Unit used when displaying durations.
pub const HOURS_UNIT: &str = "h";

// Longest first so "hours" is stripped before "h".
const UNIT_MARKERS: &[&str] = &["hours", "hour", "hrs", "hr", "eur", "usd", "€", "$", "£", "h"];

/// Reduces a value to the single number used for arithmetic.
///
/// Ranges collapse to their midpoint. Strings have unit markers stripped and
/// may themselves encode a range (`"20-30h"`). Anything unparsable, and any
/// non-finite result, yields `0`.
pub fn extract_numeric(value: &EstimateValue) -> f64 {
    let n = match value {
        EstimateValue::Precise(v) => *v,
        EstimateValue::Range { min, max } => midpoint(*min, *max),
        EstimateValue::Preformatted(text) => {
            let cleaned = strip_units(text);
            match split_range(cleaned) {
                Some((lo, hi)) => match (parse_amount(lo), parse_amount(hi)) {
                    (Some(lo), Some(hi)) => midpoint(lo, hi),
                    _ => 0.0,
                },
                None => parse_amount(cleaned).unwrap_or(0.0),
            }
        }
    };
    finite_or_zero(n)
}

/// Renders a value for display with `unit` appended.
pub fn format_display(value: &EstimateValue, unit: &str) -> String {
    match value {
        EstimateValue::Precise(v) => format!("{}{}", format_number(*v), unit),
        EstimateValue::Range { min, max } if min == max => {
            format!("{}{}", format_number(*min), unit)
        }
        EstimateValue::Range { min, max } => {
            format!("{}-{}{}", format_number(*min), format_number(*max), unit)
        }
        EstimateValue::Preformatted(text) => {
            if text.contains(unit) {
                text.clone()
            } else if text.contains('-') {
                format!("{text}{unit}")
            } else {
                match parse_plain(text) {
                    Some(n) => format!("{}{}", format_number(n), unit),
                    None => format!("{text}{unit}"),
                }
            }
        }
    }
}

/// Prints integral values without a fractional part and everything else
/// with at most two decimals.
pub fn format_number(n: f64) -> String {
    let n = finite_or_zero(n);
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let fixed = format!("{:.2}", n);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

fn midpoint(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() { n } else { 0.0 }
}

/// Strips unit markers from both ends, case-insensitively, until none remain.
fn strip_units(text: &str) -> &str {
    let mut s = text.trim();
    loop {
        // ASCII lowercasing keeps byte offsets aligned with `s`.
        let lower = s.to_ascii_lowercase();
        let suffix = UNIT_MARKERS.iter().find(|m| lower.ends_with(*m));
        let prefix = UNIT_MARKERS.iter().find(|m| lower.starts_with(*m));
        match (suffix, prefix) {
            (Some(m), _) => s = s[..s.len() - m.len()].trim(),
            (None, Some(m)) => s = s[m.len()..].trim(),
            (None, None) => return s,
        }
    }
}

/// Splits on the first `-` that is not a leading sign.
fn split_range(s: &str) -> Option<(&str, &str)> {
    let (idx, _) = s.char_indices().skip(1).find(|(_, c)| *c == '-')?;
    Some((&s[..idx], &s[idx + 1..]))
}

/// Parses one bound, tolerating units, digit-group spaces and a decimal comma.
fn parse_amount(s: &str) -> Option<f64> {
    let compact: String = strip_units(s)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    parse_plain(&compact)
}

fn parse_plain(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
