//! Best-effort coercion of untyped cell values.
//!
//! Listing exports mix real numbers, numbers rendered as text
//! (`"S/. 2,500"`, `"85 m²"`, `"2 dormitorios"`) and free text. Everything
//! here is total: a value that cannot be coerced is kept as
//! [`Coerced::Unparsed`], never replaced with zero.

use std::sync::LazyLock;

use chrono::NaiveDate;
use lima_housing_listing_models::Coerced;
use regex::Regex;

/// First decimal number in a string, after separator cleanup.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("valid regex"));

/// Spellings pandas and spreadsheets use for an empty cell.
const NULL_SPELLINGS: &[&str] = &["nan", "none", "null", "n/a", "na", "-"];

/// Returns the trimmed text of a cell, or `None` if the cell is empty.
#[must_use]
pub fn cell_text(value: &serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::Null => return None,
        serde_json::Value::String(s) => s.trim().to_owned(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };

    if text.is_empty() || NULL_SPELLINGS.iter().any(|n| text.eq_ignore_ascii_case(n)) {
        None
    } else {
        Some(text)
    }
}

/// Normalizes digit-group separators so every number uses `.` as its only
/// decimal separator.
///
/// Each run of digits, dots and commas is treated as one number:
/// - with both `.` and `,`, the last one is the decimal separator
///   (`"1.250,50"` → `"1250.50"`, `"1,234.5"` → `"1234.5"`);
/// - with one kind, groups of exactly three digits after a short leading
///   group are thousands (`"2,500"`, `"2.500"`, `"1.250.000"`);
/// - otherwise a single separator is decimal (`"8,5"` → `"8.5"`).
///
/// Runs that fit none of these are left untouched.
fn normalize_separators(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        out.push_str(&rest[..start]);
        let run = &rest[start..];
        let len = run
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
            .unwrap_or(run.len());
        let token = run[..len].trim_end_matches(['.', ',']);
        out.push_str(&normalize_number(token));
        rest = &run[token.len()..];
    }

    out.push_str(rest);
    out
}

fn normalize_number(token: &str) -> String {
    match (token.rfind('.'), token.rfind(',')) {
        (None, None) => token.to_owned(),
        (Some(dot), Some(comma)) => {
            let (decimal, group) = if dot > comma { ('.', ',') } else { (',', '.') };
            if token.matches(decimal).count() > 1 {
                return token.to_owned();
            }
            token
                .chars()
                .filter(|&c| c != group)
                .map(|c| if c == decimal { '.' } else { c })
                .collect()
        }
        (Some(_), None) => normalize_single_separator(token, '.'),
        (None, Some(_)) => normalize_single_separator(token, ','),
    }
}

fn normalize_single_separator(token: &str, separator: char) -> String {
    let groups: Vec<&str> = token.split(separator).collect();
    let lead = groups[0];
    let thousands = (1..=3).contains(&lead.len())
        && !lead.starts_with('0')
        && groups[1..].iter().all(|g| g.len() == 3);

    if thousands {
        groups.concat()
    } else if groups.len() == 2 {
        groups.join(".")
    } else {
        token.to_owned()
    }
}

/// Extracts the first number embedded in `text`.
#[must_use]
pub fn extract_number(text: &str) -> Option<f64> {
    let cleaned = normalize_separators(text);
    NUMBER_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Coerces a cell to a real number.
#[must_use]
pub fn coerce_f64(value: Option<&serde_json::Value>) -> Coerced<f64> {
    let Some(value) = value else {
        return Coerced::Missing;
    };

    if let Some(n) = value.as_f64() {
        return Coerced::Parsed(n);
    }

    match cell_text(value) {
        None => Coerced::Missing,
        Some(text) => extract_number(&text).map_or(Coerced::Unparsed(text), Coerced::Parsed),
    }
}

/// Coerces a price cell, converting amounts quoted in US dollars to soles.
#[must_use]
pub fn coerce_price(value: Option<&serde_json::Value>, usd_exchange_rate: f64) -> Coerced<f64> {
    let coerced = coerce_f64(value);
    let Coerced::Parsed(amount) = coerced else {
        return coerced;
    };

    let quoted_in_usd = value
        .and_then(serde_json::Value::as_str)
        .is_some_and(|s| {
            let upper = s.to_uppercase();
            upper.contains("USD") || upper.contains("US$")
        });

    if quoted_in_usd {
        Coerced::Parsed(amount * usd_exchange_rate)
    } else {
        Coerced::Parsed(amount)
    }
}

/// Coerces a cell to a non-negative whole count.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn coerce_count(value: Option<&serde_json::Value>) -> Coerced<u32> {
    let text = || value.and_then(cell_text).unwrap_or_default();

    match coerce_f64(value) {
        Coerced::Parsed(n)
            if n >= 0.0 && n.fract().abs() < f64::EPSILON && n <= f64::from(u32::MAX) =>
        {
            Coerced::Parsed(n as u32)
        }
        Coerced::Parsed(_) => Coerced::Unparsed(text()),
        Coerced::Unparsed(raw) => Coerced::Unparsed(raw),
        Coerced::Missing => Coerced::Missing,
    }
}

/// Coerces a cell to a boolean flag.
///
/// Accepts JSON booleans, numbers (non-zero is `true`) and the usual
/// spellings in English and Spanish. Returns `None` when the value is
/// missing or unrecognized.
#[must_use]
pub fn coerce_bool(value: Option<&serde_json::Value>) -> Option<bool> {
    let value = value?;

    if let Some(b) = value.as_bool() {
        return Some(b);
    }
    if let Some(n) = value.as_f64() {
        return Some(n.abs() > f64::EPSILON);
    }

    let text = cell_text(value)?.to_lowercase();
    match text.as_str() {
        "1" | "1.0" | "true" | "yes" | "y" | "si" | "sí" | "s" => Some(true),
        "0" | "0.0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parses a listing publication date.
///
/// Accepts ISO dates, the date part of ISO datetimes, and `dd/mm/yyyy`.
#[must_use]
pub fn parse_listing_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_numbers_from_decorated_text() {
        assert_eq!(extract_number("S/. 2,500"), Some(2500.0));
        assert_eq!(extract_number("85 m²"), Some(85.0));
        assert_eq!(extract_number("2 dormitorios"), Some(2.0));
        assert_eq!(extract_number("1,234,567.5"), Some(1_234_567.5));
        assert_eq!(extract_number("8,5"), Some(8.5));
        assert_eq!(extract_number("consultar"), None);
    }

    #[test]
    fn dotted_thousands_are_not_decimals() {
        assert_eq!(extract_number("S/. 2.500"), Some(2500.0));
        assert_eq!(extract_number("S/. 1.250,50"), Some(1250.5));
        assert_eq!(extract_number("1.250.000"), Some(1_250_000.0));
        assert_eq!(extract_number("US$ 1,250.75"), Some(1250.75));
        assert_eq!(extract_number("7.25"), Some(7.25));
        assert_eq!(extract_number("0.500"), Some(0.5));
        assert_eq!(
            coerce_f64(Some(&json!("S/. 1.250,50"))),
            Coerced::Parsed(1250.5)
        );
    }

    #[test]
    fn separators_outside_numbers_are_kept() {
        assert_eq!(extract_number("85 m², piso 3"), Some(85.0));
        assert_eq!(extract_number("2,500."), Some(2500.0));
        assert_eq!(extract_number("S/. 950"), Some(950.0));
    }

    #[test]
    fn numeric_json_passes_through() {
        assert_eq!(coerce_f64(Some(&json!(7.25))), Coerced::Parsed(7.25));
        assert_eq!(coerce_f64(Some(&json!("7.25"))), Coerced::Parsed(7.25));
    }

    #[test]
    fn empty_cells_are_missing() {
        assert_eq!(coerce_f64(None), Coerced::Missing);
        assert_eq!(coerce_f64(Some(&json!(null))), Coerced::Missing);
        assert_eq!(coerce_f64(Some(&json!("  "))), Coerced::Missing);
        assert_eq!(coerce_f64(Some(&json!("NaN"))), Coerced::Missing);
    }

    #[test]
    fn text_without_number_is_kept_for_display() {
        assert_eq!(
            coerce_f64(Some(&json!("a consultar"))),
            Coerced::Unparsed("a consultar".to_owned())
        );
    }

    #[test]
    fn converts_dollar_prices() {
        let price = coerce_price(Some(&json!("USD 1,000")), 3.7);
        assert_eq!(price.value().map(f64::round), Some(3700.0));

        let price = coerce_price(Some(&json!("S/. 1,000")), 3.7);
        assert_eq!(price, Coerced::Parsed(1000.0));

        let price = coerce_price(Some(&json!(1000)), 3.7);
        assert_eq!(price, Coerced::Parsed(1000.0));
    }

    #[test]
    fn counts_must_be_whole_and_non_negative() {
        assert_eq!(coerce_count(Some(&json!("3 baños"))), Coerced::Parsed(3));
        assert_eq!(coerce_count(Some(&json!("2.0"))), Coerced::Parsed(2));
        assert_eq!(coerce_count(Some(&json!(4))), Coerced::Parsed(4));
        assert_eq!(
            coerce_count(Some(&json!("1.5"))),
            Coerced::Unparsed("1.5".to_owned())
        );
        assert_eq!(
            coerce_count(Some(&json!("-1"))),
            Coerced::Unparsed("-1".to_owned())
        );
        assert_eq!(coerce_count(Some(&json!(""))), Coerced::Missing);
    }

    #[test]
    fn parses_flag_spellings() {
        assert_eq!(coerce_bool(Some(&json!(true))), Some(true));
        assert_eq!(coerce_bool(Some(&json!(0))), Some(false));
        assert_eq!(coerce_bool(Some(&json!("1"))), Some(true));
        assert_eq!(coerce_bool(Some(&json!("Sí"))), Some(true));
        assert_eq!(coerce_bool(Some(&json!("no"))), Some(false));
        assert_eq!(coerce_bool(Some(&json!("maybe"))), None);
        assert_eq!(coerce_bool(None), None);
    }

    #[test]
    fn parses_listing_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 11, 5);
        assert_eq!(parse_listing_date("2024-11-05"), expected);
        assert_eq!(parse_listing_date("2024-11-05T10:30:00"), expected);
        assert_eq!(parse_listing_date("2024-11-05 10:30:00"), expected);
        assert_eq!(parse_listing_date("05/11/2024"), expected);
        assert_eq!(parse_listing_date("hace 3 días"), None);
    }
}
