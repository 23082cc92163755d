//! Decimal and timestamp normalisation for element text.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::core::ParseError;

fn invalid(field: &str, value: &str) -> ParseError {
    ParseError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Rewrite a localized number to `[-]digits[.digits]`.
///
/// When both `,` and `.` appear, the one that occurs last is the decimal
/// separator. A lone separator kind is a decimal separator if it occurs
/// once and a thousands separator if it repeats.
pub(crate) fn normalize_number(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');
    let decimal_sep = match (last_comma, last_dot) {
        (Some(c), Some(d)) => Some(if c > d { ',' } else { '.' }),
        (Some(_), None) if compact.matches(',').count() == 1 => Some(','),
        (None, Some(_)) if compact.matches('.').count() == 1 => Some('.'),
        _ => None,
    };

    compact
        .chars()
        .filter_map(|c| match c {
            ',' | '.' if Some(c) == decimal_sep => Some('.'),
            ',' | '.' => None,
            other => Some(other),
        })
        .collect()
}

/// Parse a monetary or quantity field as a fixed-point decimal.
pub(crate) fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, ParseError> {
    let normalized = normalize_number(raw);
    Decimal::from_str(&normalized).map_err(|_| invalid(field, raw))
}

/// Parse an ISO-8601 timestamp that carries a UTC offset.
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(raw.trim()).map_err(|_| invalid(field, raw))
}
