//! Conversion of textual filter values into typed clause values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::clause::ClauseValue;
use crate::error::CoercionError;
use crate::schema::TypeTag;
use crate::value::Number;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Converts `raw` into a value of the declared type.
///
/// Strings pass through untouched; every other type is parsed from the
/// trimmed text using locale-invariant rules.
///
/// ```
/// use sieve::{coerce, ClauseValue, Number, TypeTag};
///
/// assert_eq!(coerce("TRUE", &TypeTag::Bool), Ok(ClauseValue::Bool(true)));
/// assert_eq!(coerce(" 42 ", &TypeTag::Int), Ok(ClauseValue::Number(Number::I64(42))));
/// assert!(coerce("4,2", &TypeTag::Float).is_err());
/// ```
pub fn coerce(raw: &str, ty: &TypeTag) -> Result<ClauseValue, CoercionError> {
    if let TypeTag::String = ty {
        return Ok(ClauseValue::String(raw.to_string()));
    }

    let text = raw.trim();
    if text.is_empty() {
        return Err(CoercionError::Empty);
    }
    let invalid = || CoercionError::Invalid {
        value: raw.to_string(),
        expected: ty.name(),
    };

    match ty {
        TypeTag::Bool => parse_bool(text).map(ClauseValue::Bool).ok_or_else(invalid),
        TypeTag::Enum(descriptor) => descriptor()
            .parse(text)
            .map(ClauseValue::Enum)
            .ok_or_else(invalid),
        TypeTag::Guid => Uuid::parse_str(text)
            .map(ClauseValue::Guid)
            .map_err(|_| invalid()),
        TypeTag::DateTime => parse_datetime(text)
            .map(ClauseValue::DateTime)
            .ok_or_else(invalid),
        TypeTag::Int => parse_int(text)
            .map(ClauseValue::Number)
            .ok_or_else(invalid),
        TypeTag::Float => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| ClauseValue::Number(Number::F64(f)))
            .ok_or_else(invalid),
        TypeTag::Decimal => Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map(|d| ClauseValue::Number(Number::Decimal(d)))
            .map_err(|_| invalid()),
        TypeTag::Record(_) => Err(CoercionError::NotCoercible { ty: ty.name() }),
        TypeTag::String => Ok(ClauseValue::String(raw.to_string())),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_int(text: &str) -> Option<Number> {
    let text = text.strip_prefix('+').unwrap_or(text);
    text.parse::<i64>()
        .map(Number::I64)
        .or_else(|_| text.parse::<u64>().map(Number::U64))
        .ok()
}

/// Parses RFC 3339 (normalized to UTC), ISO-8601 date/times without offset,
/// and plain dates (midnight).
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(with_offset.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
