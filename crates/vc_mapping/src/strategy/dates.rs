//! Regex-driven date strategies.
//!
//! Hydrators recognise date strings and turn them into `chrono` values stored
//! as [`FieldValue::Opaque`]; dehydrators turn those values back into strings.
//! Anything that is not recognised passes through unchanged, so the same
//! strategy can sit on a field that is sometimes a date and sometimes not.
//!
//! | strategy             | direction | string form                  | native type                 |
//! |----------------------|-----------|------------------------------|-----------------------------|
//! | [`iso_datetime`]     | hydrate   | `2024-05-01T10:00:00+02:00`  | `DateTime<FixedOffset>`     |
//! | [`iso_date`]         | hydrate   | `2024-05-01`                 | `NaiveDate`                 |
//! | [`datetime_to_iso`]  | dehydrate | RFC 3339                     | `DateTime<FixedOffset/Utc>` |
//! | [`date_to_iso`]      | dehydrate | `YYYY-MM-DD`                 | `NaiveDate`                 |

use alloc::format;
use alloc::string::String;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;

use super::Strategy;
use crate::MappingError;
use crate::value::FieldValue;

static ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?(Z|[+-]\d{2}:\d{2})$")
        .expect("date-time pattern is valid")
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

fn matching_str<'a>(value: &'a FieldValue, pattern: &Regex) -> Option<&'a str> {
    match value.as_json() {
        Some(Value::String(text)) if pattern.is_match(text) => Some(text),
        _ => None,
    }
}

/// Hydrates ISO-8601 date-time strings with an offset into `DateTime<FixedOffset>`.
///
/// A string that matches the pattern but names an impossible instant fails
/// with [`MappingError::Transform`].
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, FixedOffset};
/// use vc_mapping::MappingRegistry;
/// use vc_mapping::strategy::dates::iso_datetime;
/// use vc_mapping::value::FieldValue;
///
/// let registry = MappingRegistry::new();
/// let value = iso_datetime()
///     .apply(FieldValue::from("2024-05-01T10:00:00Z"), &registry)
///     .unwrap();
/// let parsed = value.into_opaque::<DateTime<FixedOffset>>().unwrap();
/// assert_eq!(parsed.timestamp(), 1_714_557_600);
/// ```
pub fn iso_datetime() -> Strategy {
    Strategy::new(|value| {
        let Some(text) = matching_str(&value, &ISO_DATETIME) else {
            return Ok(value);
        };
        match DateTime::parse_from_rfc3339(text) {
            Ok(parsed) => Ok(FieldValue::opaque(parsed)),
            Err(err) => Err(MappingError::Transform(format!("invalid date-time `{text}`: {err}"))),
        }
    })
}

/// Hydrates `YYYY-MM-DD` strings into `NaiveDate`.
pub fn iso_date() -> Strategy {
    Strategy::new(|value| {
        let Some(text) = matching_str(&value, &ISO_DATE) else {
            return Ok(value);
        };
        match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(parsed) => Ok(FieldValue::opaque(parsed)),
            Err(err) => Err(MappingError::Transform(format!("invalid date `{text}`: {err}"))),
        }
    })
}

/// Dehydrates `DateTime<FixedOffset>` and `DateTime<Utc>` into RFC 3339 strings.
pub fn datetime_to_iso() -> Strategy {
    Strategy::new(|value| {
        let text: String = if let Some(date) = value.as_opaque::<DateTime<FixedOffset>>() {
            date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        } else if let Some(date) = value.as_opaque::<DateTime<Utc>>() {
            date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        } else {
            return Ok(value);
        };
        Ok(FieldValue::from(text))
    })
}

/// Dehydrates `NaiveDate` into `YYYY-MM-DD` strings.
pub fn date_to_iso() -> Strategy {
    Strategy::new(|value| match value.as_opaque::<NaiveDate>() {
        Some(date) => Ok(FieldValue::from(format!("{}", date.format("%Y-%m-%d")))),
        None => Ok(value),
    })
}

// -----------------------------------------------------------------------------
// Tests
