//! Deprecation and sunset evaluation
//!
//! A deprecated element may announce its removal date through the `x-sunset`
//! extension. The value is either a calendar date (`2025-06-01`) or an RFC 3339
//! timestamp (`2025-06-01T00:00:00Z`), given as a plain string or as a raw
//! JSON-encoded string (`"\"2025-06-01\""`).
//!
//! All predicates take the current date as an argument so callers decide which
//! clock to trust.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::openapi::Extensions;

/// Extension key carrying the sunset date
pub const SUNSET_EXTENSION: &str = "x-sunset";

/// Why no sunset date could be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SunsetError {
    #[error("sunset extension not found")]
    NotFound,

    #[error("sunset extension could not be decoded: {0}")]
    Decode(String),

    #[error("sunset date could not be parsed: {0}")]
    Parse(String),
}

/// Source of the current calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the wall clock, in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Raw form of a sunset value before date parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunsetValue<'a> {
    /// `2025-06-01`
    Plain(&'a str),
    /// `"2025-06-01"`, still JSON-encoded
    Encoded(&'a str),
}

impl<'a> SunsetValue<'a> {
    /// Classify an extension value. Non-string values carry no sunset.
    pub fn from_extension(value: &'a Value) -> Option<Self> {
        let text = value.as_str()?;
        if text.trim_start().starts_with('"') {
            Some(SunsetValue::Encoded(text))
        } else {
            Some(SunsetValue::Plain(text))
        }
    }

    /// Resolve into the canonical date string
    pub fn resolve(self) -> Result<String, SunsetError> {
        match self {
            SunsetValue::Plain(text) => Ok(text.to_string()),
            SunsetValue::Encoded(raw) => serde_json::from_str::<String>(raw)
                .map_err(|e| SunsetError::Decode(e.to_string())),
        }
    }
}

/// Read the sunset date from an extension map.
///
/// Timestamps are truncated to the calendar date in their own offset.
pub fn sunset_date(extensions: &Extensions) -> Result<NaiveDate, SunsetError> {
    let value = extensions
        .get(SUNSET_EXTENSION)
        .and_then(SunsetValue::from_extension)
        .ok_or(SunsetError::NotFound)?;
    let text = value.resolve()?;
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.date_naive());
    }

    Err(SunsetError::Parse(text.to_string()))
}

/// Whether a deprecated element is past its sunset date and may be removed.
///
/// Elements without a readable sunset date are never eligible.
pub fn sunset_allowed(deprecated: bool, extensions: &Extensions, today: NaiveDate) -> bool {
    if !deprecated {
        return false;
    }

    match sunset_date(extensions) {
        Ok(date) => today > date,
        Err(_) => false,
    }
}

/// Whether the sunset date leaves at least `minimum_days` from today.
///
/// A zero minimum disables the policy. A missing or unreadable date fails the check.
pub fn deprecation_period_sufficient(minimum_days: i64, extensions: &Extensions, today: NaiveDate) -> bool {
    if minimum_days == 0 {
        return true;
    }

    match sunset_date(extensions) {
        Ok(date) => (date - today).num_days() >= minimum_days,
        Err(_) => false,
    }
}

/// Evaluator verdicts for a deprecated element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationFindings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<NaiveDate>,
    pub sunset_allowed: bool,
    pub period_sufficient: bool,
}

impl DeprecationFindings {
    /// Findings for an element, or `None` when it is not deprecated
    pub fn evaluate(
        deprecated: bool,
        extensions: &Extensions,
        minimum_days: i64,
        today: NaiveDate,
    ) -> Option<Self> {
        if !deprecated {
            return None;
        }

        Some(Self {
            sunset: sunset_date(extensions).ok(),
            sunset_allowed: sunset_allowed(deprecated, extensions, today),
            period_sufficient: deprecation_period_sufficient(minimum_days, extensions, today),
        })
    }
}
