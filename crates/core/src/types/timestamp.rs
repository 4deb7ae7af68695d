//! Date/time values used in list filters (`created_at_min`, `updated_at_max`, ...).
//!
//! The host's date picker may hand over a full RFC 3339 timestamp, a naive
//! timestamp or a bare date. All three are accepted, and the API receives the
//! text exactly as given: Sapo reads naive values in shop time.

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`FilterTimestamp`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The input string is empty.
    #[error("timestamp cannot be empty")]
    Empty,
    /// The input is not a recognised date or date-time.
    #[error("invalid timestamp: {0}")]
    Invalid(String),
}

/// A syntactically valid filter bound, kept in its original form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterTimestamp(String);

impl FilterTimestamp {
    /// Parse a filter timestamp.
    ///
    /// # Errors
    ///
    /// Returns `TimestampError` if the input is empty or not a date/date-time.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimestampError::Empty);
        }

        let valid = DateTime::parse_from_rfc3339(s).is_ok()
            || ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .any(|format| NaiveDateTime::parse_from_str(s, format).is_ok())
            || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok();

        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(TimestampError::Invalid(s.to_owned()))
        }
    }

    /// Get the timestamp as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FilterTimestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FilterTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FilterTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FilterTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_offset() {
        let ts = FilterTimestamp::parse("2024-06-01T07:00:00+07:00").expect("parse");
        assert_eq!(ts.to_string(), "2024-06-01T07:00:00+07:00");
    }

    #[test]
    fn test_parse_naive_datetime() {
        let ts = FilterTimestamp::parse("2024-06-01T12:30:00").expect("parse");
        assert_eq!(ts.as_str(), "2024-06-01T12:30:00");

        let ts = FilterTimestamp::parse(" 2024-06-01 12:30:00.250 ").expect("parse");
        assert_eq!(ts.as_str(), "2024-06-01 12:30:00.250");
    }

    #[test]
    fn test_parse_date_only() {
        let ts = FilterTimestamp::parse("2024-06-01").expect("parse");
        assert_eq!(ts.to_string(), "2024-06-01");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(FilterTimestamp::parse("  "), Err(TimestampError::Empty));
        assert!(matches!(
            FilterTimestamp::parse("last tuesday"),
            Err(TimestampError::Invalid(_))
        ));
        assert!(matches!(
            FilterTimestamp::parse("2024-13-45"),
            Err(TimestampError::Invalid(_))
        ));
    }

    #[test]
    fn test_serde_preserves_text() {
        let ts: FilterTimestamp =
            serde_json::from_str("\"2024-01-02T08:00:00+07:00\"").expect("deserialize");
        assert_eq!(
            serde_json::to_string(&ts).expect("serialize"),
            "\"2024-01-02T08:00:00+07:00\""
        );
        assert!(serde_json::from_str::<FilterTimestamp>("\"soon\"").is_err());
    }
}
