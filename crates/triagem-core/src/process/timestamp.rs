//! Lenient timestamp (de)serialization for process fields.
//!
//! Court systems emit both offset-aware RFC 3339 values and naive ISO-8601
//! date-times. Naive values are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub(crate) fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) mod optional {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_rfc3339_with_offset_is_normalized_to_utc() {
        let dt = parse("2023-05-10T10:00:00-03:00").unwrap();
        assert_eq!(dt.hour(), 13);
    }

    #[test]
    fn test_naive_datetime_is_read_as_utc() {
        let dt = parse("2023-05-10T10:00:00").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.day(), 10);
    }

    #[test]
    fn test_date_only() {
        let dt = parse("2021-01-31").unwrap();
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse("ontem").is_none());
    }
}
