//! Serde helpers for backend timestamps.
//!
//! The API emits ISO-8601 timestamps, sometimes with an offset
//! (`2024-03-01T12:00:00Z`) and sometimes naive (`2024-03-01T12:00:00.123456`).
//! Naive values are taken to be UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse("2024-03-01T12:30:00Z").expect("rfc3339 should parse");
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 12);

        let offset = parse("2024-03-01T12:30:00+02:00").expect("offset should parse");
        assert_eq!(offset.hour(), 10);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse("2024-03-01T12:30:00").expect("naive should parse");
        assert_eq!(dt.minute(), 30);

        let fractional = parse("2024-03-01T12:30:00.123456").expect("fractional should parse");
        assert_eq!(fractional.second(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("").is_none());
        assert!(parse("yesterday").is_none());
    }
}
