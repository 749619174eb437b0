//! Earliest-resolution date parsing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Naive forms accepted when the caller leaves out the offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 timestamp, assuming UTC when no offset is present.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00+02:00`, `...Z`), the same with a
/// space separator, naive date-times, and bare dates (midnight).
pub fn parse_resolution_date(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_keeps_offset() {
        let dt = parse_resolution_date("2024-06-20T18:00:00+02:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(dt.to_rfc3339(), "2024-06-20T18:00:00+02:00");
    }

    #[test]
    fn test_naive_defaults_to_utc() {
        let dt = parse_resolution_date("2024-01-01T00:00:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_space_separated_and_fractional() {
        let dt = parse_resolution_date("2024-01-01 12:30:00.250").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-01T12:30:00.250+00:00");
    }

    #[test]
    fn test_bare_date_is_midnight_utc() {
        let dt = parse_resolution_date("2024-10-09").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-10-09T00:00:00+00:00");
    }

    #[test]
    fn test_zulu() {
        let dt = parse_resolution_date("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_garbage_fails() {
        assert!(parse_resolution_date("next tuesday").is_err());
        assert!(parse_resolution_date("").is_err());
    }
}
