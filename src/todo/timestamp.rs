//! Timestamps as the backend writes them: `yyyy-MM-dd HH:mm:ss z`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const BACKEND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format!("{} UTC", timestamp.format(BACKEND_FORMAT))
}

/// Accepts the backend format with a zone name (`UTC`, `GMT`) or numeric
/// offset, and RFC 3339.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(text, &format!("{BACKEND_FORMAT} %z")) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let (datetime, zone) = text
        .rsplit_once(' ')
        .ok_or_else(|| format!("Invalid timestamp: {}", text))?;
    let naive = NaiveDateTime::parse_from_str(datetime, BACKEND_FORMAT)
        .map_err(|e| format!("Invalid timestamp '{}': {}", text, e))?;

    match zone {
        "UTC" | "GMT" | "Z" => Ok(naive.and_utc()),
        other => Err(format!("Unsupported time zone '{}' in '{}'", other, text)),
    }
}

/// Serde adapter for optional backend timestamps.
pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(timestamp) => serializer.serialize_str(&format_timestamp(timestamp)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        match value.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_timestamp(text)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2020, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(&timestamp), "2020-05-01 12:30:00 UTC");
    }

    #[test]
    fn test_parse_backend_format() {
        let expected = Utc.with_ymd_and_hms(2020, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2020-05-01 12:30:00 UTC"), Ok(expected));
        assert_eq!(parse_timestamp("2020-05-01 12:30:00 GMT"), Ok(expected));
        assert_eq!(parse_timestamp("2020-05-01 14:30:00 +0200"), Ok(expected));
    }

    #[test]
    fn test_parse_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2020, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2020-05-01T12:30:00Z"), Ok(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2020-05-01 12:30:00 CEST").is_err());
    }
}
