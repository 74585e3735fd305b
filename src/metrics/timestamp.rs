use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses the timestamp shapes the backend is known to emit: RFC 3339, or a
/// naive ISO form which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}

/// Identity of an observation instant, used for anomaly dedup.
///
/// Equivalent spellings of the same instant compare equal; unparseable
/// values fall back to exact string identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimestampKey {
    Instant(DateTime<Utc>),
    Raw(String),
}

impl TimestampKey {
    pub fn from_raw(raw: &str) -> Self {
        match parse_timestamp(raw) {
            Some(instant) => Self::Instant(instant),
            None => Self::Raw(raw.trim().to_string()),
        }
    }
}
