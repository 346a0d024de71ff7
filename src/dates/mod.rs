use chrono::{DateTime, Utc};

use crate::errors::{ParseError, ParseResult};

/// Parses an RFC-822-style date as used by RSS `pubDate`, normalized to UTC.
pub fn parse_rfc822(text: &str) -> ParseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ParseError::DateFormat(format!("{:?}: {}", text, e)))
}

/// Parses an ISO-8601/RFC-3339 timestamp as used by Atom and JSON Feed,
/// normalized to UTC.
pub fn parse_rfc3339(text: &str) -> ParseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ParseError::DateFormat(format!("{:?}: {}", text, e)))
}
