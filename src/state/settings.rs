//! Court count and warmup settings, read from and written to URL queries

use axum::{extract::Query, http::Uri};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Warmup length when none is configured, including travel time to the court
pub const DEFAULT_WARMUP_MINUTES: u64 = 8;

/// Upper bound on the number of courts a query can request
pub const MAX_COURT_COUNT: usize = 128;

/// Settings shared by every court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub court_count: usize,
    pub warmup_minutes: u64,
}

impl Settings {
    pub fn new(court_count: usize, warmup_minutes: u64) -> Self {
        Self {
            court_count: court_count.min(MAX_COURT_COUNT),
            warmup_minutes: if warmup_minutes > 0 { warmup_minutes } else { DEFAULT_WARMUP_MINUTES },
        }
    }

    /// Resolve raw query values, using `fallback` for anything missing or unparsable
    pub fn from_query(query: &SettingsQuery, fallback: Settings) -> Self {
        let court_count = query
            .court_count
            .as_deref()
            .and_then(parse_int_value)
            .map(|n| usize::try_from(n.max(0)).unwrap_or(MAX_COURT_COUNT).min(MAX_COURT_COUNT))
            .unwrap_or(fallback.court_count);

        let warmup_minutes = query
            .warmup_time
            .as_deref()
            .and_then(parse_int_value)
            .filter(|&minutes| minutes > 0)
            .and_then(|minutes| u64::try_from(minutes).ok())
            .unwrap_or(fallback.warmup_minutes);

        Self {
            court_count,
            warmup_minutes,
        }
    }

    /// Parse settings from a query string.
    ///
    /// Accepts a bare query (`courtCount=3`), one with a leading `?`, or a full
    /// URL. An undecodable query yields `fallback` unchanged.
    pub fn parse_query(raw: &str, fallback: Settings) -> Self {
        let query = raw.split_once('?').map_or(raw, |(_, query)| query);

        let uri = match format!("/?{}", query).parse::<Uri>() {
            Ok(uri) => uri,
            Err(e) => {
                warn!("Ignoring malformed settings query {:?}: {}", raw, e);
                return fallback;
            }
        };

        match Query::<SettingsQuery>::try_from_uri(&uri) {
            Ok(Query(query)) => Self::from_query(&query, fallback),
            Err(e) => {
                warn!("Ignoring undecodable settings query {:?}: {}", raw, e);
                fallback
            }
        }
    }

    /// Encode as the query string clients can bookmark
    pub fn to_query(&self) -> String {
        format!("courtCount={}&warmupTime={}", self.court_count, self.warmup_minutes)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(0, DEFAULT_WARMUP_MINUTES)
    }
}

/// Raw query parameters; values stay strings so bad input can fall back
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsQuery {
    #[serde(rename = "courtCount")]
    pub court_count: Option<String>,
    #[serde(rename = "warmupTime")]
    pub warmup_time: Option<String>,
}

/// Leniently parse a leading integer.
///
/// Skips leading whitespace, accepts one sign, then reads the longest run of
/// digits and ignores the rest (`"12abc"` is 12, `"3.9"` is 3). A `0x`/`0X`
/// prefix switches to hexadecimal (`"0x1F"` is 31). Returns `None` when there
/// are no digits or the value does not fit.
pub fn parse_int_value(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else {
        (false, trimmed.strip_prefix('+').unwrap_or(trimmed))
    };

    let (radix, body) = match unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };

    let end = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    let digits = &body[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> Settings {
        Settings::new(4, DEFAULT_WARMUP_MINUTES)
    }

    #[test]
    fn test_parse_int_value() {
        assert_eq!(parse_int_value("12"), Some(12));
        assert_eq!(parse_int_value("  7"), Some(7));
        assert_eq!(parse_int_value("-3"), Some(-3));
        assert_eq!(parse_int_value("+5"), Some(5));
        assert_eq!(parse_int_value("12abc"), Some(12));
        assert_eq!(parse_int_value("3.9"), Some(3));
        assert_eq!(parse_int_value("abc"), None);
        assert_eq!(parse_int_value(""), None);
        assert_eq!(parse_int_value("-"), None);
        assert_eq!(parse_int_value("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_int_value_hex_prefix() {
        assert_eq!(parse_int_value("0x4"), Some(4));
        assert_eq!(parse_int_value("0X1F"), Some(31));
        assert_eq!(parse_int_value("-0x10"), Some(-16));
        assert_eq!(parse_int_value(" 0xAzz"), Some(10));
        assert_eq!(parse_int_value("0x"), None);
        assert_eq!(parse_int_value("0xg"), None);
        assert_eq!(parse_int_value("04"), Some(4));

        let settings = Settings::parse_query("courtCount=0x4", fallback());
        assert_eq!(settings.court_count, 4);
    }

    #[test]
    fn test_parse_query_reads_both_values() {
        let settings = Settings::parse_query("courtCount=3&warmupTime=10", fallback());
        assert_eq!(settings, Settings::new(3, 10));
    }

    #[test]
    fn test_parse_query_accepts_full_url() {
        let settings = Settings::parse_query("http://club.local/?warmupTime=5&courtCount=6", fallback());
        assert_eq!(settings, Settings::new(6, 5));

        let settings = Settings::parse_query("?courtCount=2", fallback());
        assert_eq!(settings, Settings::new(2, DEFAULT_WARMUP_MINUTES));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let settings = Settings::parse_query("courtCount=lots&warmupTime=soon", fallback());
        assert_eq!(settings, fallback());

        let settings = Settings::parse_query("", fallback());
        assert_eq!(settings, fallback());
    }

    #[test]
    fn test_non_positive_warmup_falls_back() {
        let settings = Settings::parse_query("warmupTime=0", fallback());
        assert_eq!(settings.warmup_minutes, DEFAULT_WARMUP_MINUTES);

        let settings = Settings::parse_query("warmupTime=-4", fallback());
        assert_eq!(settings.warmup_minutes, DEFAULT_WARMUP_MINUTES);
    }

    #[test]
    fn test_court_count_is_clamped() {
        let settings = Settings::parse_query("courtCount=-2", fallback());
        assert_eq!(settings.court_count, 0);

        let settings = Settings::parse_query("courtCount=100000", fallback());
        assert_eq!(settings.court_count, MAX_COURT_COUNT);
    }

    #[test]
    fn test_to_query_round_trips() {
        let settings = Settings::new(5, 12);
        assert_eq!(settings.to_query(), "courtCount=5&warmupTime=12");
        assert_eq!(Settings::parse_query(&settings.to_query(), Settings::default()), settings);
    }

    #[test]
    fn test_new_rejects_zero_warmup() {
        assert_eq!(Settings::new(1, 0).warmup_minutes, DEFAULT_WARMUP_MINUTES);
    }
}
