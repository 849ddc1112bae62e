//! Timestamp parsing and calendar formatting.
//!
//! Exports store dates as epoch milliseconds, as ISO strings, or embedded
//! in recurrence rules (`DTSTART=20251009T034000Z`). Everything is shown
//! as a calendar date (`YYYY-MM-DD`) or a time of day (`HH:MM`) in a
//! configurable [`DateBasis`].
//!
//! # Accepted values
//!
//! - JSON numbers and numeric strings: epoch milliseconds
//! - RFC 3339 strings (`2025-10-09T03:40:00Z`): instants
//! - `YYYY-MM-DDTHH:MM[:SS[.f]]` without offset: wall-clock time in the basis
//! - `YYYY-MM-DD`: a calendar date, taken as-is
//!
//! Anything else (booleans, objects, blank strings) is unparseable and
//! formats as an empty string.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

/// Time zone used to turn instants into calendar dates and clock times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateBasis {
    /// The host's local zone.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl DateBasis {
    /// Wall-clock reading of an instant in this basis.
    pub fn wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Utc => instant.naive_utc(),
            Self::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

impl FromStr for DateBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => return Ok(Self::Local),
            "utc" | "z" => return Ok(Self::Utc),
            _ => {}
        }
        parse_offset(trimmed).map(Self::Fixed).ok_or_else(|| {
            format!("invalid date basis '{trimmed}' (expected local, utc, or an offset like +09:00)")
        })
    }
}

impl fmt::Display for DateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Utc => f.write_str("utc"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// A parsed point in time, keeping how precise the source was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    /// An absolute instant (epoch value or offset-qualified string).
    Instant(DateTime<Utc>),
    /// A wall-clock time already expressed in the basis.
    Wall(NaiveDateTime),
    /// A bare calendar date.
    Date(NaiveDate),
}

impl Moment {
    pub fn wall_clock(&self, basis: DateBasis) -> NaiveDateTime {
        match self {
            Self::Instant(instant) => basis.wall_clock(*instant),
            Self::Wall(wall) => *wall,
            Self::Date(date) => date.and_time(NaiveTime::MIN),
        }
    }

    pub fn date(&self, basis: DateBasis) -> NaiveDate {
        self.wall_clock(basis).date()
    }

    /// Time of day in the basis. A bare date has none.
    pub fn time(&self, basis: DateBasis) -> Option<NaiveTime> {
        match self {
            Self::Date(_) => None,
            _ => Some(self.wall_clock(basis).time()),
        }
    }
}

/// Parse a JSON timestamp value.
pub fn parse_moment(value: &Value) -> Option<Moment> {
    match value {
        Value::Number(number) => from_millis(number.as_f64()?),
        Value::String(text) => parse_text(text),
        _ => None,
    }
}

fn parse_text(text: &str) -> Option<Moment> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(millis) = trimmed.parse::<f64>() {
        return from_millis(millis);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(Moment::Instant(instant.with_timezone(&Utc)));
    }
    const WALL_FORMATS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in WALL_FORMATS {
        if let Ok(wall) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Moment::Wall(wall));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(Moment::Date)
}

fn from_millis(millis: f64) -> Option<Moment> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64).map(Moment::Instant)
}

/// Calendar date (`YYYY-MM-DD`) of a timestamp value, or empty.
pub fn format_date(value: &Value, basis: DateBasis) -> String {
    parse_moment(value)
        .map(|moment| moment.date(basis).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Time of day (`HH:MM`) of a timestamp value, or empty for bare dates and
/// unparseable values.
pub fn format_time(value: &Value, basis: DateBasis) -> String {
    parse_moment(value)
        .and_then(|moment| moment.time(basis))
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// A `DTSTART` stamp found inside a recurrence string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtStart<'a> {
    /// `YYYYMMDD`
    pub date: &'a str,
    /// `HHMMSS`
    pub time: &'a str,
    /// Whether a trailing `Z` marks the stamp as UTC.
    pub utc: bool,
    /// Whether `:` or `=` followed the `DTSTART` keyword.
    pub separated: bool,
}

impl DtStart<'_> {
    /// `HH:MM` as written in the stamp, without zone conversion.
    pub fn clock(&self) -> String {
        format!("{}:{}", &self.time[..2], &self.time[2..4])
    }

    /// The stamp as a moment: an instant when UTC, else wall-clock time.
    pub fn moment(&self) -> Option<Moment> {
        let text = format!("{}T{}", self.date, self.time);
        let wall = NaiveDateTime::parse_from_str(&text, "%Y%m%dT%H%M%S").ok()?;
        Some(if self.utc {
            Moment::Instant(wall.and_utc())
        } else {
            Moment::Wall(wall)
        })
    }
}

/// Find the first `DTSTART` stamp (case-insensitive) in a rule string.
///
/// With `require_separator`, only stamps written as `DTSTART:` or
/// `DTSTART=` match.
pub fn find_dtstart(rule: &str, require_separator: bool) -> Option<DtStart<'_>> {
    const KEYWORD: &str = "DTSTART";
    let upper = rule.to_ascii_uppercase();
    let mut search_from = 0;
    while let Some(found) = upper[search_from..].find(KEYWORD) {
        let start = search_from + found;
        search_from = start + KEYWORD.len();
        if let Some(stamp) = stamp_at(rule, search_from, require_separator) {
            return Some(stamp);
        }
    }
    None
}

/// Start of a recurrence as a moment, from its `DTSTART` stamp.
pub fn parse_dtstart(rule: &str) -> Option<Moment> {
    find_dtstart(rule, false)?.moment()
}

fn stamp_at(rule: &str, offset: usize, require_separator: bool) -> Option<DtStart<'_>> {
    let bytes = rule.as_bytes();
    let mut pos = offset;
    let separated = matches!(bytes.get(pos), Some(b':' | b'='));
    if separated {
        pos += 1;
    } else if require_separator {
        return None;
    }
    let digits = |from: usize, len: usize| {
        bytes
            .get(from..from + len)
            .filter(|run| run.iter().all(u8::is_ascii_digit))
            .map(|_| &rule[from..from + len])
    };
    let date = digits(pos, 8)?;
    if !matches!(bytes.get(pos + 8), Some(b'T' | b't')) {
        return None;
    }
    let time = digits(pos + 9, 6)?;
    let utc = matches!(bytes.get(pos + 15), Some(b'Z' | b'z'));
    Some(DtStart {
        date,
        time,
        utc,
        separated,
    })
}
