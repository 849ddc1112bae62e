//! Translation of iCal recurrence rules into Todoist phrases.
//!
//! Only the subset RTM exports actually use is understood: `FREQ`,
//! `INTERVAL`, `BYDAY`, `BYMONTHDAY`, `BYMONTH` and `BYSETPOS`. Rules that
//! fall outside it translate to an empty phrase.

use std::collections::HashMap;

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// The parts of a rule the translator reads.
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Raw `FREQ` value (may be unsupported).
    pub freq: String,
    pub interval: String,
    pub by_day: Vec<String>,
    pub by_month_day: Option<String>,
    pub by_month: Option<String>,
    pub by_set_pos: Option<String>,
}

impl RecurrenceRule {
    /// Parse `[RRULE:]FREQ=...;KEY=VALUE;...`.
    ///
    /// Returns `None` unless the trimmed rule (after the optional `RRULE:`
    /// prefix) starts with `FREQ=`. A part without exactly one `=` keeps
    /// its key with an empty value; repeated keys keep the last value.
    pub fn parse(rule: &str) -> Option<Self> {
        let trimmed = rule.trim();
        let body = trimmed.strip_prefix("RRULE:").unwrap_or(trimmed);
        if !body.starts_with("FREQ=") {
            return None;
        }

        let mut parts: HashMap<&str, &str> = HashMap::new();
        for part in body.split(';') {
            let pieces: Vec<&str> = part.split('=').collect();
            let value = if pieces.len() == 2 { pieces[1] } else { "" };
            parts.insert(pieces[0], value);
        }

        let present = |key: &str| {
            parts
                .get(key)
                .filter(|value| !value.is_empty())
                .map(|value| (*value).to_string())
        };

        Some(Self {
            freq: parts.get("FREQ").copied().unwrap_or_default().to_string(),
            interval: present("INTERVAL").unwrap_or_else(|| "1".to_string()),
            by_day: present("BYDAY")
                .map(|days| days.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
            by_month_day: present("BYMONTHDAY"),
            by_month: present("BYMONTH"),
            by_set_pos: present("BYSETPOS"),
        })
    }

    pub fn frequency(&self) -> Option<Frequency> {
        Frequency::parse(&self.freq)
    }

    /// The base phrase, without a time of day. Empty for unknown `FREQ`.
    pub fn phrase(&self) -> String {
        let Some(frequency) = self.frequency() else {
            return String::new();
        };
        let single = self.interval == "1";
        match frequency {
            Frequency::Daily if single => "every day".to_string(),
            Frequency::Daily => format!("every {} days", self.interval),
            Frequency::Weekly if !self.by_day.is_empty() => {
                let days: Vec<&str> = self.by_day.iter().map(|code| day_label(code)).collect();
                format!("every {}", days.join(", "))
            }
            Frequency::Weekly if single => "every week".to_string(),
            Frequency::Weekly => format!("every {} weeks", self.interval),
            Frequency::Monthly => self.monthly_phrase(),
            Frequency::Yearly => match (&self.by_month, &self.by_month_day) {
                (Some(month), Some(day)) => {
                    let month = leading_int(month)
                        .and_then(month_name)
                        .map_or_else(|| month.clone(), str::to_string);
                    format!("every {month} {day}{}", ordinal_suffix(day))
                }
                _ => "every year".to_string(),
            },
        }
    }

    fn monthly_phrase(&self) -> String {
        if let Some(day) = &self.by_month_day {
            if day == "-1" {
                return "every last day of month".to_string();
            }
            return format!("every {day}{}", ordinal_suffix(day));
        }
        if let [code] = self.by_day.as_slice() {
            let position = match &self.by_set_pos {
                Some(pos) => set_position(pos),
                None => "first ",
            };
            return format!("every {position}{} of month", day_label(code));
        }
        "every month".to_string()
    }
}

/// Translate a rule into a phrase, appending ` at {time}` when a time of
/// day is given and the phrase is non-empty.
pub fn translate(rule: &str, time_of_day: Option<&str>) -> String {
    let Some(parsed) = RecurrenceRule::parse(rule) else {
        return String::new();
    };
    let phrase = parsed.phrase();
    match time_of_day.map(str::trim) {
        Some(time) if !time.is_empty() && !phrase.is_empty() => format!("{phrase} at {time}"),
        _ => phrase,
    }
}

/// English ordinal suffix for an integer given as text.
///
/// Unparseable input gets `th`.
pub fn ordinal_suffix(value: &str) -> &'static str {
    let Some(n) = leading_int(value) else {
        return "th";
    };
    match (n % 10, n % 100) {
        (1, rem) if rem != 11 => "st",
        (2, rem) if rem != 12 => "nd",
        (3, rem) if rem != 13 => "rd",
        _ => "th",
    }
}

/// Full English name for a two-letter weekday code.
pub fn day_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "MO" => "Monday",
        "TU" => "Tuesday",
        "WE" => "Wednesday",
        "TH" => "Thursday",
        "FR" => "Friday",
        "SA" => "Saturday",
        "SU" => "Sunday",
        _ => return None,
    })
}

/// Full English name for a 1-based month number.
pub fn month_name(month: i64) -> Option<&'static str> {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

fn day_label(code: &str) -> &str {
    day_name(code).unwrap_or(code)
}

fn set_position(pos: &str) -> &'static str {
    match pos {
        "-1" => "last ",
        "1" => "first ",
        "2" => "second ",
        "3" => "third ",
        "4" => "fourth ",
        _ => "",
    }
}

/// Leading integer of a string (`"10;x"` → 10), ignoring leading spaces.
fn leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first()? {
        b'-' => (-1, &trimmed[1..]),
        b'+' => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
