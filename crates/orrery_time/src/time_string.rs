//! Calendar time strings.
//!
//! Accepted forms (case-insensitive):
//!
//! - `2021-01-01`, `2021-01-01T04:00`, `2021-01-01T04:00:00.5Z`
//! - `2021-01-01 04:00:00`
//! - `2021 JAN 01 04:00`, `2021-JAN-01 04:00:00`
//!
//! followed by an optional scale token `UTC` (the default), `TDB`, `TT`
//! or `TDT`.

use std::fmt;

use crate::error::TimeError;
use crate::julian::{
    calendar_to_j2000_seconds, days_in_month, jd_to_calendar, month_from_abbrev, J2000_JD,
};
use crate::lsk::LskData;
use crate::scales;

/// Time scale a calendar reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeScale {
    Utc,
    Tdb,
    Tt,
}

impl TimeScale {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "UTC" => Some(Self::Utc),
            "TDB" => Some(Self::Tdb),
            "TT" | "TDT" => Some(Self::Tt),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Utc => "UTC",
            Self::Tdb => "TDB",
            Self::Tt => "TT",
        }
    }
}

/// Proleptic Gregorian calendar date and clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl CalendarTime {
    /// Seconds past J2000 on the reading's own clock.
    pub fn to_j2000_seconds(&self) -> f64 {
        calendar_to_j2000_seconds(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }

    /// Calendar reading of `seconds` past J2000, rounded to the millisecond.
    pub fn from_j2000_seconds(seconds: f64) -> Self {
        const MS_PER_DAY: i64 = 86_400_000;
        // Milliseconds since 2000-01-01T00:00:00.
        let ms = (seconds * 1000.0).round() as i64 + MS_PER_DAY / 2;
        let days = ms.div_euclid(MS_PER_DAY);
        let rem = ms.rem_euclid(MS_PER_DAY);

        let (year, month, day) = jd_to_calendar(J2000_JD - 0.5 + days as f64);
        Self {
            year,
            month,
            day: day.round() as u32,
            hour: (rem / 3_600_000) as u32,
            minute: ((rem / 60_000) % 60) as u32,
            second: (rem % 60_000) as f64 / 1000.0,
        }
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:06.3}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// A parsed time string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedTime {
    pub calendar: CalendarTime,
    pub scale: TimeScale,
}

impl ParsedTime {
    /// Convert to TDB seconds past J2000. UTC and TT readings need leapseconds
    /// data; TDB readings do not.
    pub fn to_tdb_seconds(&self, lsk: Option<&LskData>) -> Result<f64, TimeError> {
        let clock = self.calendar.to_j2000_seconds();
        match (self.scale, lsk) {
            (TimeScale::Tdb, _) => Ok(clock),
            (TimeScale::Utc, Some(lsk)) => Ok(scales::utc_to_tdb(clock, lsk)),
            (TimeScale::Tt, Some(lsk)) => Ok(scales::tt_to_tdb(clock, lsk)),
            (scale, None) => Err(TimeError::LeapSecondsRequired(scale.name())),
        }
    }
}

/// Parse a calendar time string.
pub fn parse_time_string(input: &str) -> Result<ParsedTime, TimeError> {
    let fail = |reason: &str| TimeError::InvalidTimeString {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let upper = input.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(fail("empty string"));
    }

    let (body, scale) = match upper.rsplit_once(char::is_whitespace) {
        Some((rest, token)) => match TimeScale::from_token(token) {
            Some(scale) => (rest.trim_end(), scale),
            None => (upper.as_str(), TimeScale::Utc),
        },
        None => (upper.as_str(), TimeScale::Utc),
    };

    let body = match body.strip_suffix('Z') {
        Some(stripped) if scale == TimeScale::Utc => stripped,
        Some(_) => return Err(fail("'Z' suffix conflicts with a non-UTC scale")),
        None => body,
    };

    let (date, clock) = split_date_clock(body);
    let (year, month, day) = parse_date(date).ok_or_else(|| fail("unrecognized date"))?;
    let (hour, minute, second) = match clock {
        Some(c) => parse_clock(c).ok_or_else(|| fail("unrecognized clock time"))?,
        None => (0, 0, 0.0),
    };

    if !(1..=12).contains(&month) {
        return Err(fail("month out of range"));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(fail("day out of range"));
    }
    if hour > 23 || minute > 59 || !(0.0..61.0).contains(&second) {
        return Err(fail("clock time out of range"));
    }

    Ok(ParsedTime {
        calendar: CalendarTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        },
        scale,
    })
}

/// Split at a `T` between digits, or before a trailing `hh:mm[:ss]` token.
fn split_date_clock(body: &str) -> (&str, Option<&str>) {
    let bytes = body.as_bytes();
    for i in 1..bytes.len().saturating_sub(1) {
        if bytes[i] == b'T' && bytes[i - 1].is_ascii_digit() && bytes[i + 1].is_ascii_digit() {
            return (&body[..i], Some(&body[i + 1..]));
        }
    }
    match body.rsplit_once(char::is_whitespace) {
        Some((date, clock)) if clock.contains(':') => (date.trim_end(), Some(clock)),
        _ => (body, None),
    }
}

fn parse_date(date: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = date
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };
    let year = year.parse().ok()?;
    let month = if month.chars().all(|c| c.is_ascii_digit()) {
        month.parse().ok()?
    } else {
        month_from_abbrev(month)?
    };
    Some((year, month, day.parse().ok()?))
}

fn parse_clock(clock: &str) -> Option<(u32, u32, f64)> {
    let mut fields = clock.split(':');
    let hour = fields.next()?.parse().ok()?;
    let minute = fields.next()?.parse().ok()?;
    let second = match fields.next() {
        Some(s) => s.parse().ok()?,
        None => 0.0,
    };
    if fields.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}
