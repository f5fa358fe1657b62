//! Julian Date and calendar helpers.
//!
//! Calendar dates are proleptic Gregorian. Conversions that matter for
//! sampling go through whole-day Julian Dates so that clock times map to
//! seconds past J2000 without rounding.

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00).
pub const J2000_JD: f64 = 2_451_545.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date of a calendar date; `day` may carry a fraction.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let y = y as f64;
    let century = (y / 100.0).floor();
    let gregorian = 2.0 - century + (century / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day + gregorian
        - 1524.5
}

/// Calendar date `(year, month, fractional day)` of a Julian Date.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let shifted = jd + 0.5;
    let z = shifted.floor();
    let f = shifted - z;
    let a = if z < 2_299_161.0 {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = (if e < 14.0 { e - 1.0 } else { e - 13.0 }) as u32;
    let year = (if month > 2 { c - 4716.0 } else { c - 4715.0 }) as i32;
    (year, month, day)
}

/// Seconds past J2000 of a calendar date and clock time, in whatever time
/// scale the clock reading belongs to.
pub fn calendar_to_j2000_seconds(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
) -> f64 {
    // Midnight JDs end in .5, so the day offset is an exact multiple of 86400.
    let midnight = calendar_to_jd(year, month, day as f64);
    (midnight - J2000_JD) * SECONDS_PER_DAY
        + hour as f64 * 3600.0
        + minute as f64 * 60.0
        + second
}

/// Month number (1-12) from a three-letter English abbreviation or longer
/// month name, case-insensitive.
pub fn month_from_abbrev(s: &str) -> Option<u32> {
    let prefix = s.get(..3)?.to_ascii_uppercase();
    let month = match prefix.as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_noon() {
        assert_eq!(calendar_to_jd(2000, 1, 1.5), J2000_JD);
    }

    #[test]
    fn known_midnights() {
        assert_eq!(calendar_to_jd(1972, 1, 1.0), 2_441_317.5);
        assert_eq!(calendar_to_jd(2017, 1, 1.0), 2_457_754.5);
        assert_eq!(calendar_to_jd(2021, 1, 1.0), 2_459_215.5);
    }

    #[test]
    fn calendar_roundtrip() {
        for &(y, m, d) in &[(2021, 1, 1.0), (1999, 12, 31.25), (2024, 2, 29.75), (1972, 7, 1.0)] {
            let (y2, m2, d2) = jd_to_calendar(calendar_to_jd(y, m, d));
            assert_eq!((y2, m2), (y, m));
            assert!((d2 - d).abs() < 1e-8, "{y}-{m}-{d}: got day {d2}");
        }
    }

    #[test]
    fn clock_seconds_are_exact() {
        let t0 = calendar_to_j2000_seconds(2021, 1, 1, 0, 0, 0.0);
        let t1 = calendar_to_j2000_seconds(2021, 1, 1, 4, 0, 0.0);
        assert_eq!(t1 - t0, 14_400.0);
        assert_eq!(calendar_to_j2000_seconds(2000, 1, 1, 12, 0, 0.0), 0.0);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_from_abbrev("JAN"), Some(1));
        assert_eq!(month_from_abbrev("oct"), Some(10));
        assert_eq!(month_from_abbrev("December"), Some(12));
        assert_eq!(month_from_abbrev("XYZ"), None);
        assert_eq!(month_from_abbrev("JA"), None);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2021, 4), 30);
        assert_eq!(days_in_month(2021, 13), 0);
    }
}
