//! Time for the orrery toolkit.
//!
//! Ephemeris time (ET) is TDB seconds past J2000. UTC strings reach it
//! through TAI and TT using the leap-second table and periodic-term constants
//! of a leapseconds kernel ([`LeapSecondKernel`]). The NAIF text kernel
//! parser here is also what the toolkit reads meta-kernels with.

pub mod error;
pub mod julian;
pub mod lsk;
pub mod scales;
pub mod text_kernel;
pub mod time_string;

use std::path::Path;

pub use error::TimeError;
pub use julian::{J2000_JD, SECONDS_PER_DAY, calendar_to_j2000_seconds, calendar_to_jd, jd_to_calendar};
pub use lsk::LskData;
pub use text_kernel::{PoolValue, TextKernel};
pub use time_string::{CalendarTime, ParsedTime, TimeScale, parse_time_string};

/// Leapseconds kernel plus the conversions it enables.
#[derive(Debug, Clone, PartialEq)]
pub struct LeapSecondKernel {
    data: LskData,
}

impl LeapSecondKernel {
    pub fn load(path: &Path) -> Result<Self, TimeError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Result<Self, TimeError> {
        Ok(Self {
            data: lsk::parse_lsk(content)?,
        })
    }

    /// Build from an already parsed text kernel.
    pub fn from_text_kernel(kernel: &TextKernel) -> Result<Self, TimeError> {
        Ok(Self {
            data: lsk::lsk_from_text_kernel(kernel)?,
        })
    }

    pub fn data(&self) -> &LskData {
        &self.data
    }

    /// UTC seconds past J2000 to ET.
    pub fn utc_to_tdb(&self, utc_s: f64) -> f64 {
        scales::utc_to_tdb(utc_s, &self.data)
    }

    /// ET to UTC seconds past J2000.
    pub fn tdb_to_utc(&self, tdb_s: f64) -> f64 {
        scales::tdb_to_utc(tdb_s, &self.data)
    }

    pub fn tt_to_tdb(&self, tt_s: f64) -> f64 {
        scales::tt_to_tdb(tt_s, &self.data)
    }

    /// UTC calendar reading of a TDB epoch.
    pub fn tdb_to_calendar(&self, tdb_s: f64) -> CalendarTime {
        CalendarTime::from_j2000_seconds(self.tdb_to_utc(tdb_s))
    }
}

/// Convert a time string to TDB seconds past J2000 (ephemeris time).
pub fn str_to_tdb_seconds(
    input: &str,
    lsk: Option<&LeapSecondKernel>,
) -> Result<f64, TimeError> {
    parse_time_string(input)?.to_tdb_seconds(lsk.map(LeapSecondKernel::data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSK: &str = r"
\begindata
DELTET/DELTA_T_A = 32.184
DELTET/K         = 1.657D-3
DELTET/EB        = 1.671D-2
DELTET/M         = ( 6.239996D0 1.99096871D-7 )
DELTET/DELTA_AT  = ( 10, @1972-JAN-1
                     37, @2017-JAN-1 )
\begintext
";

    #[test]
    fn str_to_et_2021() {
        let lsk = LeapSecondKernel::parse(LSK).unwrap();
        let et = str_to_tdb_seconds("2021-01-01T00:00:00", Some(&lsk)).unwrap();
        // 662731200 UTC seconds plus 37 + 32.184 + periodic term.
        assert!((et - 662_731_269.184).abs() < 0.002, "{et}");
    }

    #[test]
    fn step_spacing_is_preserved() {
        let lsk = LeapSecondKernel::parse(LSK).unwrap();
        let a = str_to_tdb_seconds("2021-03-01T00:00:00", Some(&lsk)).unwrap();
        let b = str_to_tdb_seconds("2021-03-01T04:00:00", Some(&lsk)).unwrap();
        assert!((b - a - 14_400.0).abs() < 1e-6);
    }

    #[test]
    fn calendar_display_roundtrip() {
        let lsk = LeapSecondKernel::parse(LSK).unwrap();
        let et = str_to_tdb_seconds("2021-06-15 08:30:00", Some(&lsk)).unwrap();
        assert_eq!(lsk.tdb_to_calendar(et).to_string(), "2021-06-15T08:30:00.000");
    }

    #[test]
    fn tdb_string_without_kernel() {
        assert_eq!(str_to_tdb_seconds("2000-01-01T12:00:00 TDB", None), Ok(0.0));
    }
}
