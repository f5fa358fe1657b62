//! Leapseconds kernel variables.
//!
//! The `DELTET/*` assignments of an LSK drive the UTC/TDB conversions in
//! [`crate::scales`].

use crate::error::TimeError;
use crate::text_kernel::TextKernel;

/// `DELTET/*` values of a leapseconds kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct LskData {
    /// `DELTET/DELTA_T_A`: TT - TAI, seconds.
    pub delta_t_a: f64,
    /// `DELTET/K`: amplitude of the periodic TDB - TT term, seconds.
    pub k: f64,
    /// `DELTET/EB`: eccentricity used in the periodic term.
    pub eb: f64,
    /// `DELTET/M` first element: mean anomaly at J2000, radians.
    pub m0: f64,
    /// `DELTET/M` second element: mean anomaly rate, radians per second.
    pub m1: f64,
    /// `(TAI - UTC, UTC epoch)` pairs in epoch order. Epochs are UTC
    /// seconds past J2000.
    pub leap_seconds: Vec<(f64, f64)>,
}

impl LskData {
    /// TAI - UTC in effect at `utc_s` (UTC seconds past J2000).
    ///
    /// Epochs before the first table entry use the first entry's value.
    pub fn delta_at(&self, utc_s: f64) -> f64 {
        let idx = self.leap_seconds.partition_point(|&(_, epoch)| epoch <= utc_s);
        match idx {
            0 => self.leap_seconds.first().map_or(0.0, |&(d, _)| d),
            i => self.leap_seconds[i - 1].0,
        }
    }
}

/// Whether a text kernel carries leapseconds data.
pub fn is_lsk(kernel: &TextKernel) -> bool {
    kernel.contains("DELTET/DELTA_AT")
}

/// Extract LSK data from a parsed text kernel.
pub fn lsk_from_text_kernel(kernel: &TextKernel) -> Result<LskData, TimeError> {
    let scalar = |name: &str| {
        kernel
            .scalar(name)
            .map_err(|e| TimeError::LskParse(e.to_string()))
    };
    let delta_t_a = scalar("DELTET/DELTA_T_A")?;
    let k = scalar("DELTET/K")?;
    let eb = scalar("DELTET/EB")?;

    let m = kernel
        .numbers("DELTET/M")
        .map_err(|e| TimeError::LskParse(e.to_string()))?;
    if m.len() < 2 {
        return Err(TimeError::LskParse("DELTET/M needs 2 values".into()));
    }

    let flat = kernel
        .numbers("DELTET/DELTA_AT")
        .map_err(|e| TimeError::LskParse(e.to_string()))?;
    let leap_seconds = build_leap_table(&flat)?;

    Ok(LskData {
        delta_t_a,
        k,
        eb,
        m0: m[0],
        m1: m[1],
        leap_seconds,
    })
}

/// [`lsk_from_text_kernel`] on raw kernel text.
pub fn parse_lsk(content: &str) -> Result<LskData, TimeError> {
    lsk_from_text_kernel(&TextKernel::parse(content)?)
}

/// `DELTET/DELTA_AT` alternates offsets and `@date` epochs.
fn build_leap_table(values: &[f64]) -> Result<Vec<(f64, f64)>, TimeError> {
    if values.is_empty() || values.len() % 2 != 0 {
        return Err(TimeError::LskParse(format!(
            "DELTET/DELTA_AT holds {} values, expected offset/epoch pairs",
            values.len()
        )));
    }
    let mut table: Vec<(f64, f64)> = Vec::with_capacity(values.len() / 2);
    for pair in values.chunks_exact(2) {
        let (offset, epoch) = (pair[0], pair[1]);
        if table.last().is_some_and(|&(_, prev)| epoch < prev) {
            return Err(TimeError::LskParse(
                "DELTET/DELTA_AT epochs out of order".into(),
            ));
        }
        table.push((offset, epoch));
    }
    Ok(table)
}
