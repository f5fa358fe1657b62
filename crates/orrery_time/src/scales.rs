//! Time-scale conversions: UTC ↔ TAI ↔ TT ↔ TDB.
//!
//! All values are seconds past J2000.0 on the respective scale's clock.

use crate::lsk::LskData;

/// TDB - TT in seconds at a TT epoch (one-term periodic model).
pub fn tdb_minus_tt(tt_s: f64, lsk: &LskData) -> f64 {
    let m = lsk.m0 + lsk.m1 * tt_s;
    let e = m + lsk.eb * m.sin();
    lsk.k * e.sin()
}

pub fn tt_to_tdb(tt_s: f64, lsk: &LskData) -> f64 {
    tt_s + tdb_minus_tt(tt_s, lsk)
}

/// Inverse of [`tt_to_tdb`] by fixed-point iteration.
pub fn tdb_to_tt(tdb_s: f64, lsk: &LskData) -> f64 {
    let mut tt = tdb_s;
    for _ in 0..3 {
        tt = tdb_s - tdb_minus_tt(tt, lsk);
    }
    tt
}

pub fn utc_to_tdb(utc_s: f64, lsk: &LskData) -> f64 {
    let tai = utc_s + lsk.delta_at(utc_s);
    tt_to_tdb(tai + lsk.delta_t_a, lsk)
}

/// Inverse of [`utc_to_tdb`].
///
/// ΔAT is looked up on the UTC estimate, so the first pass may land on the
/// wrong side of a leap second; the second pass corrects it.
pub fn tdb_to_utc(tdb_s: f64, lsk: &LskData) -> f64 {
    let tai = tdb_to_tt(tdb_s, lsk) - lsk.delta_t_a;
    let mut utc = tai - lsk.delta_at(tai);
    for _ in 0..2 {
        utc = tai - lsk.delta_at(utc);
    }
    utc
}
