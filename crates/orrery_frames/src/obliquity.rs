//! Mean obliquity of the ecliptic at J2000.0.

/// Obliquity used by NAIF for the ECLIPJ2000 frame (IAU 1976), arcseconds.
pub const OBLIQUITY_J2000_ARCSEC: f64 = 84_381.448;

pub const OBLIQUITY_J2000_RAD: f64 = OBLIQUITY_J2000_ARCSEC / 3600.0 * std::f64::consts::PI / 180.0;

// Precomputed so the rotation costs no trigonometry per call.
pub const SIN_OBL: f64 = 0.397_777_155_931_913_7;
pub const COS_OBL: f64 = 0.917_482_062_069_181_8;
