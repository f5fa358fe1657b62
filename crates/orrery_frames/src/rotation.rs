//! Rotation between the J2000 equator and the mean ecliptic of J2000.
//!
//! Both are rotations about the shared x axis (the J2000 equinox).

use crate::obliquity::{COS_OBL, SIN_OBL};

/// J2000 (equatorial) → ECLIPJ2000.
pub fn j2000_to_ecliptic(v: &[f64; 3]) -> [f64; 3] {
    [
        v[0],
        COS_OBL * v[1] + SIN_OBL * v[2],
        -SIN_OBL * v[1] + COS_OBL * v[2],
    ]
}

/// ECLIPJ2000 → J2000 (equatorial).
pub fn ecliptic_to_j2000(v: &[f64; 3]) -> [f64; 3] {
    [
        v[0],
        COS_OBL * v[1] - SIN_OBL * v[2],
        SIN_OBL * v[1] + COS_OBL * v[2],
    ]
}
