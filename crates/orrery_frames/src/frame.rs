//! Frame identifiers.

use std::fmt;

use crate::rotation::{ecliptic_to_j2000, j2000_to_ecliptic};

/// Inertial frames supported by position lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Earth mean equator and equinox of J2000 (ICRF to within 0.1″).
    J2000,
    /// Mean ecliptic and equinox of J2000.
    EclipJ2000,
}

impl Frame {
    /// Case-insensitive frame name lookup. `ICRF` is accepted as J2000.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "J2000" | "ICRF" | "EME2000" => Some(Self::J2000),
            "ECLIPJ2000" => Some(Self::EclipJ2000),
            _ => None,
        }
    }

    /// Frame for a NAIF frame code found in SPK segment descriptors.
    pub fn from_naif_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::J2000),
            17 => Some(Self::EclipJ2000),
            _ => None,
        }
    }

    pub fn naif_code(self) -> i32 {
        match self {
            Self::J2000 => 1,
            Self::EclipJ2000 => 17,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::J2000 => "J2000",
            Self::EclipJ2000 => "ECLIPJ2000",
        }
    }

    /// Express a J2000 vector in this frame.
    pub fn rotate_from_j2000(self, v: &[f64; 3]) -> [f64; 3] {
        match self {
            Self::J2000 => *v,
            Self::EclipJ2000 => j2000_to_ecliptic(v),
        }
    }

    /// Express a vector given in this frame in J2000.
    pub fn rotate_to_j2000(self, v: &[f64; 3]) -> [f64; 3] {
        match self {
            Self::J2000 => *v,
            Self::EclipJ2000 => ecliptic_to_j2000(v),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
