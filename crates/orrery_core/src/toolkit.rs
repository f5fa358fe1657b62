//! The toolkit capability interface.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ToolkitError;

/// Speed of light in km/s.
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Aberration correction applied to a position lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aberration {
    /// Geometric position at the requested epoch.
    #[default]
    None,
    /// Position of the target at the time light left it (one-way light time).
    LightTime,
}

impl Aberration {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::LightTime => "LT",
        }
    }
}

impl FromStr for Aberration {
    type Err = ToolkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "LT" => Ok(Self::LightTime),
            _ => Err(ToolkitError::UnknownAberration(s.to_string())),
        }
    }
}

impl fmt::Display for Aberration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a position lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Target relative to observer, km, in the requested frame.
    pub position_km: [f64; 3],
    /// One-way light time between observer and target, seconds.
    pub light_time_s: f64,
}

/// Planetary-data toolkit: kernel management, time conversion and position
/// lookup.
///
/// Epochs are ephemeris time (TDB seconds past J2000). Bodies are names or
/// integer NAIF codes as strings; frames are frame names.
pub trait EphemerisToolkit {
    /// Toolkit identification string.
    fn version(&self) -> &str;

    /// Load a kernel file (SPK, LSK or meta-kernel).
    fn load(&mut self, path: &Path) -> Result<(), ToolkitError>;

    /// Unload a kernel previously loaded under the same name. Unloading a
    /// meta-kernel unloads every kernel it loaded. Returns `false` when
    /// nothing by that name was loaded.
    fn unload(&mut self, path: &Path) -> bool;

    /// Convert a time string to ephemeris time.
    fn str_to_et(&self, text: &str) -> Result<f64, ToolkitError>;

    /// Position of `target` relative to `observer` at `et` in `frame`.
    fn position(
        &self,
        target: &str,
        et: f64,
        frame: &str,
        correction: Aberration,
        observer: &str,
    ) -> Result<Position, ToolkitError>;
}
