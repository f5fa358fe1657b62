//! Analytic stand-in for a real kernel pool.

use std::cell::Cell;
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use orrery_core::{Aberration, EphemerisToolkit, Position, SPEED_OF_LIGHT_KM_S, ToolkitError, body_code};
use orrery_frames::Frame;

pub const EARTH_ORBIT_RADIUS_KM: f64 = 1.496e8;
pub const EARTH_PERIOD_S: f64 = 365.25 * 86_400.0;
pub const MOON_ORBIT_RADIUS_KM: f64 = 384_400.0;
pub const MOON_PERIOD_S: f64 = 27.321_661 * 86_400.0;

/// TDB - UTC used by [`FakeToolkit::str_to_et`].
pub const FAKE_TDB_MINUS_UTC_S: f64 = 69.184;

/// Earth on a circular orbit about the barycenter in the ecliptic plane.
pub fn earth_position(et: f64) -> [f64; 3] {
    let angle = TAU * et / EARTH_PERIOD_S;
    [
        EARTH_ORBIT_RADIUS_KM * angle.cos(),
        EARTH_ORBIT_RADIUS_KM * angle.sin(),
        0.0,
    ]
}

/// Moon on a circular orbit about the Earth, slightly inclined.
pub fn moon_position(et: f64) -> [f64; 3] {
    let earth = earth_position(et);
    let angle = TAU * et / MOON_PERIOD_S;
    [
        earth[0] + MOON_ORBIT_RADIUS_KM * angle.cos(),
        earth[1] + MOON_ORBIT_RADIUS_KM * angle.sin() * 0.995,
        earth[2] + MOON_ORBIT_RADIUS_KM * angle.sin() * 0.0895,
    ]
}

/// Toolkit with analytic Earth and Moon orbits (ECLIPJ2000, relative to the
/// barycenter) that counts its position lookups.
#[derive(Debug)]
pub struct FakeToolkit {
    loaded: Vec<PathBuf>,
    coverage: (f64, f64),
    position_calls: Cell<usize>,
}

impl Default for FakeToolkit {
    fn default() -> Self {
        Self {
            loaded: Vec::new(),
            coverage: (f64::NEG_INFINITY, f64::INFINITY),
            position_calls: Cell::new(0),
        }
    }
}

impl FakeToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookups outside `[start, end]` fail with [`ToolkitError::NoCoverage`].
    pub fn with_coverage(start: f64, end: f64) -> Self {
        Self {
            coverage: (start, end),
            ..Self::default()
        }
    }

    pub fn position_calls(&self) -> usize {
        self.position_calls.get()
    }

    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }

    fn body_position(&self, code: i32, et: f64) -> Result<[f64; 3], ToolkitError> {
        if et < self.coverage.0 || et > self.coverage.1 {
            return Err(ToolkitError::NoCoverage {
                body: code,
                epoch_tdb_s: et,
            });
        }
        match code {
            0 | 10 => Ok([0.0; 3]),
            3 | 399 => Ok(earth_position(et)),
            301 => Ok(moon_position(et)),
            other => Err(ToolkitError::NoCoverage {
                body: other,
                epoch_tdb_s: et,
            }),
        }
    }
}

impl EphemerisToolkit for FakeToolkit {
    fn version(&self) -> &str {
        "fake-toolkit"
    }

    fn load(&mut self, path: &Path) -> Result<(), ToolkitError> {
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn unload(&mut self, path: &Path) -> bool {
        let before = self.loaded.len();
        self.loaded.retain(|p| p != path);
        self.loaded.len() != before
    }

    fn str_to_et(&self, text: &str) -> Result<f64, ToolkitError> {
        let parsed = orrery_time::parse_time_string(text)?;
        Ok(parsed.calendar.to_j2000_seconds() + FAKE_TDB_MINUS_UTC_S)
    }

    fn position(
        &self,
        target: &str,
        et: f64,
        frame: &str,
        _correction: Aberration,
        observer: &str,
    ) -> Result<Position, ToolkitError> {
        self.position_calls.set(self.position_calls.get() + 1);
        let target_code =
            body_code(target).ok_or_else(|| ToolkitError::UnknownBody(target.to_string()))?;
        let observer_code =
            body_code(observer).ok_or_else(|| ToolkitError::UnknownBody(observer.to_string()))?;
        let frame =
            Frame::from_name(frame).ok_or_else(|| ToolkitError::UnknownFrame(frame.to_string()))?;

        let t = self.body_position(target_code, et)?;
        let o = self.body_position(observer_code, et)?;
        let ecliptic = [t[0] - o[0], t[1] - o[1], t[2] - o[2]];
        let position_km = frame.rotate_from_j2000(&Frame::EclipJ2000.rotate_to_j2000(&ecliptic));
        let distance = ecliptic.iter().map(|c| c * c).sum::<f64>().sqrt();

        Ok(Position {
            position_km,
            light_time_s: distance / SPEED_OF_LIGHT_KM_S,
        })
    }
}
