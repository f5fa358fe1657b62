//! Inertial reference frames for ephemeris lookups.
//!
//! Provides the two frames the kernels and plots use (J2000 equator and
//! mean ecliptic of J2000) and the constant rotation between them.

pub mod frame;
pub mod obliquity;
pub mod rotation;

pub use frame::Frame;
pub use obliquity::{COS_OBL, OBLIQUITY_J2000_ARCSEC, OBLIQUITY_J2000_RAD, SIN_OBL};
pub use rotation::{ecliptic_to_j2000, j2000_to_ecliptic};
