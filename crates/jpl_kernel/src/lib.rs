//! Pure-Rust reader for NAIF binary ephemeris kernels.
//!
//! Covers the DAF container and the Chebyshev SPK segment types (2 and 3)
//! used by the JPL planetary ephemerides. The whole file is read into memory;
//! segment lookups never touch the filesystem again.

pub mod chebyshev;
pub mod daf;
pub mod error;
pub mod spk;

pub use daf::{DafFile, DafSummary, Endian};
pub use error::KernelError;
pub use spk::{SegmentState, SpkEvaluation, SpkKernel, SpkSegment};

/// NAIF code of the solar system barycenter.
pub const SSB: i32 = 0;

/// Map a planet body code (`x99`) to its system barycenter (`x`).
///
/// Codes that are not planet bodies are returned unchanged.
pub const fn planet_body_to_barycenter(code: i32) -> i32 {
    if code >= 199 && code <= 999 && code % 100 == 99 {
        code / 100
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_codes_map_to_barycenters() {
        assert_eq!(planet_body_to_barycenter(499), 4);
        assert_eq!(planet_body_to_barycenter(599), 5);
        assert_eq!(planet_body_to_barycenter(999), 9);
    }

    #[test]
    fn other_codes_unchanged() {
        assert_eq!(planet_body_to_barycenter(301), 301);
        assert_eq!(planet_body_to_barycenter(10), 10);
        assert_eq!(planet_body_to_barycenter(3), 3);
        assert_eq!(planet_body_to_barycenter(-82), -82);
    }
}
