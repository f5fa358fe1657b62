//! Error types for DAF/SPK kernel access.

use thiserror::Error;

/// Errors from reading or evaluating a binary kernel.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// I/O error while reading the kernel file.
    #[error("I/O error: {0}")]
    Io(String),
    /// The file is not a well-formed DAF container.
    #[error("invalid DAF format: {0}")]
    InvalidFormat(String),
    /// A record or array points outside the file, or a descriptor is malformed.
    #[error("invalid kernel data: {0}")]
    InvalidData(String),
    /// SPK data type this reader cannot evaluate.
    #[error("unsupported SPK data type {0}")]
    UnsupportedType(i32),
    /// No segment exists for the (target, center) pair.
    #[error("no segment for target {target} relative to center {center}")]
    SegmentNotFound { target: i32, center: i32 },
    /// Segments exist but none covers the requested epoch.
    #[error("epoch {epoch_tdb_s} s past J2000 not covered for target {target} relative to {center}")]
    EpochOutOfRange {
        target: i32,
        center: i32,
        epoch_tdb_s: f64,
    },
}

impl From<std::io::Error> for KernelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
