//! Toolkit errors.

use std::path::PathBuf;

use jpl_kernel::KernelError;
use orrery_time::TimeError;
use thiserror::Error;

/// Errors from kernel loading, time conversion and position lookups.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ToolkitError {
    #[error("cannot read kernel {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load kernel {}", path.display())]
    KernelLoad {
        path: PathBuf,
        #[source]
        source: KernelError,
    },
    #[error("failed to parse text kernel {}", path.display())]
    TextKernel {
        path: PathBuf,
        #[source]
        source: TimeError,
    },
    #[error("meta-kernel {}: {reason}", path.display())]
    MetaKernel { path: PathBuf, reason: String },
    #[error("unsupported kernel {}: {reason}", path.display())]
    UnsupportedKernel { path: PathBuf, reason: String },
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error("no leapseconds kernel loaded")]
    NoLeapSeconds,
    #[error("unknown body {0:?}")]
    UnknownBody(String),
    #[error("unknown frame {0:?}")]
    UnknownFrame(String),
    #[error("unknown aberration correction {0:?}")]
    UnknownAberration(String),
    #[error("segment for body {target} is in unsupported frame {frame}")]
    UnsupportedSegmentFrame { target: i32, frame: i32 },
    #[error("target and observer are the same body ({0})")]
    IdenticalBodies(i32),
    #[error("epoch {0} is not finite")]
    InvalidEpoch(f64),
    #[error("no loaded ephemeris data for body {body} at epoch {epoch_tdb_s} s past J2000")]
    NoCoverage { body: i32, epoch_tdb_s: f64 },
    #[error("segment chain for body {0} does not reach the solar system barycenter")]
    BrokenChain(i32),
    #[error(transparent)]
    Kernel(#[from] KernelError),
}
