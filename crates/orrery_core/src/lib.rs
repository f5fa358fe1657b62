//! Planetary-data toolkit.
//!
//! [`EphemerisToolkit`] is the five-operation interface the sampler and the
//! CLI are written against. [`KernelPool`] implements it on top of the
//! `jpl_kernel` SPK reader and the `orrery_time` leapseconds support, and
//! [`KernelSession`] scopes a loaded meta-kernel to a block.

pub mod bodies;
pub mod error;
pub mod meta_kernel;
pub mod pool;
pub mod session;
pub mod toolkit;

pub use bodies::{body_code, body_name};
pub use error::ToolkitError;
pub use pool::{KernelKind, KernelPool, LoadedKernel, SegmentCoverage, TOOLKIT_VERSION};
pub use session::KernelSession;
pub use toolkit::{Aberration, EphemerisToolkit, Position, SPEED_OF_LIGHT_KM_S};
