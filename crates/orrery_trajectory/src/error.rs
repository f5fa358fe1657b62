//! Sampling and rendering errors.

use std::path::PathBuf;

use orrery_core::ToolkitError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SampleError {
    /// Step not a positive finite number, or a non-finite bound.
    #[error("invalid time range: start={start}, end={end}, step={step}")]
    InvalidRange { start: f64, end: f64, step: f64 },
    #[error("time range would produce {requested} samples, more than {limit}")]
    TooManySamples { requested: f64, limit: usize },
    /// The toolkit failed to produce a position; sampling stops at the first failure.
    #[error("position lookup for {body} at ET {epoch} failed")]
    Lookup {
        body: String,
        epoch: f64,
        #[source]
        source: ToolkitError,
    },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("cannot write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize figure")]
    Json(#[from] serde_json::Error),
    #[error("drawing failed: {0}")]
    Drawing(String),
}
