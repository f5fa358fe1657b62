//! Error types for time-scale conversions and text kernels.

use thiserror::Error;

/// Errors from text kernel parsing, LSK loading or time string conversion.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Text kernel syntax error.
    #[error("text kernel error: {0}")]
    TextKernel(String),
    /// LSK content is structurally valid but missing or bad DELTET data.
    #[error("LSK parse error: {0}")]
    LskParse(String),
    /// Time string could not be parsed.
    #[error("invalid time string {input:?}: {reason}")]
    InvalidTimeString { input: String, reason: String },
    /// UTC or TT conversion needs a leapseconds kernel and none is loaded.
    #[error("a leapseconds kernel is required to convert {0} times")]
    LeapSecondsRequired(&'static str),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TimeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
