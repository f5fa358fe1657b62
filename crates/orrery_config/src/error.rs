use std::path::PathBuf;

use orrery_time::TimeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(&'static str),
    #[error("invalid config: unrecognized {field} {value:?}")]
    UnknownValue { field: &'static str, value: String },
    #[error("invalid config: bad {field} time")]
    Time {
        field: &'static str,
        #[source]
        source: TimeError,
    },
}
