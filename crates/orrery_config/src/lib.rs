//! Run configuration.
//!
//! A TOML file describing which meta-kernel to load, which bodies to sample
//! over which range, and where to write the figure. Every field is optional;
//! [`RunConfig::default`] is the 2021 Earth/Moon demo.
//!
//! ```toml
//! meta_kernel = "getsta.tm"
//!
//! [sampling]
//! observer = "SOLAR SYSTEM BARYCENTER"
//! frame = "ECLIPJ2000"
//! start = "2021-01-01T00:00:00"
//! end = "2022-01-01T00:00:00"
//! step_hours = 4.0
//!
//! [[bodies]]
//! id = "EARTH"
//! label = "Earth"
//!
//! [output]
//! html = "orbits.html"
//! ```

mod error;

use std::path::{Path, PathBuf};

use orrery_core::Aberration;
use orrery_frames::Frame;
use orrery_time::parse_time_string;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub meta_kernel: PathBuf,
    pub sampling: SamplingConfig,
    pub bodies: Vec<BodySpec>,
    pub output: OutputConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            meta_kernel: PathBuf::from("getsta.tm"),
            sampling: SamplingConfig::default(),
            bodies: vec![BodySpec::new("EARTH", "Earth"), BodySpec::new("MOON", "Moon")],
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    pub observer: String,
    pub frame: String,
    pub aberration: String,
    /// UTC unless the string carries a scale suffix.
    pub start: String,
    pub end: String,
    pub step_hours: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            observer: "SOLAR SYSTEM BARYCENTER".to_string(),
            frame: "ECLIPJ2000".to_string(),
            aberration: Aberration::None.as_str().to_string(),
            start: "2021-01-01T00:00:00".to_string(),
            end: "2022-01-01T00:00:00".to_string(),
            step_hours: 4.0,
        }
    }
}

impl SamplingConfig {
    pub fn step_seconds(&self) -> f64 {
        self.step_hours * 3600.0
    }

    pub fn aberration(&self) -> Result<Aberration, ConfigError> {
        self.aberration
            .parse()
            .map_err(|_| ConfigError::UnknownValue {
                field: "aberration",
                value: self.aberration.clone(),
            })
    }

    pub fn frame(&self) -> Result<Frame, ConfigError> {
        Frame::from_name(&self.frame).ok_or_else(|| ConfigError::UnknownValue {
            field: "frame",
            value: self.frame.clone(),
        })
    }
}

/// A body to sample: toolkit identifier plus the trace label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodySpec {
    pub id: String,
    pub label: String,
}

impl BodySpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub html: Option<PathBuf>,
    pub svg: Option<PathBuf>,
    pub title: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html: Some(PathBuf::from("orbits.html")),
            svg: None,
            title: None,
        }
    }
}

impl RunConfig {
    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), bodies = config.bodies.len(), "loaded run config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meta_kernel.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("meta_kernel must not be empty"));
        }
        if self.bodies.is_empty() {
            return Err(ConfigError::Invalid("bodies must not be empty"));
        }
        for body in &self.bodies {
            if body.id.trim().is_empty() {
                return Err(ConfigError::Invalid("body id must not be empty"));
            }
            if body.label.trim().is_empty() {
                return Err(ConfigError::Invalid("body label must not be empty"));
            }
        }
        let sampling = &self.sampling;
        if sampling.observer.trim().is_empty() {
            return Err(ConfigError::Invalid("observer must not be empty"));
        }
        if !(sampling.step_hours.is_finite() && sampling.step_hours > 0.0) {
            return Err(ConfigError::Invalid(
                "step_hours must be a positive number",
            ));
        }
        sampling.frame()?;
        sampling.aberration()?;
        parse_time_string(&sampling.start).map_err(|source| ConfigError::Time {
            field: "start",
            source,
        })?;
        parse_time_string(&sampling.end).map_err(|source| ConfigError::Time {
            field: "end",
            source,
        })?;
        if self.output.html.is_none() && self.output.svg.is_none() {
            return Err(ConfigError::Invalid("output needs an html or svg path"));
        }
        Ok(())
    }
}
