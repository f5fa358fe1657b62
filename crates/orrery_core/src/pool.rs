//! In-process kernel pool implementing [`EphemerisToolkit`].
//!
//! Kernels are kept in load order. Lookups search the most recently loaded
//! kernel first, so later kernels override earlier ones, and each body is
//! chained through its segment centers down to the solar system barycenter.

use std::fmt;
use std::path::{Path, PathBuf};

use jpl_kernel::{DafFile, SSB, SegmentState, SpkKernel, planet_body_to_barycenter};
use orrery_frames::Frame;
use orrery_time::{LeapSecondKernel, TextKernel, TimeError, lsk};
use tracing::{debug, warn};

use crate::bodies::body_code;
use crate::error::ToolkitError;
use crate::meta_kernel::{is_meta_kernel, kernels_to_load};
use crate::toolkit::{Aberration, EphemerisToolkit, Position, SPEED_OF_LIGHT_KM_S};

/// Identification string reported by [`KernelPool::version`].
pub const TOOLKIT_VERSION: &str = concat!("orrery-toolkit ", env!("CARGO_PKG_VERSION"));

/// Segment hops allowed when chaining a body to the barycenter.
const MAX_CHAIN_DEPTH: usize = 32;

/// Light-time iterations for [`Aberration::LightTime`].
const LIGHT_TIME_ITERATIONS: usize = 3;

/// What kind of kernel a loaded file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    Spk,
    Lsk,
    Meta,
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Spk => "SPK",
            Self::Lsk => "LSK",
            Self::Meta => "META",
        })
    }
}

/// A loaded kernel as reported by [`KernelPool::loaded_kernels`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedKernel {
    pub path: PathBuf,
    pub kind: KernelKind,
    /// Meta-kernel that loaded this file, if any.
    pub loaded_by: Option<PathBuf>,
}

/// Coverage of one SPK segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentCoverage {
    pub kernel: PathBuf,
    pub target: i32,
    pub center: i32,
    pub frame: i32,
    pub data_type: i32,
    pub start_et: f64,
    pub end_et: f64,
}

enum KernelData {
    Spk(SpkKernel),
    Lsk(LeapSecondKernel),
    Meta,
}

struct Entry {
    path: PathBuf,
    data: KernelData,
    loaded_by: Option<PathBuf>,
}

impl Entry {
    fn kind(&self) -> KernelKind {
        match self.data {
            KernelData::Spk(_) => KernelKind::Spk,
            KernelData::Lsk(_) => KernelKind::Lsk,
            KernelData::Meta => KernelKind::Meta,
        }
    }
}

/// Kernel pool owning every loaded kernel.
///
/// `KernelPool` is [`Send`] + [`Sync`]; lookups take `&self`.
#[derive(Default)]
pub struct KernelPool {
    entries: Vec<Entry>,
}

// SpkKernel's Debug would dump the raw file.
impl fmt::Debug for KernelPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelPool")
            .field("kernels", &self.loaded_kernels())
            .finish()
    }
}

impl KernelPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded kernels in load order (lowest priority first).
    pub fn loaded_kernels(&self) -> Vec<LoadedKernel> {
        self.entries
            .iter()
            .map(|e| LoadedKernel {
                path: e.path.clone(),
                kind: e.kind(),
                loaded_by: e.loaded_by.clone(),
            })
            .collect()
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    /// Coverage of every SPK segment, in load order then file order.
    pub fn coverage(&self) -> Vec<SegmentCoverage> {
        self.entries
            .iter()
            .filter_map(|e| match &e.data {
                KernelData::Spk(spk) => Some((e, spk)),
                _ => None,
            })
            .flat_map(|(e, spk)| {
                spk.segments().iter().map(|seg| SegmentCoverage {
                    kernel: e.path.clone(),
                    target: seg.target,
                    center: seg.center,
                    frame: seg.frame,
                    data_type: seg.data_type,
                    start_et: seg.start_tdb_s,
                    end_et: seg.end_tdb_s,
                })
            })
            .collect()
    }

    /// Most recently loaded leapseconds kernel.
    pub fn leap_seconds(&self) -> Option<&LeapSecondKernel> {
        self.entries.iter().rev().find_map(|e| match &e.data {
            KernelData::Lsk(lsk) => Some(lsk),
            _ => None,
        })
    }

    fn load_entry(&mut self, path: &Path, loaded_by: Option<&Path>) -> Result<(), ToolkitError> {
        if self.is_loaded(path) {
            debug!(path = %path.display(), "reloading kernel at highest priority");
            self.unload(path);
        }

        let bytes = std::fs::read(path).map_err(|source| ToolkitError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.starts_with(b"DAF/") || bytes.starts_with(b"NAIF/DAF") {
            let spk = load_spk(path, bytes)?;
            debug!(
                path = %path.display(),
                segments = spk.segments().len(),
                "loaded SPK"
            );
            self.entries.push(Entry {
                path: path.to_path_buf(),
                data: KernelData::Spk(spk),
                loaded_by: loaded_by.map(Path::to_path_buf),
            });
            return Ok(());
        }

        let text = String::from_utf8(bytes).map_err(|_| ToolkitError::UnsupportedKernel {
            path: path.to_path_buf(),
            reason: "neither a DAF file nor a text kernel".into(),
        })?;
        let kernel = TextKernel::parse(&text).map_err(|source| ToolkitError::TextKernel {
            path: path.to_path_buf(),
            source,
        })?;

        if is_meta_kernel(&kernel) {
            if let Some(parent) = loaded_by {
                return Err(ToolkitError::MetaKernel {
                    path: parent.to_path_buf(),
                    reason: format!("nested meta-kernel {}", path.display()),
                });
            }
            self.load_meta(path, &kernel)
        } else if lsk::is_lsk(&kernel) {
            let lsk = LeapSecondKernel::from_text_kernel(&kernel).map_err(|source| {
                ToolkitError::TextKernel {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            debug!(
                path = %path.display(),
                leap_seconds = lsk.data().leap_seconds.len(),
                "loaded LSK"
            );
            self.entries.push(Entry {
                path: path.to_path_buf(),
                data: KernelData::Lsk(lsk),
                loaded_by: loaded_by.map(Path::to_path_buf),
            });
            Ok(())
        } else {
            Err(ToolkitError::UnsupportedKernel {
                path: path.to_path_buf(),
                reason: "text kernel is neither a meta-kernel nor a leapseconds kernel".into(),
            })
        }
    }

    /// Load every kernel a meta-kernel lists. On failure the meta-kernel and
    /// whatever it had loaded so far are unloaded again.
    fn load_meta(&mut self, path: &Path, kernel: &TextKernel) -> Result<(), ToolkitError> {
        let children = kernels_to_load(kernel, path)?;
        self.entries.push(Entry {
            path: path.to_path_buf(),
            data: KernelData::Meta,
            loaded_by: None,
        });
        for child in &children {
            if let Err(e) = self.load_entry(child, Some(path)) {
                self.unload(path);
                return Err(e);
            }
        }
        debug!(path = %path.display(), kernels = children.len(), "loaded meta-kernel");
        Ok(())
    }

    /// Highest-priority segment state for `body` covering `et`.
    fn segment_state(&self, body: i32, et: f64) -> Result<Option<SegmentState>, ToolkitError> {
        let spks = self.entries.iter().rev().filter_map(|e| match &e.data {
            KernelData::Spk(spk) => Some(spk),
            _ => None,
        });
        for spk in spks {
            if let Some(state) = spk.state_of(body, et)? {
                return Ok(Some(state));
            }
        }
        Ok(None)
    }

    fn has_target(&self, body: i32) -> bool {
        self.entries.iter().any(|e| match &e.data {
            KernelData::Spk(spk) => spk.has_target(body),
            _ => false,
        })
    }

    /// Position of `body` relative to the barycenter, J2000, km.
    fn position_from_ssb(&self, body: i32, et: f64) -> Result<[f64; 3], ToolkitError> {
        let mut code = body;
        let mut sum = [0.0f64; 3];
        let mut hops = 0;

        while code != SSB {
            hops += 1;
            if hops > MAX_CHAIN_DEPTH {
                return Err(ToolkitError::BrokenChain(body));
            }
            let Some(state) = self.segment_state(code, et)? else {
                let bary = planet_body_to_barycenter(code);
                if bary != code && !self.has_target(code) {
                    code = bary;
                    continue;
                }
                return Err(ToolkitError::NoCoverage {
                    body: code,
                    epoch_tdb_s: et,
                });
            };
            let frame =
                Frame::from_naif_code(state.frame).ok_or(ToolkitError::UnsupportedSegmentFrame {
                    target: code,
                    frame: state.frame,
                })?;
            let p = frame.rotate_to_j2000(&state.evaluation.position_km);
            for (acc, v) in sum.iter_mut().zip(p) {
                *acc += v;
            }
            code = state.center;
        }

        Ok(sum)
    }
}

fn load_spk(path: &Path, bytes: Vec<u8>) -> Result<SpkKernel, ToolkitError> {
    let load_err = |source| ToolkitError::KernelLoad {
        path: path.to_path_buf(),
        source,
    };
    let daf = DafFile::from_bytes(bytes).map_err(load_err)?;
    if daf.id_word() != "DAF/SPK" {
        return Err(ToolkitError::UnsupportedKernel {
            path: path.to_path_buf(),
            reason: format!("{} files are not supported", daf.id_word()),
        });
    }
    let spk = SpkKernel::from_daf(daf).map_err(load_err)?;
    if spk.segments().is_empty() {
        warn!(path = %path.display(), "SPK file has no segments");
    }
    Ok(spk)
}

fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

impl EphemerisToolkit for KernelPool {
    fn version(&self) -> &str {
        TOOLKIT_VERSION
    }

    fn load(&mut self, path: &Path) -> Result<(), ToolkitError> {
        self.load_entry(path, None)
    }

    fn unload(&mut self, path: &Path) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.path != path && e.loaded_by.as_deref() != Some(path));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(path = %path.display(), removed, "unloaded kernel");
        }
        removed > 0
    }

    fn str_to_et(&self, text: &str) -> Result<f64, ToolkitError> {
        orrery_time::str_to_tdb_seconds(text, self.leap_seconds()).map_err(|e| match e {
            TimeError::LeapSecondsRequired(_) => ToolkitError::NoLeapSeconds,
            other => ToolkitError::Time(other),
        })
    }

    fn position(
        &self,
        target: &str,
        et: f64,
        frame: &str,
        correction: Aberration,
        observer: &str,
    ) -> Result<Position, ToolkitError> {
        let target_code =
            body_code(target).ok_or_else(|| ToolkitError::UnknownBody(target.to_string()))?;
        let observer_code =
            body_code(observer).ok_or_else(|| ToolkitError::UnknownBody(observer.to_string()))?;
        let frame = Frame::from_name(frame).ok_or_else(|| ToolkitError::UnknownFrame(frame.to_string()))?;
        if target_code == observer_code {
            return Err(ToolkitError::IdenticalBodies(target_code));
        }
        if !et.is_finite() {
            return Err(ToolkitError::InvalidEpoch(et));
        }

        let observer_ssb = self.position_from_ssb(observer_code, et)?;
        let mut relative = sub(&self.position_from_ssb(target_code, et)?, &observer_ssb);
        let mut light_time_s = norm(&relative) / SPEED_OF_LIGHT_KM_S;

        if correction == Aberration::LightTime {
            for _ in 0..LIGHT_TIME_ITERATIONS {
                let emitted = self.position_from_ssb(target_code, et - light_time_s)?;
                light_time_s = norm(&sub(&emitted, &observer_ssb)) / SPEED_OF_LIGHT_KM_S;
            }
            // The returned light time is the one the position was evaluated at.
            let emitted = self.position_from_ssb(target_code, et - light_time_s)?;
            relative = sub(&emitted, &observer_ssb);
        }

        Ok(Position {
            position_km: frame.rotate_from_j2000(&relative),
            light_time_s,
        })
    }
}
