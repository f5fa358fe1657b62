//! Test helpers for the orrery workspace.
//!
//! Writes small synthetic SPK, LSK and meta-kernel files so tests exercise
//! the full loading path without the multi-megabyte JPL kernels, and provides
//! an analytic [`fake::FakeToolkit`] for sampler and plotter tests.

pub mod fake;
pub mod spk;
pub mod text;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub use spk::{ChebyshevSegment, linear_segment, write_spk};

/// Path of a real kernel under the workspace's `kernels/data` directory.
pub fn kernel_data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../kernels/data")
        .join(name)
}

/// Initial position (km) of each body in the synthetic kernel set.
pub const SYNTHETIC_EMB_KM: [f64; 3] = [1.0e8, -1.0e8, 0.0];
pub const SYNTHETIC_EARTH_FROM_EMB_KM: [f64; 3] = [-4_600.0, 0.0, 0.0];
pub const SYNTHETIC_MOON_FROM_EMB_KM: [f64; 3] = [380_000.0, 0.0, 0.0];
pub const SYNTHETIC_SUN_KM: [f64; 3] = [500_000.0, 200_000.0, -10_000.0];
pub const SYNTHETIC_MARS_BARY_KM: [f64; 3] = [-2.0e8, 5.0e7, 1.0e6];

/// Velocity (km/s) of each body in the synthetic kernel set.
pub const SYNTHETIC_EMB_KM_S: [f64; 3] = [20.0, 20.0, 0.1];
pub const SYNTHETIC_EARTH_FROM_EMB_KM_S: [f64; 3] = [0.0, -0.012, 0.0];
pub const SYNTHETIC_MOON_FROM_EMB_KM_S: [f64; 3] = [0.0, 1.0, 0.05];
pub const SYNTHETIC_SUN_KM_S: [f64; 3] = [0.01, 0.0, 0.0];
pub const SYNTHETIC_MARS_BARY_KM_S: [f64; 3] = [-5.0, -20.0, 0.3];

/// A temporary directory holding a complete synthetic kernel set.
pub struct KernelSet {
    pub dir: TempDir,
    pub spk: PathBuf,
    pub lsk: PathBuf,
    pub meta: PathBuf,
}

/// Write a synthetic solar system (SSB, Sun, EMB, Earth, Moon, Mars
/// barycenter; all in linear motion) plus an LSK and a meta-kernel that
/// loads both through a path symbol.
pub fn synthetic_kernel_set() -> KernelSet {
    let dir = tempfile::tempdir().expect("create temp dir");
    let spk = dir.path().join("synthetic.bsp");
    write_spk(
        &spk,
        &[
            linear_segment(10, 0, SYNTHETIC_SUN_KM, SYNTHETIC_SUN_KM_S),
            linear_segment(3, 0, SYNTHETIC_EMB_KM, SYNTHETIC_EMB_KM_S),
            linear_segment(4, 0, SYNTHETIC_MARS_BARY_KM, SYNTHETIC_MARS_BARY_KM_S),
            linear_segment(399, 3, SYNTHETIC_EARTH_FROM_EMB_KM, SYNTHETIC_EARTH_FROM_EMB_KM_S),
            linear_segment(301, 3, SYNTHETIC_MOON_FROM_EMB_KM, SYNTHETIC_MOON_FROM_EMB_KM_S),
        ],
    )
    .expect("write synthetic spk");

    let lsk = dir.path().join("synthetic.tls");
    std::fs::write(&lsk, text::LSK_TEXT).expect("write lsk");

    let meta = dir.path().join("synthetic.tm");
    std::fs::write(
        &meta,
        text::meta_kernel_text(dir.path(), &["$KERNELS/synthetic.tls", "$KERNELS/synthetic.bsp"]),
    )
    .expect("write meta-kernel");

    KernelSet {
        dir,
        spk,
        lsk,
        meta,
    }
}

/// Expected SSB-relative position of a synthetic body at `t` seconds.
pub fn linear_position(p0: [f64; 3], v: [f64; 3], t: f64) -> [f64; 3] {
    [p0[0] + v[0] * t, p0[1] + v[1] * t, p0[2] + v[2] * t]
}
