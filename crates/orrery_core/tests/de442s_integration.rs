//! Lookups against the real DE442s and naif0012 kernels.
//!
//! Each test skips when `kernels/data/de442s.bsp` or `naif0012.tls` is absent.

use std::path::PathBuf;

use orrery_core::{Aberration, EphemerisToolkit, KernelPool, KernelSession};
use test_helpers::kernel_data_path;

const AU_KM: f64 = 149_597_870.7;

fn real_meta_kernel(dir: &tempfile::TempDir) -> Option<PathBuf> {
    let spk = kernel_data_path("de442s.bsp");
    let lsk = kernel_data_path("naif0012.tls");
    if !spk.exists() || !lsk.exists() {
        eprintln!("Skipping: de442s.bsp or naif0012.tls not found under kernels/data");
        return None;
    }
    let meta = dir.path().join("getsta.tm");
    let text = test_helpers::text::meta_kernel_text(
        spk.parent()?,
        &["$KERNELS/naif0012.tls", "$KERNELS/de442s.bsp"],
    );
    std::fs::write(&meta, text).ok()?;
    Some(meta)
}

fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[test]
fn earth_and_moon_in_2021() {
    let dir = tempfile::tempdir().unwrap();
    let Some(meta) = real_meta_kernel(&dir) else {
        return;
    };
    let mut pool = KernelPool::new();
    let session = KernelSession::open(&mut pool, &meta).unwrap();
    let toolkit = session.toolkit();

    let et = toolkit.str_to_et("2021-01-01T00:00:00").unwrap();
    assert!((et - 662_731_269.184).abs() < 0.01);

    let earth = toolkit
        .position("EARTH", et, "ECLIPJ2000", Aberration::None, "SOLAR SYSTEM BARYCENTER")
        .unwrap();
    let r = norm(&earth.position_km) / AU_KM;
    assert!((0.97..1.03).contains(&r), "Earth at {r} AU");
    // Barycentric Earth stays close to the ecliptic plane.
    assert!(earth.position_km[2].abs() < 1.0e5, "z = {}", earth.position_km[2]);

    let moon = toolkit
        .position("MOON", et, "ECLIPJ2000", Aberration::None, "EARTH")
        .unwrap();
    let d = norm(&moon.position_km);
    assert!((356_000.0..407_000.0).contains(&d), "Moon at {d} km");
}

#[test]
fn light_time_to_moon() {
    let dir = tempfile::tempdir().unwrap();
    let Some(meta) = real_meta_kernel(&dir) else {
        return;
    };
    let mut pool = KernelPool::new();
    pool.load(&meta).unwrap();
    let et = pool.str_to_et("2021-06-01").unwrap();
    let pos = pool
        .position("MOON", et, "J2000", Aberration::LightTime, "EARTH")
        .unwrap();
    assert!((1.1..1.4).contains(&pos.light_time_s), "{}", pos.light_time_s);
}

#[test]
fn coverage_spans_2021() {
    let dir = tempfile::tempdir().unwrap();
    let Some(meta) = real_meta_kernel(&dir) else {
        return;
    };
    let mut pool = KernelPool::new();
    pool.load(&meta).unwrap();
    let start = pool.str_to_et("2021-01-01").unwrap();
    let end = pool.str_to_et("2022-01-01").unwrap();
    for target in [3, 301, 399] {
        assert!(
            pool.coverage()
                .iter()
                .any(|c| c.target == target && c.start_et <= start && c.end_et >= end),
            "no 2021 coverage for {target}"
        );
    }
}

#[test]
fn shipped_meta_kernel_lists_demo_kernels() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../getsta.tm");
    let text = std::fs::read_to_string(&path).unwrap();
    let kernel = orrery_time::TextKernel::parse(&text).unwrap();
    assert!(orrery_core::meta_kernel::is_meta_kernel(&kernel));

    let listed = orrery_core::meta_kernel::kernels_to_load(&kernel, &path).unwrap();
    let names: Vec<_> = listed
        .iter()
        .filter_map(|p| p.file_name()?.to_str())
        .collect();
    assert_eq!(names, ["naif0012.tls", "de442s.bsp"]);
    assert!(listed.iter().all(|p| p.parent().is_some_and(|d| d.ends_with("kernels/data"))));
}
