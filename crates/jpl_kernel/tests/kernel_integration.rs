//! Integration tests for SPK loading and evaluation.
//!
//! Synthetic kernels always run; the de442s.bsp checks skip when the file is
//! not present under `kernels/data`.

use jpl_kernel::{KernelError, SpkKernel};
use test_helpers::spk::{ChebyshevSegment, write_spk};
use test_helpers::{kernel_data_path, linear_segment};

fn load_real_kernel() -> Option<SpkKernel> {
    let path = kernel_data_path("de442s.bsp");
    if !path.exists() {
        eprintln!("Skipping: kernel not found at {}", path.display());
        return None;
    }
    Some(SpkKernel::load(&path).expect("should load de442s.bsp"))
}

#[test]
fn synthetic_segment_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.bsp");
    write_spk(
        &path,
        &[
            linear_segment(3, 0, [1.0e8, 0.0, 0.0], [0.0, 30.0, 0.0]),
            linear_segment(399, 3, [4000.0, 0.0, 0.0], [0.0, 0.01, 0.0]),
        ],
    )
    .unwrap();

    let kernel = SpkKernel::load(&path).unwrap();
    let segments = kernel.segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].target, 3);
    assert_eq!(segments[1].target, 399);
    assert_eq!(segments[1].center, 3);
    assert!(segments.iter().all(|s| s.data_type == 2 && s.frame == 1));
}

#[test]
fn synthetic_linear_motion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linear.bsp");
    write_spk(
        &path,
        &[linear_segment(3, 0, [1.0e8, 2.0e7, -5.0e6], [0.5, 30.0, -0.25])],
    )
    .unwrap();
    let kernel = SpkKernel::load(&path).unwrap();

    for &t in &[-3.0e8, 0.0, 1.0e6, 6.6e8] {
        let eval = kernel.evaluate(3, 0, t).unwrap();
        let expected = [1.0e8 + 0.5 * t, 2.0e7 + 30.0 * t, -5.0e6 - 0.25 * t];
        for axis in 0..3 {
            let err = (eval.position_km[axis] - expected[axis]).abs();
            assert!(err < 1e-3, "t={t} axis {axis}: err {err}");
        }
        assert!((eval.velocity_km_s[1] - 30.0).abs() < 1e-9);
    }
}

#[test]
fn record_selection_across_intervals() {
    // Two records with different constant positions.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.bsp");
    let segment = ChebyshevSegment {
        target: 301,
        center: 3,
        frame: 1,
        init: 0.0,
        interval: 100.0,
        records: vec![
            [vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]],
            [vec![10.0, 0.0], vec![20.0, 0.0], vec![30.0, 0.0]],
        ],
    };
    write_spk(&path, &[segment]).unwrap();
    let kernel = SpkKernel::load(&path).unwrap();

    assert_eq!(kernel.evaluate(301, 3, 50.0).unwrap().position_km, [1.0, 2.0, 3.0]);
    assert_eq!(kernel.evaluate(301, 3, 150.0).unwrap().position_km, [10.0, 20.0, 30.0]);
    // The final boundary belongs to the last record.
    assert_eq!(kernel.evaluate(301, 3, 200.0).unwrap().position_km, [10.0, 20.0, 30.0]);
}

#[test]
fn missing_pair_and_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coverage.bsp");
    let segment = ChebyshevSegment {
        target: 399,
        center: 3,
        frame: 1,
        init: 0.0,
        interval: 100.0,
        records: vec![[vec![1.0], vec![1.0], vec![1.0]]],
    };
    write_spk(&path, &[segment]).unwrap();
    let kernel = SpkKernel::load(&path).unwrap();

    assert!(matches!(
        kernel.evaluate(499, 4, 10.0),
        Err(KernelError::SegmentNotFound { target: 499, center: 4 })
    ));
    assert!(matches!(
        kernel.evaluate(399, 3, 500.0),
        Err(KernelError::EpochOutOfRange { .. })
    ));
    assert!(kernel.state_of(399, 500.0).unwrap().is_none());
    assert_eq!(kernel.state_of(399, 10.0).unwrap().unwrap().center, 3);
}

#[test]
fn later_segment_takes_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("priority.bsp");
    write_spk(
        &path,
        &[
            linear_segment(10, 0, [1.0, 1.0, 1.0], [0.0; 3]),
            linear_segment(10, 0, [2.0, 2.0, 2.0], [0.0; 3]),
        ],
    )
    .unwrap();
    let kernel = SpkKernel::load(&path).unwrap();
    let eval = kernel.evaluate(10, 0, 0.0).unwrap();
    assert!((eval.position_km[0] - 2.0).abs() < 1e-9);
}

#[test]
fn rejects_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not_a_kernel.bsp");
    std::fs::write(&path, "KPL/MK\n".repeat(200)).unwrap();
    assert!(matches!(
        SpkKernel::load(&path),
        Err(KernelError::InvalidFormat(_))
    ));
}

#[test]
fn de442s_has_earth_segment() {
    let kernel = match load_real_kernel() {
        Some(k) => k,
        None => return,
    };
    let earth = kernel
        .segments()
        .iter()
        .find(|s| s.target == 399)
        .expect("should have Earth segment");
    assert_eq!(earth.center, 3);
    assert_eq!(earth.data_type, 2);
    assert_eq!(earth.frame, 1);
}

#[test]
fn de442s_emb_distance_at_j2000() {
    let kernel = match load_real_kernel() {
        Some(k) => k,
        None => return,
    };
    let eval = kernel.evaluate(3, 0, 0.0).expect("EMB relative to SSB");
    let r = eval.position_km.iter().map(|c| c * c).sum::<f64>().sqrt();
    let au_km = 1.496e8;
    assert!(r > 0.95 * au_km && r < 1.05 * au_km, "EMB distance {r:.0} km");
}

/// Overwrite one 1-based word of a little-endian synthetic SPK.
fn patch_word(bytes: &mut [u8], address: usize, value: f64) {
    let at = (address - 1) * 8;
    bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
}

#[test]
fn corrupt_trailer_is_invalid_data() {
    let bytes = test_helpers::spk::spk_bytes(&[linear_segment(
        399,
        3,
        [4000.0, 0.0, 0.0],
        [0.0, 0.01, 0.0],
    )]);
    let end = SpkKernel::from_bytes(bytes.clone()).unwrap().segments()[0].end_address;

    // Trailer is [INIT, INTLEN, RSIZE, N] in the last four words.
    for (address, value) in [
        (end, 1.0e30),
        (end, 1.5),
        (end, f64::NAN),
        (end - 1, 1.0e30),
        (end - 1, f64::MAX),
        (end - 1, 8.5),
        (end - 2, f64::INFINITY),
    ] {
        let mut patched = bytes.clone();
        patch_word(&mut patched, address, value);
        assert!(
            matches!(
                SpkKernel::from_bytes(patched),
                Err(KernelError::InvalidData(_))
            ),
            "word {address} = {value}"
        );
    }
}
