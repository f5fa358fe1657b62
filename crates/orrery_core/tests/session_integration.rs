//! Scoped kernel sessions.

use orrery_core::{Aberration, EphemerisToolkit, KernelPool, KernelSession, ToolkitError};
use test_helpers::fake::FakeToolkit;
use test_helpers::synthetic_kernel_set;

#[test]
fn session_loads_and_unloads_on_drop() {
    let set = synthetic_kernel_set();
    let mut pool = KernelPool::new();
    {
        let session = KernelSession::open(&mut pool, &set.meta).unwrap();
        assert_eq!(session.path(), set.meta.as_path());
        assert_eq!(session.toolkit().loaded_kernels().len(), 3);
        session
            .toolkit()
            .position("MOON", 0.0, "ECLIPJ2000", Aberration::None, "EARTH")
            .unwrap();
    }
    assert!(pool.loaded_kernels().is_empty());
}

#[test]
fn session_replaces_stale_copy() {
    let set = synthetic_kernel_set();
    let mut pool = KernelPool::new();
    pool.load(&set.meta).unwrap();
    {
        let session = KernelSession::open(&mut pool, &set.meta).unwrap();
        // Not loaded twice.
        assert_eq!(session.toolkit().loaded_kernels().len(), 3);
    }
    assert!(pool.loaded_kernels().is_empty());
}

#[test]
fn session_unloads_on_error_path() {
    fn failing_run(toolkit: &mut FakeToolkit) -> Result<(), ToolkitError> {
        let session = KernelSession::open(toolkit, "getsta.tm")?;
        session
            .toolkit()
            .position("VULCAN", 0.0, "J2000", Aberration::None, "SSB")?;
        Ok(())
    }

    let mut fake = FakeToolkit::new();
    assert!(matches!(
        failing_run(&mut fake),
        Err(ToolkitError::UnknownBody(_))
    ));
    assert!(fake.loaded().is_empty());
}

#[test]
fn failed_open_leaves_nothing_loaded() {
    let set = synthetic_kernel_set();
    let mut pool = KernelPool::new();
    let missing = set.dir.path().join("missing.tm");
    assert!(KernelSession::open(&mut pool, &missing).is_err());
    assert!(pool.loaded_kernels().is_empty());
}

#[test]
fn session_over_trait_object() {
    let set = synthetic_kernel_set();
    let mut pool = KernelPool::new();
    let toolkit: &mut dyn EphemerisToolkit = &mut pool;
    let session = KernelSession::open(toolkit, &set.meta).unwrap();
    let et = session.toolkit().str_to_et("2021-01-01T00:00:00").unwrap();
    assert!(et > 6.6e8);
}
