//! Scoped kernel loading.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ToolkitError;
use crate::toolkit::EphemerisToolkit;

/// Keeps a kernel loaded for the lifetime of the guard.
///
/// Opening first unloads any copy of the kernel left over from earlier use,
/// then loads it. Dropping the guard unloads it again, on every exit path.
pub struct KernelSession<'a, T: EphemerisToolkit + ?Sized> {
    toolkit: &'a mut T,
    path: PathBuf,
}

impl<'a, T: EphemerisToolkit + ?Sized> KernelSession<'a, T> {
    pub fn open(toolkit: &'a mut T, path: impl AsRef<Path>) -> Result<Self, ToolkitError> {
        let path = path.as_ref().to_path_buf();
        if toolkit.unload(&path) {
            debug!(path = %path.display(), "unloaded stale kernel before session");
        }
        toolkit.load(&path)?;
        debug!(path = %path.display(), "kernel session opened");
        Ok(Self { toolkit, path })
    }

    pub fn toolkit(&self) -> &T {
        &*self.toolkit
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: EphemerisToolkit + ?Sized> Drop for KernelSession<'_, T> {
    fn drop(&mut self) {
        self.toolkit.unload(&self.path);
        debug!(path = %self.path.display(), "kernel session closed");
    }
}
