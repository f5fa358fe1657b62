//! Meta-kernels: text kernels listing other kernels to load.
//!
//! Entries in `KERNELS_TO_LOAD` may reference `$SYMBOL`s defined by the
//! parallel `PATH_SYMBOLS` / `PATH_VALUES` arrays.

use std::path::{Path, PathBuf};

use orrery_time::TextKernel;

use crate::error::ToolkitError;

/// Whether a parsed text kernel is a meta-kernel.
pub fn is_meta_kernel(kernel: &TextKernel) -> bool {
    kernel.contains("KERNELS_TO_LOAD")
}

/// Kernel paths listed by a meta-kernel, symbols substituted and relative
/// paths resolved, in listed order.
pub fn kernels_to_load(kernel: &TextKernel, meta_path: &Path) -> Result<Vec<PathBuf>, ToolkitError> {
    let invalid = |reason: String| ToolkitError::MetaKernel {
        path: meta_path.to_path_buf(),
        reason,
    };

    let symbols = path_symbols(kernel).map_err(invalid)?;
    let entries = kernel
        .strings("KERNELS_TO_LOAD")
        .map_err(|e| invalid(e.to_string()))?;
    let base = meta_path.parent().unwrap_or_else(|| Path::new(""));

    entries
        .iter()
        .map(|entry| {
            let expanded = substitute_symbols(entry, &symbols).map_err(invalid)?;
            Ok(resolve_relative(Path::new(&expanded), base))
        })
        .collect()
}

fn path_symbols(kernel: &TextKernel) -> Result<Vec<(String, String)>, String> {
    let names = match kernel.get("PATH_SYMBOLS") {
        Some(_) => kernel.strings("PATH_SYMBOLS").map_err(|e| e.to_string())?,
        None => Vec::new(),
    };
    let values = match kernel.get("PATH_VALUES") {
        Some(_) => kernel.strings("PATH_VALUES").map_err(|e| e.to_string())?,
        None => Vec::new(),
    };
    if names.len() != values.len() {
        return Err(format!(
            "PATH_SYMBOLS has {} entries but PATH_VALUES has {}",
            names.len(),
            values.len()
        ));
    }
    Ok(names.into_iter().zip(values).collect())
}

/// Replace every `$NAME` with its value. Symbol names are case-sensitive.
fn substitute_symbols(entry: &str, symbols: &[(String, String)]) -> Result<String, String> {
    let mut out = String::with_capacity(entry.len());
    let mut rest = entry;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let value = symbols
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| format!("undefined path symbol ${name} in {entry:?}"))?;
        out.push_str(value);
        rest = &after[name_len..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Relative entries resolve against the working directory when the file
/// exists there, otherwise against the meta-kernel's directory.
fn resolve_relative(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
