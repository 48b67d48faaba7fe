//! Shared utilities for sensehat-bridge

use crate::error::HatError;
use rmcp::ErrorData as McpError;
use std::fs;
use std::path::Path;

/// Read a sysfs-style file holding a single number
pub fn read_number(path: &Path) -> Result<f64, HatError> {
    let contents = fs::read_to_string(path).map_err(|e| HatError::io(path, e))?;
    let value = contents.trim();
    value.parse::<f64>().map_err(|_| HatError::InvalidReading {
        path: path.to_path_buf(),
        value: value.to_string(),
    })
}

/// Create an internal error
pub fn internal_error(msg: impl Into<String>) -> McpError {
    McpError::internal_error(msg.into(), None)
}

/// Scratch directory for filesystem-backed tests, removed on drop
#[cfg(test)]
pub struct ScratchDir(std::path::PathBuf);

#[cfg(test)]
impl std::ops::Deref for ScratchDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[cfg(test)]
pub fn scratch_dir(label: &str) -> ScratchDir {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static NEXT: AtomicUsize = AtomicUsize::new(0);

    let dir = std::env::temp_dir().join(format!(
        "sensehat-bridge-{}-{}-{}",
        label,
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    ScratchDir(dir)
}
