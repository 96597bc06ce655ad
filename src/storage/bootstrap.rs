//! Output directory preparation.

use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::DirBuilderExt;

use tracing::{debug, warn};

use crate::error::BootstrapError;

/// Permission bits for created directories.
pub const DIR_MODE: u32 = 0o755;

/// Resolve `dir` to an absolute path and create it with all parents.
///
/// Missing directories are created with mode `0o755`.
///
/// Failing to resolve the path is an error. Failing to create the directory
/// is only logged; the resolved path is returned either way. Calling this
/// again on an existing directory succeeds.
pub fn ensure_output_dir(dir: &Path) -> Result<PathBuf, BootstrapError> {
    let abspath = std::path::absolute(dir).map_err(|source| BootstrapError::Resolve {
        path: dir.to_path_buf(),
        source,
    })?;

    debug!("Resolved path '{}' to '{}'.", dir.display(), abspath.display());

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);

    if let Err(e) = builder.create(&abspath) {
        warn!("Could not create directory '{}': {}", abspath.display(), e);
    } else if !abspath.is_dir() {
        warn!("'{}' exists but is not a directory", abspath.display());
    }

    Ok(abspath)
}
