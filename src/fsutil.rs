//! File helpers shared by every vault artifact.
//!
//! Each artifact (key, master record, credential table) is restricted to
//! its owner right after it is written.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::errors::{FerneyError, Result};

/// Owner read/write/execute, nothing for group or others.
pub const OWNER_ONLY_MODE: u32 = 0o700;

/// Restrict `path` to owner-only access.
///
/// A no-op on platforms without Unix permission bits.
pub fn restrict_to_owner(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(OWNER_ONLY_MODE);
        fs::set_permissions(path, perms).map_err(|e| FerneyError::from_io(path, e))?;
    }

    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

/// Create a new file that must not already exist, owner-only from the start.
pub fn create_private(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OWNER_ONLY_MODE);
    }

    options.open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => FerneyError::FileExists(path.to_path_buf()),
        _ => FerneyError::from_io(path, e),
    })
}

/// Best-effort removal of a file this run created, when a later step failed.
///
/// The caller is already returning the original error, so a failed
/// removal is only logged.
pub fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove partial artifact");
    }
}

/// Create the vault directory (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| FerneyError::from_io(dir, e))?;
        restrict_to_owner(dir)?;
    }
    Ok(())
}
