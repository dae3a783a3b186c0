//! Atomic file replacement and exclusive creation.
//!
//! Writes go to a uniquely named temp file in the target directory, are
//! fsynced, then renamed over the target. Readers see either the old or the
//! new content, never a torn file, and concurrent writers never share a temp
//! file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Replace `path` with `bytes` atomically.
///
/// `mode` sets Unix permission bits on the new file before it becomes
/// visible; ignored elsewhere.
pub fn write_atomic(path: &Path, bytes: &[u8], mode: Option<u32>) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, bytes, mode).and_then(|()| fs::rename(&temp_path, path));

    if result.is_err() {
        // Best effort; the original error is what matters
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Create `path` with `bytes`, failing with `AlreadyExists` if it is present.
///
/// Same temp-file staging as [`write_atomic`], but the final step is a hard
/// link, which never replaces an existing target. The file appears complete
/// or not at all.
pub fn write_exclusive(path: &Path, bytes: &[u8], mode: Option<u32>) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, bytes, mode).and_then(|()| fs::hard_link(&temp_path, path));

    // The link (if any) keeps the content alive
    let _ = fs::remove_file(&temp_path);
    result
}

fn write_temp(temp_path: &Path, bytes: &[u8], mode: Option<u32>) -> io::Result<()> {
    let mut file = fs::File::create(temp_path)?;

    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.write_all(bytes)?;
    file.sync_all()
}

/// `<dir>/.<name>.<uuid>.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
}
