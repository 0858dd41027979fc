//! Swap directory manager.
//!
//! Owns the one directory a
//! [`crate::context::TileStore`] spills swap files into: creates it with
//! owner-only permissions, sweeps leftover files from dead processes on
//! startup, and hands out collision-free basenames to
//! [`crate::backend::swap::SwapBackend`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::error::Result;

const SWAP_PREFIX: &str = "vfx-swap-";

/// Directory a store's swap files live in, with the live-filename allowlist
/// that guards [`SwapDirManager::remove_file`] against removing anything it
/// didn't itself hand out.
pub struct SwapDirManager {
    dir: PathBuf,
    live_files: Mutex<HashSet<PathBuf>>,
    counter: AtomicU32,
}

impl SwapDirManager {
    /// Create `dir` (with parents) if it doesn't exist, restricting
    /// permissions to the owner, then sweep it for files left behind by a
    /// process that is no longer running.
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        restrict_to_owner(&dir)?;

        let manager = SwapDirManager { dir, live_files: Mutex::new(HashSet::new()), counter: AtomicU32::new(0) };
        manager.clean_stale_files();
        Ok(manager)
    }

    /// The managed directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve a fresh swap file path: `vfx-swap-<pid>-<counter>[-<suffix>]`.
    /// The counter is process-local, so concurrent callers never
    /// collide even without filesystem-level synchronisation.
    pub fn create_file(&self, suffix: Option<&str>) -> PathBuf {
        let pid = std::process::id();
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        let basename = match suffix {
            Some(suffix) => format!("{SWAP_PREFIX}{pid}-{counter}-{suffix}"),
            None => format!("{SWAP_PREFIX}{pid}-{counter}"),
        };
        let path = self.dir.join(basename);

        let mut live = self.live_files.lock().unwrap();
        if !live.insert(path.clone()) {
            // the counter is monotonic and process-local, so this should be
            // unreachable; treat it as a logic error worth surfacing loudly
            // rather than silently handing out a colliding path.
            tracing::warn!(path = %path.display(), "swap file basename collision");
        }
        path
    }

    /// Remove a swap file previously returned by [`SwapDirManager::create_file`].
    /// Refuses to touch any path it did not itself hand out.
    pub fn remove_file(&self, path: &Path) {
        let removed = self.live_files.lock().unwrap().remove(path);
        if removed {
            if let Err(err) = fs::remove_file(path) {
                tracing::debug!(path = %path.display(), %err, "swap file already gone");
            }
        } else {
            tracing::warn!(path = %path.display(), "refusing to remove an unregistered swap file");
        }
    }

    /// True if `path` is currently tracked as a live swap file.
    pub fn has_file(&self, path: &Path) -> bool {
        self.live_files.lock().unwrap().contains(path)
    }

    /// Unlink every swap file this manager has handed out. Called on clean
    /// shutdown; files from a crashed process are instead swept by the next
    /// [`SwapDirManager::open`] via [`SwapDirManager::clean_stale_files`].
    pub fn cleanup(&self) {
        let mut live = self.live_files.lock().unwrap();
        for path in live.drain() {
            let _ = fs::remove_file(&path);
        }
    }

    fn clean_stale_files(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else { return };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(rest) = name.strip_prefix(SWAP_PREFIX) else { continue };
            let Some(pid_str) = rest.split('-').next() else { continue };
            let Ok(pid) = pid_str.parse::<u32>() else { continue };
            if !pid_is_running(pid) {
                let path = entry.path();
                if fs::remove_file(&path).is_ok() {
                    tracing::debug!(path = %path.display(), pid, "removed swap file from dead process");
                }
            }
        }
    }
}

impl Drop for SwapDirManager {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(unix)]
fn restrict_to_owner(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_to_owner(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn pid_is_running(pid: u32) -> bool {
    // `kill(pid, 0)` sends no signal; it just checks whether the target
    // process exists and is visible to us.
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

#[cfg(not(unix))]
fn pid_is_running(_pid: u32) -> bool {
    // conservative: without a liveness check, assume the file might still
    // be in use rather than risk deleting a live process's swap file.
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_file_names_are_unique_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SwapDirManager::open(dir.path().join("swap")).unwrap();
        let a = manager.create_file(None);
        let b = manager.create_file(Some("mask"));
        assert_ne!(a, b);
        assert!(a.file_name().unwrap().to_str().unwrap().starts_with(SWAP_PREFIX));
        assert!(b.file_name().unwrap().to_str().unwrap().ends_with("-mask"));
    }

    #[test]
    fn remove_file_refuses_unregistered_paths() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SwapDirManager::open(dir.path().join("swap")).unwrap();
        let rogue = manager.dir().join("not-mine");
        fs::write(&rogue, b"x").unwrap();
        manager.remove_file(&rogue);
        assert!(rogue.exists(), "an unregistered path must survive remove_file");
    }

    #[test]
    fn registered_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SwapDirManager::open(dir.path().join("swap")).unwrap();
        let path = manager.create_file(None);
        fs::write(&path, b"x").unwrap();
        manager.remove_file(&path);
        assert!(!path.exists());
        assert!(!manager.has_file(&path));
    }

    #[cfg(unix)]
    #[test]
    fn stale_file_from_dead_pid_is_swept_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let swap_path = dir.path().join("swap");
        fs::create_dir_all(&swap_path).unwrap();
        // pid 1 style huge value very unlikely to be a live process in a
        // container's pid namespace; use a value guaranteed unused instead.
        let dead_pid = 999_999u32;
        let stale = swap_path.join(format!("{SWAP_PREFIX}{dead_pid}-0"));
        fs::write(&stale, b"leftover").unwrap();

        let _manager = SwapDirManager::open(swap_path).unwrap();
        assert!(!stale.exists(), "leftover file from a dead pid should be swept");
    }
}
