//! Run-scoped scratch directory for buildpack downloads
//!
//! Created inside the build directory at run start with a unique name, so
//! concurrent or retried runs on one host cannot collide. Removed before
//! the run's result is considered final, on every exit path.

use crate::error::{StagingError, StagingResult};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const SCRATCH_PREFIX: &str = ".multipack-downloads";

/// Scratch directory holding acquired buildpacks for one run
#[derive(Debug)]
pub struct RunWorkspace {
    path: PathBuf,
}

impl RunWorkspace {
    /// Create a uniquely named scratch directory inside the build directory
    pub fn create(build_dir: &Path) -> StagingResult<Self> {
        let path = build_dir.join(format!("{}-{}", SCRATCH_PREFIX, Uuid::new_v4()));
        std::fs::create_dir_all(&path)
            .map_err(|e| StagingError::io(format!("creating workspace {}", path.display()), e))?;
        debug!("Created run workspace {}", path.display());
        Ok(Self { path })
    }

    /// The workspace directory; acquisition works relative to this
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of a buildpack materialized under this workspace
    pub fn buildpack_path(&self, dir_name: &str) -> PathBuf {
        self.path.join(dir_name)
    }

    /// Delete the scratch directory and everything under it
    pub fn remove(&self) -> StagingResult<()> {
        debug!("Removing run workspace {}", self.path.display());
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            // already gone counts as removed
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StagingError::io(
                format!("removing workspace {}", self.path.display()),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_makes_directory_inside_build_dir() {
        let build_dir = TempDir::new().unwrap();
        let ws = RunWorkspace::create(build_dir.path()).unwrap();

        assert!(ws.path().is_dir());
        assert!(ws.path().starts_with(build_dir.path()));
    }

    #[test]
    fn names_are_unique_per_run() {
        let build_dir = TempDir::new().unwrap();
        let a = RunWorkspace::create(build_dir.path()).unwrap();
        let b = RunWorkspace::create(build_dir.path()).unwrap();

        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn remove_deletes_contents() {
        let build_dir = TempDir::new().unwrap();
        let ws = RunWorkspace::create(build_dir.path()).unwrap();
        std::fs::create_dir(ws.buildpack_path("ruby-buildpack")).unwrap();
        std::fs::write(ws.buildpack_path("ruby-buildpack").join("bin"), b"x").unwrap();

        ws.remove().unwrap();

        assert!(!ws.path().exists());
    }

    #[test]
    fn remove_is_idempotent() {
        let build_dir = TempDir::new().unwrap();
        let ws = RunWorkspace::create(build_dir.path()).unwrap();

        ws.remove().unwrap();
        ws.remove().unwrap();
    }
}
