//! Manifest loading
//!
//! The app root must contain a `multi-buildpack.yml` declaring the ordered
//! list of buildpacks to stage with. The manifest is read fresh at the start
//! of every run; nothing is cached across runs.

use crate::error::{StagingError, StagingResult};
use crate::reference::BuildpackReference;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Fixed manifest file name, relative to the build directory
pub const MANIFEST_FILE: &str = "multi-buildpack.yml";

/// Parsed `multi-buildpack.yml`
///
/// Order is semantically meaningful: it is the build order, and the last
/// entry is the one whose release output is published.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    buildpacks: Vec<String>,
}

impl Manifest {
    /// Load the manifest from its fixed path inside the build directory
    pub fn load(build_dir: &Path) -> StagingResult<Self> {
        let path = build_dir.join(MANIFEST_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StagingError::ManifestMissing);
            }
            Err(e) => {
                return Err(StagingError::io(
                    format!("reading manifest {}", path.display()),
                    e,
                ));
            }
        };

        let manifest: Manifest =
            serde_yaml::from_str(&contents).map_err(|e| StagingError::ManifestInvalid {
                reason: e.to_string(),
            })?;

        debug!(
            "Loaded manifest with {} buildpacks from {}",
            manifest.buildpacks.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Ordered buildpack references
    pub fn references(&self) -> Vec<BuildpackReference> {
        self.buildpacks
            .iter()
            .map(BuildpackReference::parse)
            .collect()
    }

    /// Number of manifest entries
    pub fn len(&self) -> usize {
        self.buildpacks.len()
    }

    /// Whether the manifest declares no buildpacks at all
    pub fn is_empty(&self) -> bool {
        self.buildpacks.is_empty()
    }
}
