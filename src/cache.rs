//! Cache partition management
//!
//! Each buildpack gets its own subdirectory of the persistent cache root,
//! named by a SHA-256 digest of its identity string. The digest keeps
//! partition names filesystem-safe and length-bounded regardless of URI
//! length. Partitions are the only state that survives across runs.

use crate::error::{StagingError, StagingResult};
use crate::reference::BuildpackReference;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Derive the partition directory name for a buildpack reference
///
/// Deterministic across processes: same identity string, same name. The
/// identity has any `#ref` fragment stripped, so branches of one source
/// share a partition.
pub fn partition_name(reference: &BuildpackReference) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reference.identity().as_bytes());
    hex::encode(hasher.finalize())
}

/// Full path of a reference's partition under the cache root
pub fn partition_path(cache_root: &Path, reference: &BuildpackReference) -> PathBuf {
    cache_root.join(partition_name(reference))
}

/// Create a partition directory if absent and return its path
///
/// Called lazily, immediately before that entry's build step; never eagerly
/// for the whole manifest. An existing partition is left untouched.
pub fn ensure_partition(
    cache_root: &Path,
    reference: &BuildpackReference,
) -> StagingResult<PathBuf> {
    let path = partition_path(cache_root, reference);
    std::fs::create_dir_all(&path).map_err(|e| {
        StagingError::io(format!("creating cache partition {}", path.display()), e)
    })?;
    Ok(path)
}

/// Remove cache entries with no corresponding manifest entry
///
/// Enumerates direct children of the cache root, computes the expected
/// partition set from the manifest, and deletes everything else. Runs once
/// per run, before any build step, so a manifest edit orphans a partition
/// for at most one run. Matching partitions are never cleared.
///
/// Returns the number of entries removed.
pub fn prune(cache_root: &Path, references: &[BuildpackReference]) -> StagingResult<usize> {
    let expected: Vec<String> = references.iter().map(partition_name).collect();

    let entries = std::fs::read_dir(cache_root)
        .map_err(|e| StagingError::io(format!("reading cache root {}", cache_root.display()), e))?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| {
            StagingError::io(format!("reading cache root {}", cache_root.display()), e)
        })?;
        let name = entry.file_name().to_string_lossy().to_string();

        if expected.iter().any(|n| *n == name) {
            continue;
        }

        let path = entry.path();
        debug!("Pruning unused cache partition {}", path.display());
        let result = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        result.map_err(|e| {
            StagingError::io(format!("removing cache partition {}", path.display()), e)
        })?;
        removed += 1;
    }

    debug!("Pruned {} unused cache partitions", removed);
    Ok(removed)
}
