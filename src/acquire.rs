//! Buildpack acquisition
//!
//! Resolves one manifest reference to a local directory inside the run
//! workspace: archives are fetched with curl and extracted with unzip, git
//! references are cloned shallowly with submodules, checking out the
//! `#fragment` ref when one is given.

use crate::error::{StagingError, StagingResult};
use crate::log::StageLog;
use crate::reference::{BuildpackReference, ReferenceKind};
use crate::runner::CommandRunner;
use crate::workspace::RunWorkspace;
use std::path::PathBuf;
use std::sync::Arc;

/// A buildpack materialized on disk, ready to build
#[derive(Debug, Clone)]
pub struct AcquiredBuildpack {
    reference: BuildpackReference,
    dir_name: String,
    path: PathBuf,
}

impl AcquiredBuildpack {
    /// The manifest reference this buildpack was acquired from
    pub fn reference(&self) -> &BuildpackReference {
        &self.reference
    }

    /// Directory name under the workspace (what the builder selects by)
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// Absolute path to the buildpack directory
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Resolves buildpack references into workspace directories
pub struct Acquirer {
    runner: Arc<dyn CommandRunner>,
}

impl Acquirer {
    /// Create an acquirer using the given command runner
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Acquire one buildpack into the workspace
    ///
    /// Any non-zero exit from the underlying tool is fatal for the run;
    /// acquisition is never retried internally.
    pub async fn acquire(
        &self,
        reference: &BuildpackReference,
        workspace: &RunWorkspace,
        log: &StageLog,
    ) -> StagingResult<AcquiredBuildpack> {
        match reference.kind() {
            ReferenceKind::Archive => self.acquire_archive(reference, workspace, log).await,
            ReferenceKind::Git => self.acquire_git(reference, workspace, log).await,
        }
    }

    async fn acquire_archive(
        &self,
        reference: &BuildpackReference,
        workspace: &RunWorkspace,
        log: &StageLog,
    ) -> StagingResult<AcquiredBuildpack> {
        let archive_name = reference.archive_name().to_string();
        let dir_name = reference.dir_name().to_string();

        log.substep(&format!("Downloading buildpack {}...", reference));
        let args = vec![
            "-L".to_string(),
            reference.raw().to_string(),
            "-o".to_string(),
            archive_name.clone(),
        ];
        let output = self.runner.run("curl", &args, workspace.path()).await?;
        if !output.success() {
            return Err(StagingError::acquisition(reference.raw(), output.stderr));
        }
        log.output(&output.stdout);
        log.output(&output.stderr);

        log.substep(&format!(
            "Unzipping buildpack {} to {}...",
            archive_name, dir_name
        ));
        let args = vec![archive_name, "-d".to_string(), dir_name.clone()];
        let output = self.runner.run("unzip", &args, workspace.path()).await?;
        if !output.success() {
            return Err(StagingError::acquisition(reference.raw(), output.stderr));
        }
        log.output(&output.stdout);

        Ok(AcquiredBuildpack {
            reference: reference.clone(),
            path: workspace.buildpack_path(&dir_name),
            dir_name,
        })
    }

    async fn acquire_git(
        &self,
        reference: &BuildpackReference,
        workspace: &RunWorkspace,
        log: &StageLog,
    ) -> StagingResult<AcquiredBuildpack> {
        let dir_name = reference.dir_name().to_string();

        log.step(&format!("Cloning buildpack {}...", reference));

        // The fragment never reaches the clone tool; it selects the branch.
        let mut args = vec![
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            "--recurse-submodules".to_string(),
            reference.clone_url().to_string(),
            dir_name.clone(),
        ];
        if let Some(branch) = reference.fragment() {
            args.push("--branch".to_string());
            args.push(branch.to_string());
        }

        let output = self.runner.run("git", &args, workspace.path()).await?;
        if !output.success() {
            return Err(StagingError::acquisition(reference.raw(), output.stderr));
        }
        log.output(&output.stdout);
        log.output(&output.stderr);

        Ok(AcquiredBuildpack {
            reference: reference.clone(),
            path: workspace.buildpack_path(&dir_name),
            dir_name,
        })
    }
}
