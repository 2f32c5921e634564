//! Staging pipeline
//!
//! One `StagingRun` ties the components together as a single sequential
//! pipeline: manifest, workspace, acquisition of every entry, cache
//! pruning, one build step per buildpack, then the last buildpack's
//! release. Ordering is strict by manifest position; buildpacks compose by
//! mutating the shared build directory in turn.

use crate::acquire::{AcquiredBuildpack, Acquirer};
use crate::build::BuildInvoker;
use crate::cache;
use crate::error::StagingResult;
use crate::log::StageLog;
use crate::manifest::Manifest;
use crate::release::ReleasePublisher;
use crate::runner::CommandRunner;
use crate::workspace::RunWorkspace;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// One multi-buildpack staging run
pub struct StagingRun {
    build_dir: PathBuf,
    cache_root: PathBuf,
    runner: Arc<dyn CommandRunner>,
    log: StageLog,
}

impl StagingRun {
    /// Create a run over externally supplied build and cache directories
    pub fn new(
        build_dir: PathBuf,
        cache_root: PathBuf,
        runner: Arc<dyn CommandRunner>,
        log: StageLog,
    ) -> Self {
        Self {
            build_dir,
            cache_root,
            runner,
            log,
        }
    }

    /// Execute the full staging pipeline
    ///
    /// The scratch workspace is removed on every exit path before the
    /// result is returned. A cleanup failure after an otherwise successful
    /// run is an error in its own right; after a failed run the original
    /// error wins and the cleanup failure is only logged.
    pub async fn run(&self) -> StagingResult<()> {
        // Manifest is read fresh each run, before any other work.
        let manifest = Manifest::load(&self.build_dir)?;
        info!("Staging with {} buildpacks", manifest.len());

        let workspace = RunWorkspace::create(&self.build_dir)?;
        let result = self.run_pipeline(&manifest, &workspace).await;

        match (result, workspace.remove()) {
            (Ok(()), cleanup) => cleanup,
            (Err(run_err), Err(cleanup_err)) => {
                self.log
                    .warning(&format!("Unable to remove downloaded buildpacks: {cleanup_err}"));
                Err(run_err)
            }
            (Err(run_err), Ok(())) => Err(run_err),
        }
    }

    async fn run_pipeline(
        &self,
        manifest: &Manifest,
        workspace: &RunWorkspace,
    ) -> StagingResult<()> {
        let references = manifest.references();

        // Every entry is acquired before any build step runs.
        let acquirer = Acquirer::new(self.runner.clone());
        let mut acquired: Vec<AcquiredBuildpack> = Vec::with_capacity(references.len());
        for reference in &references {
            acquired.push(acquirer.acquire(reference, workspace, &self.log).await?);
        }

        // Prune once per run so a manifest edit drops its orphan immediately.
        let pruned = cache::prune(&self.cache_root, &references)?;
        if pruned > 0 {
            info!("Removed {} unused cache partitions", pruned);
        }

        let invoker = BuildInvoker::new(self.runner.clone());
        for buildpack in &acquired {
            // Partition created lazily, right before this entry's build.
            let partition = cache::ensure_partition(&self.cache_root, buildpack.reference())?;
            invoker
                .build(buildpack, workspace, &self.build_dir, &partition, &self.log)
                .await?;
        }

        // Only the last buildpack's release is ever invoked.
        if let Some(last) = acquired.last() {
            ReleasePublisher::new(self.runner.clone())
                .publish(last, &self.build_dir, &self.log)
                .await?;
        }

        Ok(())
    }
}
