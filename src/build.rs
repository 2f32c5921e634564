//! Build invocation
//!
//! Runs the platform's external `builder` program once per acquired
//! buildpack, in manifest order, handing each invocation the shared build
//! directory and that buildpack's own cache partition. The exit status is
//! the only success signal the orchestrator reads.

use crate::acquire::AcquiredBuildpack;
use crate::error::{StagingError, StagingResult};
use crate::log::StageLog;
use crate::runner::CommandRunner;
use crate::workspace::RunWorkspace;
use std::path::Path;
use std::sync::Arc;

/// External lifecycle builder program name
pub const BUILDER_PROGRAM: &str = "builder";

/// Discard target for droplet output the orchestrator does not need
const DROPLET_DISCARD: &str = "/dev/null";

/// Invokes the platform build program per buildpack
pub struct BuildInvoker {
    runner: Arc<dyn CommandRunner>,
}

impl BuildInvoker {
    /// Create an invoker using the given command runner
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run the build step for one buildpack
    ///
    /// Captured output is forwarded to the run log after a progress line
    /// naming the buildpack, so every line is attributable.
    pub async fn build(
        &self,
        acquired: &AcquiredBuildpack,
        workspace: &RunWorkspace,
        build_dir: &Path,
        cache_partition: &Path,
        log: &StageLog,
    ) -> StagingResult<()> {
        log.step(&format!(
            "Running builder for buildpack {}...",
            acquired.reference()
        ));

        let args = vec![
            "-buildpackOrder".to_string(),
            acquired.dir_name().to_string(),
            "-buildpacksDir".to_string(),
            workspace.path().display().to_string(),
            "-outputDroplet".to_string(),
            DROPLET_DISCARD.to_string(),
            "-buildDir".to_string(),
            build_dir.display().to_string(),
            "-buildArtifactsCacheDir".to_string(),
            cache_partition.display().to_string(),
        ];

        let output = self.runner.run(BUILDER_PROGRAM, &args, build_dir).await?;
        log.output(&output.stdout);
        log.output(&output.stderr);

        if !output.success() {
            return Err(StagingError::Build {
                buildpack: acquired.reference().raw().to_string(),
                code: output.code,
            });
        }
        Ok(())
    }
}
