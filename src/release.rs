//! Release publication
//!
//! After a successful build pipeline, the *last* buildpack's release
//! program is invoked once and its stdout is written verbatim to a fixed
//! file inside the build directory. The platform reads that file to learn
//! the application's runtime metadata; whichever buildpack is last in the
//! manifest wins.

use crate::acquire::AcquiredBuildpack;
use crate::error::{StagingError, StagingResult};
use crate::log::StageLog;
use crate::runner::CommandRunner;
use std::path::Path;
use std::sync::Arc;

/// Fixed output file name, relative to the build directory
pub const RELEASE_FILE: &str = "last_pack_release.out";

/// Captures the last buildpack's release output
pub struct ReleasePublisher {
    runner: Arc<dyn CommandRunner>,
}

impl ReleasePublisher {
    /// Create a publisher using the given command runner
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run `bin/release <build_dir>` for one buildpack and persist its stdout
    pub async fn publish(
        &self,
        acquired: &AcquiredBuildpack,
        build_dir: &Path,
        log: &StageLog,
    ) -> StagingResult<()> {
        log.step(&format!(
            "Running release for buildpack {}...",
            acquired.reference()
        ));

        let program = acquired.path().join("bin").join("release");
        let args = vec![build_dir.display().to_string()];
        let output = self
            .runner
            .run(&program.display().to_string(), &args, acquired.path())
            .await?;

        if !output.success() {
            return Err(StagingError::Release {
                buildpack: acquired.reference().raw().to_string(),
                stderr: output.stderr,
            });
        }

        let release_file = build_dir.join(RELEASE_FILE);
        std::fs::write(&release_file, output.stdout.as_bytes()).map_err(|e| {
            StagingError::io(format!("writing release file {}", release_file.display()), e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::capture::capturing_log;
    use crate::reference::BuildpackReference;
    use crate::runner::fake::FakeRunner;
    use crate::workspace::RunWorkspace;
    use tempfile::TempDir;

    async fn acquired(
        workspace: &RunWorkspace,
        runner: Arc<FakeRunner>,
        raw: &str,
    ) -> AcquiredBuildpack {
        let (log, _captured) = capturing_log();
        crate::acquire::Acquirer::new(runner)
            .acquire(&BuildpackReference::parse(raw), workspace, &log)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn release_stdout_is_written_verbatim() {
        let build_dir = TempDir::new().unwrap();
        let workspace = RunWorkspace::create(build_dir.path()).unwrap();
        let runner = Arc::new(FakeRunner::new());
        let bp = acquired(&workspace, runner.clone(), "https://host/org/go-buildpack").await;

        let release_yaml = "---\ndefault_process_types:\n  web: ./app\n";
        let program = bp.path().join("bin").join("release").display().to_string();
        runner.script_stdout(&program, release_yaml);
        let (log, _captured) = capturing_log();

        ReleasePublisher::new(runner.clone())
            .publish(&bp, build_dir.path(), &log)
            .await
            .unwrap();

        let written = std::fs::read_to_string(build_dir.path().join(RELEASE_FILE)).unwrap();
        assert_eq!(written, release_yaml);

        let calls = runner.invocations_of(&program);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec![build_dir.path().display().to_string()]);
        assert_eq!(calls[0].cwd, bp.path().as_path());
    }

    #[tokio::test]
    async fn release_failure_is_fatal_and_writes_nothing() {
        let build_dir = TempDir::new().unwrap();
        let workspace = RunWorkspace::create(build_dir.path()).unwrap();
        let runner = Arc::new(FakeRunner::new());
        let bp = acquired(&workspace, runner.clone(), "https://host/org/go-buildpack").await;

        let program = bp.path().join("bin").join("release").display().to_string();
        runner.script_failure(&program, 1, "no Procfile");
        let (log, _captured) = capturing_log();

        let err = ReleasePublisher::new(runner)
            .publish(&bp, build_dir.path(), &log)
            .await
            .unwrap_err();

        assert!(matches!(err, StagingError::Release { .. }));
        assert!(!build_dir.path().join(RELEASE_FILE).exists());
    }
}
