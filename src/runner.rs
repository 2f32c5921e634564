//! External command execution
//!
//! Every external tool the orchestrator shells out to (curl, unzip, git,
//! the platform builder and release programs) goes through the
//! [`CommandRunner`] trait, so tests can inject a fake instead of stubbing
//! process-spawn machinery.

use crate::error::{StagingError, StagingResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one external command
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit code; -1 when the process was terminated by a signal
    pub code: i32,
}

impl RunOutput {
    /// Whether the command exited zero
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Abstract command execution interface
///
/// Takes a program name, argument list and working directory, and returns
/// captured output plus exit status. The orchestrator never inspects the
/// tools beyond this.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program to completion, capturing its output
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> StagingResult<RunOutput>;
}

/// Real implementation spawning processes via tokio
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> StagingResult<RunOutput> {
        debug!("Executing: {} {:?} (cwd: {})", program, args, cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| StagingError::command_failed(format!("{} {:?}", program, args), e))?;

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code().unwrap_or(-1),
        })
    }
}
