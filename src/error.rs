//! Error types for multipack
//!
//! All modules use `StagingResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for staging operations
pub type StagingResult<T> = Result<T, StagingError>;

/// All errors that can occur during a staging run
#[derive(Error, Debug)]
pub enum StagingError {
    // Configuration errors
    #[error("A multi-buildpack manifest file must be provided at your app root to use this buildpack.")]
    ManifestMissing,

    #[error("The multi-buildpack manifest file is malformed: {reason}")]
    ManifestInvalid { reason: String },

    // Acquisition errors
    #[error("Failed to acquire buildpack {reference}: {stderr}")]
    Acquisition { reference: String, stderr: String },

    // Build errors
    #[error("Build failed for buildpack {buildpack}, exit code: {code}")]
    Build { buildpack: String, code: i32 },

    // Release errors
    #[error("Release failed for buildpack {buildpack}: {stderr}")]
    Release { buildpack: String, stderr: String },

    // Process errors
    #[error("Command failed to start: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

impl StagingError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an acquisition error
    pub fn acquisition(reference: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Acquisition {
            reference: reference.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ManifestMissing => {
                Some("Add a multi-buildpack.yml with a `buildpacks` list to your app root")
            }
            Self::ManifestInvalid { .. } => {
                Some("The manifest must contain a `buildpacks` key mapping to a list of URIs")
            }
            _ => None,
        }
    }
}
