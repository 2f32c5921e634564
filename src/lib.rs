//! multipack - Multi-buildpack staging orchestrator
//!
//! Composes independently-authored buildpacks, declared in order in a
//! `multi-buildpack.yml` manifest, into one staging pipeline over a shared
//! build directory and a partitioned persistent cache.

pub mod acquire;
pub mod build;
pub mod cache;
pub mod error;
pub mod log;
pub mod manifest;
pub mod reference;
pub mod release;
pub mod runner;
pub mod stage;
pub mod workspace;

pub use error::{StagingError, StagingResult};
