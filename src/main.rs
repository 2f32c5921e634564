//! multipack - Multi-buildpack staging orchestrator
//!
//! CLI entry point: `multipack <BUILD_DIR> <CACHE_DIR>`.

use clap::Parser;
use console::style;
use multipack::error::{StagingError, StagingResult};
use multipack::log::StageLog;
use multipack::runner::ProcessRunner;
use multipack::stage::StagingRun;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Multi-buildpack staging orchestrator
///
/// Acquires each buildpack named in the app's multi-buildpack.yml, runs the
/// platform build program once per buildpack against the shared build
/// directory, and publishes the last buildpack's release output.
#[derive(Parser, Debug)]
#[command(name = "multipack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Shared build directory (the app root, mutated by every buildpack)
    build_dir: PathBuf,

    /// Persistent cache root, partitioned per buildpack
    cache_dir: PathBuf,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> StagingResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("multipack=warn"),
        1 => EnvFilter::new("multipack=info"),
        _ => EnvFilter::new("multipack=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    if !cli.build_dir.is_dir() {
        return Err(StagingError::PathNotFound(cli.build_dir));
    }
    if !cli.cache_dir.is_dir() {
        return Err(StagingError::PathNotFound(cli.cache_dir));
    }

    let run = StagingRun::new(
        cli.build_dir,
        cli.cache_dir,
        Arc::new(ProcessRunner::new()),
        StageLog::stdout(),
    );
    run.run().await
}
