//! Integration tests for multipack
//!
//! Black-box tests of the binary. Everything here runs without network
//! access or platform lifecycle tools: an empty manifest exercises the full
//! pipeline (manifest, workspace, prune, cleanup) without invoking any
//! external program.

mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn multipack() -> Command {
        Command::cargo_bin("multipack").unwrap()
    }

    #[test]
    fn help_displays() {
        multipack()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Multi-buildpack staging orchestrator"));
    }

    #[test]
    fn version_displays() {
        multipack()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("multipack"));
    }

    #[test]
    fn missing_args_fail() {
        multipack().assert().failure();
    }

    #[test]
    fn missing_build_dir_fails() {
        let cache = TempDir::new().unwrap();
        multipack()
            .args(["/nonexistent/build/dir"])
            .arg(cache.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn missing_manifest_reports_fixed_message() {
        let build = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();

        multipack()
            .arg(build.path())
            .arg(cache.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "A multi-buildpack manifest file must be provided at your app root to use this buildpack.",
            ));
    }

    #[test]
    fn malformed_manifest_reports_parse_error() {
        let build = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        std::fs::write(build.path().join("multi-buildpack.yml"), "not_buildpacks: 1\n").unwrap();

        multipack()
            .arg(build.path())
            .arg(cache.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("malformed"));
    }

    #[test]
    fn empty_manifest_succeeds_and_prunes_cache() {
        let build = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        std::fs::write(build.path().join("multi-buildpack.yml"), "buildpacks: []\n").unwrap();

        // a partition left over from a manifest that no longer names it
        let orphan = cache.path().join("0123456789abcdef");
        std::fs::create_dir(&orphan).unwrap();
        std::fs::write(orphan.join("stale"), b"old cache").unwrap();

        multipack()
            .arg(build.path())
            .arg(cache.path())
            .assert()
            .success();

        assert!(!orphan.exists());
        // no run-scoped scratch directory survives
        let leftovers: Vec<_> = std::fs::read_dir(build.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with(".multipack-downloads"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
