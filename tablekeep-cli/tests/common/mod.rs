//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - A seeded restaurant catalog
//! - Shortcuts for booking and reading reservations back

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Restaurant seeded by [`TestEnv::seeded`].
pub const RESTAURANT: &str = "bistro";

/// Catalog with one restaurant: tables of 2, 4, 4 and 6 seats, 90 minute bookings.
pub const CATALOG: &str = "\
restaurants:
  - id: bistro
    name: Bistro do Porto
    phone: \"555-0100\"
    max_reservation_minutes: 90
    tables:
      - { number: 1, seats: 2 }
      - { number: 2, seats: 4 }
      - { number: 3, seats: 4 }
      - { number: 4, seats: 6 }
";

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the tablekeep data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; tablekeep creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("tablekeep-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// A new environment with [`CATALOG`] already imported.
    pub fn seeded() -> Self {
        let env = Self::new();
        let catalog = env.write_file("catalog.yaml", CATALOG);
        env.command().arg("seed").arg(&catalog).assert().success();
        env
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// Times render in UTC and the working directory is the temp dir, so no
    /// project configuration from the source tree leaks in.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("tablekeep").expect("Failed to find tablekeep binary");
        cmd.current_dir(&self.temp_path)
            .env("TABLEKEEP_TIMEZONE", "UTC")
            .env_remove("TABLEKEEP_DATA_DIR")
            .env_remove("TABLEKEEP_NOW")
            .env_remove("TABLEKEEP_DISABLE_AUTOINIT");
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// A command with the clock pinned to `now` (RFC 3339).
    pub fn command_at(&self, now: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("--now").arg(now);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file under the temp directory and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Book at [`RESTAURANT`] and return the reservation id.
    ///
    /// # Panics
    /// Panics if the reserve command fails.
    pub fn reserve(&self, client: &str, email: &str, at: &str, party: u32) -> String {
        let output = self
            .command()
            .args(["reserve", "--restaurant", RESTAURANT, "--client", client])
            .args(["--name", client, "--email", email, "--at", at])
            .args(["--party", &party.to_string()])
            .output()
            .expect("Failed to run reserve command");

        assert!(
            output.status.success(),
            "Reserve failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Run `show --format json` and parse the result.
    pub fn show_json(&self, id: &str) -> serde_json::Value {
        let output = self
            .command()
            .args(["show", id, "--format", "json"])
            .output()
            .expect("Failed to run show command");
        assert!(output.status.success(), "show failed for {id}");
        serde_json::from_slice(&output.stdout).expect("show did not print JSON")
    }
}
