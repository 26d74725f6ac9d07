//! Common test utilities for plotkeeper integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/plotkeeper/` or `~/.config/plotkeeper/`.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data and config storage.
///
/// - `garden_dir`: the working directory `pk` runs in
/// - `data_dir`: garden data (via `PK_DATA_DIR`)
/// - `config_dir`: system config (via `PK_CONFIG_DIR`)
///
/// The `pk()` method sets all three per invocation, so tests are parallel-safe.
pub struct TestEnv {
    pub garden_dir: TempDir,
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            garden_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment with an initialized garden.
    pub fn init() -> Self {
        let env = Self::new();
        env.pk().args(["init", "Test Garden", "7a"]).assert().success();
        env
    }

    /// Create an initialized garden with a bed, a pot, three plants and three cells.
    pub fn stocked() -> Self {
        let env = Self::init();
        env.pk()
            .args([
                "container", "add", "bed", "bed1", "Main Bed", "--length", "48", "--width", "24",
                "--depth", "12", "--location", "backyard",
            ])
            .assert()
            .success();
        env.pk()
            .args([
                "container", "add", "pot", "pot1", "Herb Pot", "--diameter", "12", "--depth",
                "10", "--location", "patio",
            ])
            .assert()
            .success();
        env.pk()
            .args(["plant", "add", "vegetable", "v1", "Tomato", "Solanum lycopersicum", "75"])
            .assert()
            .success();
        env.pk()
            .args(["plant", "add", "herb", "h1", "Basil", "Ocimum basilicum", "21"])
            .assert()
            .success();
        env.pk()
            .args([
                "plant", "add", "flower", "f1", "Marigold", "Tagetes", "45", "--bloom-color",
                "orange",
            ])
            .assert()
            .success();
        for (container, row, column) in [("bed1", "A", "1"), ("bed1", "A", "2"), ("pot1", "A", "1")] {
            env.pk()
                .args(["cell", "create", container, row, column])
                .assert()
                .success();
        }
        env
    }

    /// Get a Command for the pk binary with isolated directories.
    pub fn pk(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pk"));
        cmd.current_dir(self.garden_dir.path());
        cmd.env("PK_DATA_DIR", self.data_dir.path());
        cmd.env("PK_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("PK_GARDEN");
        cmd.env_remove("PK_LOG");
        cmd
    }

    /// Run pk with `args`, assert success, and parse stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.pk().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "pk {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    pub fn garden_path(&self) -> &std::path::Path {
        self.garden_dir.path()
    }

    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
