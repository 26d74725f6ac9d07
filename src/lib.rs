//! Plotkeeper - garden cell occupancy and harvest scheduling.
//!
//! This library provides the core functionality for the `pk` CLI tool:
//! containers and their planting cells, a shared plant library, and
//! harvest forecasting over occupied cells.

pub mod action_log;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod models;
pub mod registry;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use registry::{GardenDocument, GardenRegistry, GardenSummary, UpcomingHarvest};

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::Path;
    use std::sync::OnceLock;
    use tempfile::TempDir;

    use crate::storage::{CONFIG_DIR_ENV, DATA_DIR_ENV, Storage};

    /// Shared data directory for tests that go through `PK_DATA_DIR`.
    static TEST_DATA_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Point `PK_DATA_DIR` and `PK_CONFIG_DIR` at a process-wide temp directory.
    ///
    /// For the command layer, which resolves storage from the environment.
    /// Storage-level tests should use the `*_with_data_dir()` methods instead.
    pub fn init_test_env_var() {
        TEST_DATA_DIR.get_or_init(|| {
            let dir = TempDir::new().unwrap();
            // SAFETY: runs once per test process under OnceLock, before any
            // test in this process reads either variable.
            unsafe {
                std::env::set_var(DATA_DIR_ENV, dir.path());
                std::env::set_var(CONFIG_DIR_ENV, dir.path().join("config"));
            }
            dir
        });
    }

    /// Test environment with isolated storage using dependency injection.
    ///
    /// Storage and config tests call the `*_with_data_dir()` methods so they
    /// never touch `PK_DATA_DIR` or the user's data directory.
    pub struct TestEnv {
        /// Simulated garden working directory
        pub garden_dir: TempDir,
        /// Isolated data storage directory
        pub data_dir: TempDir,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self {
                garden_dir: TempDir::new().unwrap(),
                data_dir: TempDir::new().unwrap(),
            }
        }

        /// Get the path to the simulated garden directory.
        pub fn path(&self) -> &Path {
            self.garden_dir.path()
        }

        /// Get the path to the isolated data directory.
        pub fn data_path(&self) -> &Path {
            self.data_dir.path()
        }

        /// Initialize storage for a fresh garden.
        pub fn init_storage(&self) -> Storage {
            Storage::init_with_data_dir(self.path(), self.data_path(), "Test Garden", "7a").unwrap()
        }

        /// Open storage for this test environment.
        pub fn open_storage(&self) -> Storage {
            Storage::open_with_data_dir(self.path(), self.data_path()).unwrap()
        }

        /// Check if storage exists for this test environment.
        pub fn storage_exists(&self) -> bool {
            Storage::exists_with_data_dir(self.path(), self.data_path()).unwrap()
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Library-level error type for Plotkeeper operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not initialized: run `pk init <name> <zone>` first")]
    NotInitialized,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate ID: {0}")]
    DuplicateId(String),

    #[error("Cell already exists: {0}")]
    CellExists(String),

    #[error("Cell {0} is already occupied")]
    AlreadyOccupied(String),

    #[error("Container {0} cannot be moved")]
    Immobile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<kdl::KdlError> for Error {
    fn from(err: kdl::KdlError) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for Plotkeeper operations.
pub type Result<T> = std::result::Result<T, Error>;
