//! Storage layer for Plotkeeper data.
//!
//! Each garden lives in its own directory under
//! `~/.local/share/plotkeeper/<path-hash>/`, keyed by a hash of the garden's
//! working directory. `PK_DATA_DIR` replaces the `~/.local/share/plotkeeper`
//! prefix (used by tests and sandboxed setups).
//!
//! Layout:
//! - `garden.json` - the full garden document, rewritten atomically on save
//! - `config.kdl` - session-level preferences
//! - `action.log` - JSONL audit trail of CLI invocations
//!
//! The system-level `config.kdl` lives in `~/.config/plotkeeper/`
//! (overridable via `PK_CONFIG_DIR`).

use crate::config::GardenConfig;
use crate::registry::{GardenDocument, GardenRegistry};
use crate::{Error, Result};
use kdl::KdlDocument;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Environment variable overriding the data directory root.
pub const DATA_DIR_ENV: &str = "PK_DATA_DIR";

/// Environment variable overriding the system config directory.
pub const CONFIG_DIR_ENV: &str = "PK_CONFIG_DIR";

const GARDEN_FILE: &str = "garden.json";
const CONFIG_FILE: &str = "config.kdl";
const ACTION_LOG_FILE: &str = "action.log";

/// Storage manager for a single garden.
#[derive(Debug, Clone)]
pub struct Storage {
    /// Root directory for this garden's data
    pub root: PathBuf,
}

impl Storage {
    /// Open storage for an existing garden.
    pub fn open(garden_path: &Path) -> Result<Self> {
        Self::open_at(get_storage_dir(garden_path)?)
    }

    /// Open storage with an explicit data directory.
    pub fn open_with_data_dir(garden_path: &Path, data_dir: &Path) -> Result<Self> {
        Self::open_at(get_storage_dir_with_data_dir(garden_path, data_dir)?)
    }

    fn open_at(root: PathBuf) -> Result<Self> {
        if !root.join(GARDEN_FILE).exists() {
            return Err(Error::NotInitialized);
        }
        Ok(Self { root })
    }

    /// Create storage for a new, empty garden.
    pub fn init(garden_path: &Path, garden_name: &str, zone: &str) -> Result<Self> {
        Self::init_at(get_storage_dir(garden_path)?, garden_name, zone)
    }

    /// Create storage with an explicit data directory.
    pub fn init_with_data_dir(
        garden_path: &Path,
        data_dir: &Path,
        garden_name: &str,
        zone: &str,
    ) -> Result<Self> {
        Self::init_at(
            get_storage_dir_with_data_dir(garden_path, data_dir)?,
            garden_name,
            zone,
        )
    }

    fn init_at(root: PathBuf, garden_name: &str, zone: &str) -> Result<Self> {
        if root.join(GARDEN_FILE).exists() {
            return Err(Error::Other(format!(
                "Garden already initialized at {}",
                root.display()
            )));
        }
        fs::create_dir_all(&root)?;

        let storage = Self { root };
        storage.save(&GardenRegistry::new(garden_name, zone))?;
        tracing::info!(root = %storage.root.display(), garden = garden_name, "initialized garden storage");
        Ok(storage)
    }

    /// Check if a garden exists for the given path.
    pub fn exists(garden_path: &Path) -> Result<bool> {
        Ok(get_storage_dir(garden_path)?.join(GARDEN_FILE).exists())
    }

    /// Check if a garden exists, with an explicit data directory.
    pub fn exists_with_data_dir(garden_path: &Path, data_dir: &Path) -> Result<bool> {
        Ok(get_storage_dir_with_data_dir(garden_path, data_dir)?
            .join(GARDEN_FILE)
            .exists())
    }

    /// Get the storage root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn garden_file_path(&self) -> PathBuf {
        self.root.join(GARDEN_FILE)
    }

    pub fn action_log_path(&self) -> PathBuf {
        self.root.join(ACTION_LOG_FILE)
    }

    // === Garden document ===

    /// Load the garden registry from disk.
    pub fn load(&self) -> Result<GardenRegistry> {
        let path = self.garden_file_path();
        let file = File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotInitialized,
            _ => Error::Io(e),
        })?;
        let doc: GardenDocument = serde_json::from_reader(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            containers = doc.containers.len(),
            cells = doc.cells.len(),
            "loaded garden"
        );
        GardenRegistry::from_document(doc)
    }

    /// Write the garden registry to disk.
    ///
    /// The document is written to a temporary file in the storage root and
    /// renamed over `garden.json`, so readers never see a partial write.
    pub fn save(&self, registry: &GardenRegistry) -> Result<()> {
        let doc = registry.to_document();
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &doc)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.persist(self.garden_file_path())
            .map_err(|e| Error::Io(e.error))?;
        tracing::debug!(root = %self.root.display(), "saved garden");
        Ok(())
    }

    // === Session config.kdl ===

    pub fn config_kdl_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Read the session config.kdl document. Missing files read as empty.
    pub fn read_config_kdl(&self) -> Result<KdlDocument> {
        read_kdl_file(&self.config_kdl_path())
    }

    pub fn read_garden_config(&self) -> Result<GardenConfig> {
        Ok(GardenConfig::from_kdl(&self.read_config_kdl()?))
    }

    pub fn write_garden_config(&self, config: &GardenConfig) -> Result<()> {
        config.validate().map_err(Error::Config)?;
        write_kdl_file(&self.config_kdl_path(), &config.to_kdl())
    }

    // === System config.kdl ===

    /// Path to the system config.kdl, if a config directory can be determined.
    pub fn system_config_kdl_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join(CONFIG_FILE));
        }
        dirs::config_dir().map(|d| d.join("plotkeeper").join(CONFIG_FILE))
    }

    pub fn read_system_garden_config() -> Result<GardenConfig> {
        match Self::system_config_kdl_path() {
            Some(path) => Ok(GardenConfig::from_kdl(&read_kdl_file(&path)?)),
            None => Ok(GardenConfig::default()),
        }
    }

    pub fn write_system_garden_config(config: &GardenConfig) -> Result<()> {
        config.validate().map_err(Error::Config)?;
        let path = Self::system_config_kdl_path()
            .ok_or_else(|| Error::Other("Could not determine config directory".to_string()))?;
        write_kdl_file(&path, &config.to_kdl())
    }
}

fn read_kdl_file(path: &Path) -> Result<KdlDocument> {
    if !path.exists() {
        return Ok(KdlDocument::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(content.parse::<KdlDocument>()?)
}

fn write_kdl_file(path: &Path, doc: &KdlDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_string())?;
    Ok(())
}

/// Get the storage directory for a garden.
///
/// Uses a hash of the garden path to create a unique directory under
/// `$PK_DATA_DIR` or `~/.local/share/plotkeeper/`.
pub fn get_storage_dir(garden_path: &Path) -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return get_storage_dir_with_data_dir(garden_path, Path::new(&dir));
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    get_storage_dir_with_data_dir(garden_path, &data_dir.join("plotkeeper"))
}

/// Get the storage directory for a garden under an explicit data directory.
pub fn get_storage_dir_with_data_dir(garden_path: &Path, data_dir: &Path) -> Result<PathBuf> {
    let canonical = garden_path
        .canonicalize()
        .map_err(|e| Error::Other(format!("Could not canonicalize garden path: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());

    Ok(data_dir.join(&hash_hex[..12]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::models::{Container, PlantSpec};
    use crate::test_utils::TestEnv;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_init_creates_empty_garden() {
        let env = TestEnv::new();
        assert!(!env.storage_exists());

        let storage = env.init_storage();
        assert!(env.storage_exists());
        assert!(storage.garden_file_path().exists());

        let garden = storage.load().unwrap();
        assert_eq!(garden.garden_name(), "Test Garden");
        assert_eq!(garden.zone(), "7a");
        assert!(garden.containers().is_empty());
    }

    #[test]
    fn test_init_twice_fails() {
        let env = TestEnv::new();
        env.init_storage();
        let again = Storage::init_with_data_dir(env.path(), env.data_path(), "Other", "5b");
        assert!(again.is_err());
        assert_eq!(env.open_storage().load().unwrap().garden_name(), "Test Garden");
    }

    #[test]
    fn test_open_uninitialized() {
        let env = TestEnv::new();
        let result = Storage::open_with_data_dir(env.path(), env.data_path());
        assert!(matches!(result, Err(Error::NotInitialized)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let env = TestEnv::new();
        let storage = env.init_storage();

        let mut garden = storage.load().unwrap();
        garden
            .add_container(Container::pot("pot1", "Herb Pot", 12.0, 10.0).unwrap())
            .unwrap();
        garden
            .add_plant_to_library(PlantSpec::herb("h1", "Basil", "Ocimum basilicum", 21))
            .unwrap();
        garden.create_cell("pot1", "A", 1).unwrap();
        let planted = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        garden.plant_cell_at("pot1_A1", "h1", planted).unwrap();
        storage.save(&garden).unwrap();

        let reloaded = env.open_storage().load().unwrap();
        assert_eq!(reloaded.summary(), garden.summary());
        assert_eq!(
            reloaded.cell("pot1_A1").unwrap().planted_at(),
            Some(planted)
        );
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let env = TestEnv::new();
        let storage = env.init_storage();
        let garden = storage.load().unwrap();
        storage.save(&garden).unwrap();

        let entries: Vec<_> = fs::read_dir(storage.root())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(GARDEN_FILE)]);
    }

    #[test]
    fn test_storage_dir_is_stable_per_path() {
        let env = TestEnv::new();
        let a = get_storage_dir_with_data_dir(env.path(), env.data_path()).unwrap();
        let b = get_storage_dir_with_data_dir(env.path(), env.data_path()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.file_name().unwrap().len(), 12);

        let other = TestEnv::new();
        let c = get_storage_dir_with_data_dir(other.path(), env.data_path()).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_session_config_roundtrip() {
        let env = TestEnv::new();
        let storage = env.init_storage();

        assert_eq!(storage.read_garden_config().unwrap(), GardenConfig::default());

        let config = GardenConfig {
            output_format: Some(OutputFormat::Human),
            harvest_window: Some(14),
            action_log: Some(false),
        };
        storage.write_garden_config(&config).unwrap();
        assert_eq!(storage.read_garden_config().unwrap(), config);
    }

    #[test]
    fn test_corrupt_config_is_config_error() {
        let env = TestEnv::new();
        let storage = env.init_storage();
        fs::write(storage.config_kdl_path(), "output-format \"human").unwrap();
        assert!(matches!(storage.read_config_kdl(), Err(Error::Config(_))));
    }
}
