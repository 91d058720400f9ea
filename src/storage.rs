use crate::config;
use crate::error::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Durable slot holding the last-used App ID
pub trait AppIdStore: Send {
    /// Read the stored App ID, `None` if nothing was ever saved
    fn load_app_id(&self) -> Result<Option<String>>;

    /// Overwrite the stored App ID
    fn save_app_id(&mut self, app_id: &str) -> Result<()>;
}

/// On-disk settings document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Keys this version does not know about, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Get the app data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    // Check if custom data dir is set via environment variable
    if let Ok(custom_dir) = std::env::var(config::DATA_DIR_ENV) {
        return Ok(PathBuf::from(custom_dir));
    }

    // Default to system data directory
    dirs::data_dir()
        .map(|p| p.join(config::DATA_DIR_NAME))
        .ok_or(StorageError::NoDataDir)
}

/// Initialize storage directories
pub fn init_storage(app_dir: &Path) -> Result<()> {
    for dir in [app_dir.to_path_buf(), app_dir.join("logs")] {
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir { path: dir.clone(), source })?;
    }
    Ok(())
}

/// App ID store backed by `settings.json` in the data directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            path: app_dir.join("settings.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_settings(&self) -> Result<StoredSettings> {
        if !self.path.exists() {
            return Ok(StoredSettings::default());
        }

        let json = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        Ok(serde_json::from_str(&json)?)
    }
}

impl AppIdStore for JsonFileStore {
    fn load_app_id(&self) -> Result<Option<String>> {
        Ok(self.read_settings()?.app_id)
    }

    fn save_app_id(&mut self, app_id: &str) -> Result<()> {
        // A file we cannot read is left alone rather than replaced
        let mut settings = self.read_settings()?;
        settings.app_id = Some(app_id.to_string());

        let json = serde_json::to_string_pretty(&settings)?;
        fs::write(&self.path, json).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store. Clones share the same slot, so a clone handed to a
/// second session sees what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn with_app_id(app_id: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(app_id.to_string()))),
        }
    }
}

impl AppIdStore for MemoryStore {
    fn load_app_id(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save_app_id(&mut self, app_id: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(app_id.to_string());
        Ok(())
    }
}
