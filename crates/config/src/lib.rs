use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use core_types::AppSettings;
use tracing::{info, warn};

mod local_storage;

pub use local_storage::LocalStorage;

pub const APP_DIR_NAME: &str = "ssmt4";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const CACHE_DIR_NAME: &str = "SSMT4CachedFolder";

pub struct ConfigStore {
    path: PathBuf,
    cache_root: Option<PathBuf>,
}

impl ConfigStore {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(SETTINGS_FILE_NAME),
            cache_root: dirs::data_local_dir(),
        }
    }

    pub fn from_default_location() -> Result<Self> {
        let mut dir = dirs::config_dir().context("failed to resolve config_dir")?;
        dir.push(APP_DIR_NAME);
        Ok(Self::from_dir(dir))
    }

    /// Directory under which an empty `cache_dir` gets its default folder.
    pub fn with_cache_root(mut self, root: Option<PathBuf>) -> Self {
        self.cache_root = root;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings file, falling back to defaults when it is missing
    /// or unparsable. Only I/O failures are errors.
    pub fn load(&self) -> Result<AppSettings> {
        let mut config = if self.path.exists() {
            info!(path = %self.path.display(), "loading settings");
            let raw = fs::read_to_string(&self.path)
                .with_context(|| format!("failed to read {}", self.path.display()))?;
            match serde_json::from_str::<AppSettings>(&raw) {
                Ok(config) => config,
                Err(err) => {
                    warn!(error = %err, "failed to parse settings, using defaults");
                    AppSettings::default()
                }
            }
        } else {
            info!(path = %self.path.display(), "settings file missing, using defaults");
            AppSettings::default()
        };

        if self.ensure_cache_dir(&mut config)? {
            self.save(&config)?;
        }
        Ok(config)
    }

    pub fn save(&self, config: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let text = serde_json::to_string_pretty(config).context("failed to serialize settings")?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    fn ensure_cache_dir(&self, config: &mut AppSettings) -> Result<bool> {
        if !config.cache_dir.is_empty() {
            return Ok(false);
        }
        let Some(root) = self.cache_root.as_ref() else {
            return Ok(false);
        };

        let cache_dir = root.join(CACHE_DIR_NAME);
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("failed to create {}", cache_dir.display()))?;
        config.cache_dir = cache_dir.to_string_lossy().into_owned();
        info!(cache_dir = %config.cache_dir, "initialized cache dir");
        Ok(true)
    }
}
