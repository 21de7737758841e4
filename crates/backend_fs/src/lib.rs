use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use config::{ConfigStore, LocalStorage};
use core_types::{AppSettings, BgType, GameConfig, GameInfo, LauncherBackend};
use tracing::{debug, info};

mod error;
mod game_config;
mod scan;

pub use error::BackendError;
pub use game_config::{game_dir, load_game_config, save_game_config, set_game_background};
pub use scan::scan_games_dir;

/// Key the settings record is stored under in [`LocalStorage`].
pub const LOCAL_SETTINGS_KEY: &str = "ssmt4-settings";

/// Settings in `settings.json`, games from a directory of game folders.
pub struct FsBackend {
    config: ConfigStore,
    games_dir: PathBuf,
}

impl FsBackend {
    pub fn new(config: ConfigStore, games_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            games_dir: games_dir.into(),
        }
    }

    pub fn games_dir(&self) -> &Path {
        &self.games_dir
    }
}

#[async_trait]
impl LauncherBackend for FsBackend {
    async fn load_settings(&self) -> Result<AppSettings> {
        self.config.load()
    }

    async fn save_settings(&self, config: &AppSettings) -> Result<()> {
        debug!(path = %self.config.path().display(), "saving settings");
        self.config.save(config)
    }

    async fn scan_games(&self) -> Result<Vec<GameInfo>> {
        let games_dir = self.games_dir.clone();
        info!(dir = %games_dir.display(), "scanning games");
        let games = tokio::task::spawn_blocking(move || scan_games_dir(&games_dir))
            .await
            .map_err(BackendError::from)??;
        Ok(games)
    }

    async fn load_game_config(&self, game: &str) -> Result<GameConfig> {
        let (games_dir, game) = (self.games_dir.clone(), game.to_string());
        let config = tokio::task::spawn_blocking(move || load_game_config(&games_dir, &game))
            .await
            .map_err(BackendError::from)??;
        Ok(config)
    }

    async fn save_game_config(&self, game: &str, config: &GameConfig) -> Result<()> {
        let (games_dir, game, config) = (self.games_dir.clone(), game.to_string(), config.clone());
        tokio::task::spawn_blocking(move || save_game_config(&games_dir, &game, &config))
            .await
            .map_err(BackendError::from)??;
        Ok(())
    }

    async fn set_game_background(&self, game: &str, source: &Path, kind: BgType) -> Result<()> {
        let (games_dir, game, source) =
            (self.games_dir.clone(), game.to_string(), source.to_path_buf());
        tokio::task::spawn_blocking(move || set_game_background(&games_dir, &game, &source, kind))
            .await
            .map_err(BackendError::from)??;
        Ok(())
    }
}

/// Settings mirrored in local storage under [`LOCAL_SETTINGS_KEY`]; no games.
///
/// Used when no native settings file is wanted. Stored records are merged
/// over the defaults on load.
pub struct LocalStorageBackend {
    storage: LocalStorage,
}

impl LocalStorageBackend {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl LauncherBackend for LocalStorageBackend {
    async fn load_settings(&self) -> Result<AppSettings> {
        let saved = self
            .storage
            .get_json::<AppSettings>(LOCAL_SETTINGS_KEY)
            .context("failed to read settings from local storage")?;
        Ok(saved.unwrap_or_default())
    }

    async fn save_settings(&self, config: &AppSettings) -> Result<()> {
        self.storage.set_json(LOCAL_SETTINGS_KEY, config)
    }

    async fn scan_games(&self) -> Result<Vec<GameInfo>> {
        Ok(Vec::new())
    }

    async fn load_game_config(&self, _game: &str) -> Result<GameConfig> {
        Ok(GameConfig::default())
    }

    async fn save_game_config(&self, game: &str, _config: &GameConfig) -> Result<()> {
        bail!("local storage backend has no games directory to save `{game}` into")
    }

    async fn set_game_background(&self, game: &str, _source: &Path, _kind: BgType) -> Result<()> {
        bail!("local storage backend has no games directory to store `{game}` artwork in")
    }
}
