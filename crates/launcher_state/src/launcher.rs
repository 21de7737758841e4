use std::path::Path;
use std::sync::Arc;

use core_types::{AppRoute, BgType, GameConfig, LauncherBackend, Notifier, PathConverter, ROUTES};
use tracing::{debug, info};

use crate::error::SyncError;
use crate::games::GameRegistry;
use crate::settings::{SettingsStore, UpdateOutcome};
use crate::ui::UiFlags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub settings_loaded: bool,
    /// Number of games found, `None` when the scan failed.
    pub games: Option<usize>,
    /// Outcome of re-applying the selected game, `None` when it is not in the registry.
    pub selection: Option<UpdateOutcome>,
}

/// Owns the application state and wires the stores to the backend.
pub struct Launcher {
    backend: Arc<dyn LauncherBackend>,
    settings: Arc<SettingsStore>,
    games: Arc<GameRegistry>,
    ui: UiFlags,
}

impl Launcher {
    pub fn new(
        backend: Arc<dyn LauncherBackend>,
        converter: Arc<dyn PathConverter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings: Arc::new(SettingsStore::new(backend.clone(), notifier)),
            games: Arc::new(GameRegistry::new(backend.clone(), converter)),
            backend,
            ui: UiFlags::default(),
        }
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn games(&self) -> &Arc<GameRegistry> {
        &self.games
    }

    pub fn ui(&self) -> &UiFlags {
        &self.ui
    }

    /// Loads settings and scans games concurrently, then re-applies the
    /// selected game once both are done. A failed load skips the re-apply.
    pub async fn start(&self) -> StartupReport {
        let (loaded, scanned) = tokio::join!(self.settings.initialize(), self.games.scan());
        let selection = if loaded.is_ok() {
            self.reapply_selection().await
        } else {
            None
        };

        let report = StartupReport {
            settings_loaded: loaded.is_ok(),
            games: scanned.ok(),
            selection,
        };
        info!(?report, "launcher started");
        report
    }

    pub async fn refresh_games(&self) -> Result<usize, SyncError> {
        let count = self.games.scan().await?;
        self.reapply_selection().await;
        Ok(count)
    }

    /// Selects the game named `name`; `None` when no such game is registered.
    pub async fn select_game(&self, name: &str) -> Option<UpdateOutcome> {
        let game = self.games.find(name)?;
        Some(self.settings.select_game(&game).await)
    }

    /// Projects the currently selected game's background again, if settings
    /// are loaded and the game is still registered. Settings are untouched
    /// otherwise.
    pub async fn reapply_selection(&self) -> Option<UpdateOutcome> {
        if !self.settings.is_ready() {
            debug!(
                phase = ?self.settings.phase(),
                "settings not loaded, selection not re-applied"
            );
            return None;
        }
        let name = self
            .settings
            .read(|settings| settings.current_config_name.clone());
        let Some(game) = self.games.find(&name) else {
            debug!(config = %name, "selected game not in registry");
            return None;
        };
        Some(self.settings.select_game(&game).await)
    }

    pub async fn game_config(&self, game: &str) -> Result<GameConfig, SyncError> {
        self.backend
            .load_game_config(game)
            .await
            .map_err(|error| game_config_error(game, error))
    }

    /// Stores `kind` as the preferred background of `game`, then rescans so
    /// the registry and the selected background pick it up.
    pub async fn set_game_background_type(
        &self,
        game: &str,
        kind: BgType,
    ) -> Result<usize, SyncError> {
        let mut config = self.game_config(game).await?;
        config.basic.background_type = kind;
        self.backend
            .save_game_config(game, &config)
            .await
            .map_err(|error| game_config_error(game, error))?;
        info!(game, ?kind, "game background type changed");
        self.refresh_games().await
    }

    /// Imports `source` as the `kind` background of `game`, then rescans.
    pub async fn set_game_background(
        &self,
        game: &str,
        source: &Path,
        kind: BgType,
    ) -> Result<usize, SyncError> {
        self.backend
            .set_game_background(game, source, kind)
            .await
            .map_err(|error| game_config_error(game, error))?;
        self.refresh_games().await
    }

    pub fn visible_routes(&self) -> Vec<AppRoute> {
        self.settings.read(|settings| {
            ROUTES
                .iter()
                .copied()
                .filter(|route| route.is_visible(settings))
                .collect()
        })
    }
}

fn game_config_error(game: &str, error: anyhow::Error) -> SyncError {
    SyncError::GameConfig {
        game: game.to_string(),
        error,
    }
}
