use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use core_types::{
    AppSettings, BgType, DialogKind, GameConfig, GameInfo, LauncherBackend, Notifier,
    PathConverter,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub(crate) struct FakeBackend {
    load: Mutex<Result<AppSettings, String>>,
    load_gate: Option<Arc<Notify>>,
    scan: Mutex<Result<Vec<GameInfo>, String>>,
    saves: Mutex<Vec<AppSettings>>,
    fail_saves: AtomicBool,
    game_configs: Mutex<BTreeMap<String, GameConfig>>,
}

impl FakeBackend {
    pub(crate) fn with_settings(settings: AppSettings) -> Self {
        Self {
            load: Mutex::new(Ok(settings)),
            load_gate: None,
            scan: Mutex::new(Ok(Vec::new())),
            saves: Mutex::new(Vec::new()),
            fail_saves: AtomicBool::new(false),
            game_configs: Mutex::new(BTreeMap::new()),
        }
    }

    pub(crate) fn failing_load(message: &str) -> Self {
        let backend = Self::with_settings(AppSettings::default());
        *backend.load.lock() = Err(message.to_string());
        backend
    }

    pub(crate) fn succeed_load(&self, settings: AppSettings) {
        *self.load.lock() = Ok(settings);
    }

    /// `load_settings` waits for one notification before answering.
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.load_gate = Some(gate);
        self
    }

    pub(crate) fn with_games(self, games: Vec<GameInfo>) -> Self {
        self.set_games(games);
        self
    }

    pub(crate) fn set_games(&self, games: Vec<GameInfo>) {
        *self.scan.lock() = Ok(games);
    }

    pub(crate) fn fail_scans(&self, message: &str) {
        *self.scan.lock() = Err(message.to_string());
    }

    pub(crate) fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn saves(&self) -> Vec<AppSettings> {
        self.saves.lock().clone()
    }

    pub(crate) fn game_config(&self, game: &str) -> Option<GameConfig> {
        self.game_configs.lock().get(game).cloned()
    }

    /// Mirrors what a rescan of the games directory would report.
    fn update_scanned(&self, game: &str, f: impl FnOnce(&mut GameInfo)) {
        if let Ok(games) = self.scan.lock().as_mut() {
            if let Some(info) = games.iter_mut().find(|info| info.name == game) {
                f(info);
            }
        }
    }
}

#[async_trait]
impl LauncherBackend for FakeBackend {
    async fn load_settings(&self) -> Result<AppSettings> {
        if let Some(gate) = self.load_gate.as_ref() {
            gate.notified().await;
        }
        self.load.lock().clone().map_err(|message| anyhow!(message))
    }

    async fn save_settings(&self, config: &AppSettings) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(anyhow!("disk full"));
        }
        self.saves.lock().push(config.clone());
        Ok(())
    }

    async fn scan_games(&self) -> Result<Vec<GameInfo>> {
        self.scan.lock().clone().map_err(|message| anyhow!(message))
    }

    async fn load_game_config(&self, game: &str) -> Result<GameConfig> {
        Ok(self.game_config(game).unwrap_or_default())
    }

    async fn save_game_config(&self, game: &str, config: &GameConfig) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            bail!("disk full");
        }
        self.game_configs
            .lock()
            .insert(game.to_string(), config.clone());
        let kind = config.basic.background_type;
        self.update_scanned(game, |info| info.bg_type = kind);
        Ok(())
    }

    async fn set_game_background(&self, game: &str, source: &Path, kind: BgType) -> Result<()> {
        let mut config = self.load_game_config(game).await?;
        config.basic.background_type = kind;
        self.save_game_config(game, &config).await?;
        let path = source.to_string_lossy().into_owned();
        self.update_scanned(game, |info| match kind {
            BgType::Image => info.bg_path = path,
            BgType::Video => info.bg_video_path = Some(path),
        });
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    dialogs: Mutex<Vec<(String, String, DialogKind)>>,
}

impl RecordingNotifier {
    pub(crate) fn dialogs(&self) -> Vec<(String, String, DialogKind)> {
        self.dialogs.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, title: &str, message: &str, kind: DialogKind) {
        self.dialogs
            .lock()
            .push((title.to_string(), message.to_string(), kind));
    }
}

/// Marks converted paths with an `asset://` prefix.
pub(crate) struct PrefixConverter;

impl PathConverter for PrefixConverter {
    fn convert(&self, native_path: &str) -> String {
        format!("asset://{native_path}")
    }
}
