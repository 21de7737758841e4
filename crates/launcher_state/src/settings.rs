use std::sync::Arc;

use core_types::{AppSettings, DialogKind, GameInfo, LauncherBackend, Locale, Notifier};
use i18n::I18n;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::SyncError;
use crate::selection::apply_selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial load has not finished; changes are kept in memory only.
    Loading,
    /// Every change is persisted.
    Ready,
    /// Initial load failed; the defaults in memory must not replace what is persisted.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    NotReady,
    Unchanged,
    Saved,
    SaveFailed,
}

struct Inner {
    settings: AppSettings,
    phase: Phase,
}

pub struct SettingsStore {
    backend: Arc<dyn LauncherBackend>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<Inner>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn LauncherBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            inner: Mutex::new(Inner {
                settings: AppSettings::default(),
                phase: Phase::Loading,
            }),
        }
    }

    /// Loads the persisted record and enables saving.
    ///
    /// The loaded record is installed and the phase flipped in one critical
    /// section, so the load itself never produces a save. On failure the
    /// defaults stay in memory, saving stays off, and the user gets a single
    /// error dialog. A later successful call enables saving.
    pub async fn initialize(&self) -> Result<(), SyncError> {
        match self.backend.load_settings().await {
            Ok(loaded) => {
                let mut inner = self.inner.lock();
                inner.settings = loaded;
                inner.phase = Phase::Ready;
                info!(
                    config = %inner.settings.current_config_name,
                    locale = %inner.settings.locale,
                    "settings loaded"
                );
                Ok(())
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "failed to load settings");
                let locale = {
                    let mut inner = self.inner.lock();
                    inner.phase = Phase::Failed;
                    inner.settings.locale
                };
                self.show_load_error(locale, &format!("{err:#}"));
                Err(SyncError::Load(err))
            }
        }
    }

    fn show_load_error(&self, locale: Locale, detail: &str) {
        let i18n = I18n::new(locale);
        let message = i18n.format("settings.load_failed", &[("detail", detail)]);
        self.notifier
            .show(i18n.t("dialog.error.title"), &message, DialogKind::Error);
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Ready
    }

    pub fn snapshot(&self) -> AppSettings {
        self.inner.lock().settings.clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppSettings) -> R) -> R {
        f(&self.inner.lock().settings)
    }

    pub fn locale(&self) -> Locale {
        self.inner.lock().settings.locale
    }

    /// Applies one logical change and persists the full record once.
    ///
    /// Nothing is saved unless the initial load succeeded, nor when `f`
    /// leaves the record as it was.
    pub async fn update<F>(&self, f: F) -> UpdateOutcome
    where
        F: FnOnce(&mut AppSettings) + Send,
    {
        let snapshot = {
            let mut inner = self.inner.lock();
            let before = inner.settings.clone();
            f(&mut inner.settings);
            if inner.phase != Phase::Ready {
                debug!(
                    phase = ?inner.phase,
                    "settings changed before a successful load, not saving"
                );
                return UpdateOutcome::NotReady;
            }
            if inner.settings == before {
                return UpdateOutcome::Unchanged;
            }
            inner.settings.clone()
        };

        self.persist_logged(&snapshot).await
    }

    /// Projects `game`'s background into the settings as a single change.
    pub async fn select_game(&self, game: &GameInfo) -> UpdateOutcome {
        self.update(|settings| apply_selection(settings, game)).await
    }

    /// Saves the current record without change detection. Still a no-op
    /// until the initial load has succeeded.
    pub async fn save_now(&self) -> UpdateOutcome {
        let snapshot = {
            let inner = self.inner.lock();
            if inner.phase != Phase::Ready {
                return UpdateOutcome::NotReady;
            }
            inner.settings.clone()
        };
        self.persist_logged(&snapshot).await
    }

    async fn persist_logged(&self, snapshot: &AppSettings) -> UpdateOutcome {
        match self.persist(snapshot).await {
            Ok(()) => UpdateOutcome::Saved,
            Err(err) => {
                warn!(error = %err, "settings change not persisted");
                UpdateOutcome::SaveFailed
            }
        }
    }

    async fn persist(&self, snapshot: &AppSettings) -> Result<(), SyncError> {
        self.backend
            .save_settings(snapshot)
            .await
            .map_err(SyncError::Save)?;
        debug!("settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core_types::BgType;
    use tokio::sync::Notify;

    use super::*;
    use crate::testing::{FakeBackend, RecordingNotifier};

    fn loaded_settings() -> AppSettings {
        AppSettings {
            bg_type: BgType::Video,
            bg_image: "/saved.png".to_string(),
            bg_video: "/saved.webm".to_string(),
            sidebar_opacity: 0.5,
            sidebar_blur: 8.0,
            content_opacity: 0.1,
            content_blur: 2.0,
            cache_dir: "/cache".to_string(),
            current_config_name: "Beta".to_string(),
            github_token: "token".to_string(),
            show_workbench: true,
            show_documents: true,
            locale: Locale::En,
            ..AppSettings::default()
        }
    }

    fn store(backend: &Arc<FakeBackend>, notifier: &Arc<RecordingNotifier>) -> SettingsStore {
        SettingsStore::new(backend.clone(), notifier.clone())
    }

    #[tokio::test]
    async fn successful_load_installs_loaded_record_without_saving() {
        let backend = Arc::new(FakeBackend::with_settings(loaded_settings()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);
        assert_eq!(store.phase(), Phase::Loading);

        store.initialize().await.expect("load");

        assert_eq!(store.snapshot(), loaded_settings());
        assert!(store.is_ready());
        assert!(backend.saves().is_empty());
        assert!(notifier.dialogs().is_empty());
    }

    #[tokio::test]
    async fn failed_load_keeps_defaults_and_shows_one_dialog() {
        let backend = Arc::new(FakeBackend::failing_load("settings.json is locked"));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);

        let err = store.initialize().await.expect_err("load fails");
        assert!(matches!(err, SyncError::Load(_)));

        assert_eq!(store.phase(), Phase::Failed);
        assert_eq!(store.snapshot(), AppSettings::default());
        let dialogs = notifier.dialogs();
        assert_eq!(dialogs.len(), 1);
        let (title, message, kind) = &dialogs[0];
        assert_eq!(title, "错误");
        assert!(message.contains("settings.json is locked"));
        assert_eq!(*kind, DialogKind::Error);
        assert!(backend.saves().is_empty());
    }

    #[tokio::test]
    async fn changes_before_load_are_not_saved() {
        let backend = Arc::new(FakeBackend::with_settings(loaded_settings()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);

        let outcome = store.update(|s| s.sidebar_blur = 1.0).await;
        assert_eq!(outcome, UpdateOutcome::NotReady);
        assert!(backend.saves().is_empty());
    }

    #[tokio::test]
    async fn changes_during_pending_load_are_dropped() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(FakeBackend::with_settings(loaded_settings()).gated(gate.clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(store(&backend, &notifier));

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.initialize().await }
        });
        tokio::task::yield_now().await;

        assert_eq!(
            store.update(|s| s.content_blur = 99.0).await,
            UpdateOutcome::NotReady
        );
        gate.notify_one();
        task.await.expect("join").expect("load");

        assert_eq!(store.snapshot(), loaded_settings());
        assert!(backend.saves().is_empty());
    }

    #[tokio::test]
    async fn each_change_after_load_saves_full_record() {
        let backend = Arc::new(FakeBackend::with_settings(loaded_settings()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);
        store.initialize().await.expect("load");

        assert_eq!(
            store.update(|s| s.sidebar_opacity = 0.9).await,
            UpdateOutcome::Saved
        );
        assert_eq!(
            store.update(|s| s.show_stickers = true).await,
            UpdateOutcome::Saved
        );

        let saves = backend.saves();
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[0].sidebar_opacity, 0.9);
        assert!(!saves[0].show_stickers);
        assert_eq!(saves[1], store.snapshot());
    }

    #[tokio::test]
    async fn unchanged_record_is_not_saved() {
        let backend = Arc::new(FakeBackend::with_settings(loaded_settings()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);
        store.initialize().await.expect("load");

        let outcome = store.update(|s| s.sidebar_blur = 8.0).await;
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert!(backend.saves().is_empty());
    }

    #[tokio::test]
    async fn save_failure_is_reported_without_dialog() {
        let backend = Arc::new(FakeBackend::with_settings(loaded_settings()));
        backend.fail_saves(true);
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);
        store.initialize().await.expect("load");

        let outcome = store.update(|s| s.locale = Locale::Zht).await;
        assert_eq!(outcome, UpdateOutcome::SaveFailed);
        assert_eq!(store.locale(), Locale::Zht);
        assert!(notifier.dialogs().is_empty());
    }

    #[tokio::test]
    async fn selecting_a_game_saves_once() {
        let backend = Arc::new(FakeBackend::with_settings(AppSettings::default()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);
        store.initialize().await.expect("load");

        let game = GameInfo {
            bg_path: "b.png".to_string(),
            bg_video_path: Some("b.webm".to_string()),
            bg_type: BgType::Video,
            ..GameInfo::new("Beta")
        };
        assert_eq!(store.select_game(&game).await, UpdateOutcome::Saved);

        let saves = backend.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].current_config_name, "Beta");
        assert_eq!(saves[0].bg_type, BgType::Video);
        assert_eq!(saves[0].bg_video, "b.webm");
    }

    #[tokio::test]
    async fn changes_after_failed_load_are_not_saved() {
        let backend = Arc::new(FakeBackend::failing_load("pipe closed"));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);
        let _ = store.initialize().await;

        assert_eq!(
            store.update(|s| s.sidebar_blur = 1.0).await,
            UpdateOutcome::NotReady
        );
        assert_eq!(store.save_now().await, UpdateOutcome::NotReady);
        assert!(backend.saves().is_empty());
    }

    #[tokio::test]
    async fn retrying_a_failed_load_enables_saving() {
        let backend = Arc::new(FakeBackend::failing_load("pipe closed"));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);
        let _ = store.initialize().await;

        backend.succeed_load(loaded_settings());
        store.initialize().await.expect("retry");
        assert!(store.is_ready());
        assert_eq!(store.snapshot(), loaded_settings());
        assert_eq!(
            store.update(|s| s.sidebar_blur = 1.0).await,
            UpdateOutcome::Saved
        );
    }

    #[tokio::test]
    async fn save_now_waits_for_load() {
        let backend = Arc::new(FakeBackend::with_settings(loaded_settings()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store(&backend, &notifier);

        assert_eq!(store.save_now().await, UpdateOutcome::NotReady);
        assert!(backend.saves().is_empty());

        store.initialize().await.expect("load");
        assert_eq!(store.save_now().await, UpdateOutcome::Saved);
        assert_eq!(backend.saves(), vec![loaded_settings()]);
    }
}
