use std::env;
use std::sync::Arc;
use std::{fs, path::Path, path::PathBuf};

use anyhow::Result;
use backend_fs::{FsBackend, LocalStorageBackend};
use config::{APP_DIR_NAME, ConfigStore, LocalStorage};
use core_types::{DialogKind, LauncherBackend, Notifier};
use i18n::I18n;
use launcher_state::{AssetUrlConverter, Launcher};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const GAMES_DIR_ENV: &str = "SSMT4_GAMES_DIR";

/// Without a window to host a modal, dialogs go to the log and stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show(&self, title: &str, message: &str, kind: DialogKind) {
        match kind {
            DialogKind::Error => error!(title, message, "dialog"),
            DialogKind::Warning => warn!(title, message, "dialog"),
            DialogKind::Info => info!(title, message, "dialog"),
        }
        eprintln!("[{title}] {message}");
    }
}

fn main() {
    let mut data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    data_dir.push(APP_DIR_NAME);
    if let Err(err) = fs::create_dir_all(&data_dir) {
        eprintln!("failed to prepare data dir: {err}");
    }
    let _log_guard = init_local_logger(&data_dir.join("logs"));

    let backend = match build_backend(&data_dir) {
        Ok(backend) => backend,
        Err(err) => {
            error!("failed to set up backend: {err:#}");
            eprintln!("failed to set up backend: {err:#}");
            return;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to create tokio runtime: {err}");
            return;
        }
    };

    let launcher = Launcher::new(
        backend,
        Arc::new(AssetUrlConverter::for_current_platform()),
        Arc::new(ConsoleNotifier),
    );
    let report = runtime.block_on(launcher.start());
    if report.games.is_none() {
        eprintln!("game scan failed, see logs in {}", data_dir.join("logs").display());
    }

    print_summary(&launcher);
}

fn build_backend(data_dir: &Path) -> Result<Arc<dyn LauncherBackend>> {
    if env::args().skip(1).any(|arg| arg == "--local") {
        info!("using local storage backend");
        let storage = LocalStorage::from_dir(data_dir);
        return Ok(Arc::new(LocalStorageBackend::new(storage)));
    }

    let config = ConfigStore::from_default_location()?;
    let games_dir = env::var_os(GAMES_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("Games"));
    info!(
        settings = %config.path().display(),
        games = %games_dir.display(),
        "using file system backend"
    );
    Ok(Arc::new(FsBackend::new(config, games_dir)))
}

fn print_summary(launcher: &Launcher) {
    let settings = launcher.settings().snapshot();
    let i18n = I18n::new(settings.locale);

    let nav: Vec<&str> = launcher
        .visible_routes()
        .into_iter()
        .map(|route| i18n.t(route.i18n_key()))
        .collect();
    println!("{}", nav.join(" | "));
    println!(
        "{} ({:?}): {}",
        settings.current_config_name,
        settings.bg_type,
        settings.active_background()
    );

    for game in launcher.games().games() {
        let marker = if game.name == settings.current_config_name {
            '*'
        } else {
            ' '
        };
        println!("{marker} {}", game.name);
    }
}

fn init_local_logger(log_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    if let Err(err) = fs::create_dir_all(log_dir) {
        eprintln!("failed to create log dir `{}`: {err}", log_dir.display());
    }
    let file_appender = tracing_appender::rolling::daily(log_dir, "ssmt4.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,app_desktop=debug,launcher_state=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_writer(writer)
        .init();

    guard
}
