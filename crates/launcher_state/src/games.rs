use std::sync::Arc;

use chrono::Utc;
use core_types::{GameInfo, LauncherBackend, PathConverter};
use parking_lot::RwLock;
use tracing::{error, info};

use crate::error::SyncError;

#[derive(Default)]
struct Catalog {
    games: Vec<GameInfo>,
    scanned_at: Option<i64>,
}

/// Ordered list of scanned games, replaced wholesale by every successful scan.
pub struct GameRegistry {
    backend: Arc<dyn LauncherBackend>,
    converter: Arc<dyn PathConverter>,
    catalog: RwLock<Catalog>,
}

impl GameRegistry {
    pub fn new(backend: Arc<dyn LauncherBackend>, converter: Arc<dyn PathConverter>) -> Self {
        Self {
            backend,
            converter,
            catalog: RwLock::new(Catalog::default()),
        }
    }

    pub async fn scan(&self) -> Result<usize, SyncError> {
        self.scan_at(Utc::now().timestamp_millis()).await
    }

    /// Scans with `timestamp` as the cache-busting value for every path.
    ///
    /// A failed scan leaves the previous games in place.
    pub async fn scan_at(&self, timestamp: i64) -> Result<usize, SyncError> {
        let scanned = match self.backend.scan_games().await {
            Ok(games) => games,
            Err(err) => {
                error!(error = %format!("{err:#}"), "failed to scan games");
                return Err(SyncError::Scan(err));
            }
        };

        let games: Vec<GameInfo> = scanned
            .into_iter()
            .map(|game| normalize_game(game, self.converter.as_ref(), timestamp))
            .collect();
        let count = games.len();

        *self.catalog.write() = Catalog {
            games,
            scanned_at: Some(timestamp),
        };
        info!(count, timestamp, "game registry refreshed");
        Ok(count)
    }

    pub fn games(&self) -> Vec<GameInfo> {
        self.catalog.read().games.clone()
    }

    /// First game named `name`, in scan order.
    pub fn find(&self, name: &str) -> Option<GameInfo> {
        self.catalog
            .read()
            .games
            .iter()
            .find(|game| game.name == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.catalog.read().games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.read().games.is_empty()
    }

    pub fn last_scan_at(&self) -> Option<i64> {
        self.catalog.read().scanned_at
    }
}

/// Rewrites the native artwork paths of `game` into cache-busted URIs.
pub fn normalize_game(
    mut game: GameInfo,
    converter: &dyn PathConverter,
    timestamp: i64,
) -> GameInfo {
    game.icon_path = resolve(&game.icon_path, converter, timestamp);
    game.bg_path = resolve(&game.bg_path, converter, timestamp);
    game.bg_video_path = game
        .bg_video_path
        .filter(|path| !path.is_empty())
        .map(|path| resolve(&path, converter, timestamp));
    game
}

fn resolve(path: &str, converter: &dyn PathConverter, timestamp: i64) -> String {
    if path.is_empty() {
        return String::new();
    }
    cache_bust(&converter.convert(path), timestamp)
}

pub fn cache_bust(uri: &str, timestamp: i64) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}t={timestamp}")
}
