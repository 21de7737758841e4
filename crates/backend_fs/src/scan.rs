use std::fs;
use std::path::Path;

use core_types::{GameBasicConfig, GameConfig, GameInfo};
use tracing::{debug, warn};

use crate::error::{BackendError, Result};
use crate::game_config::{GAME_CONFIG_FILE, IMAGE_BACKGROUNDS, VIDEO_BACKGROUNDS};

const ICON_FILE: &str = "Icon.png";

/// Lists one game per sub-directory of `games_dir`, sorted by name.
///
/// Icon and image paths are reported even when the files are missing; the
/// view layer copes with broken images. `Background.png` is assumed when no
/// image background exists.
pub fn scan_games_dir(games_dir: &Path) -> Result<Vec<GameInfo>> {
    if !games_dir.is_dir() {
        return Err(BackendError::GamesDirMissing(games_dir.to_path_buf()));
    }

    let mut games = Vec::new();
    for entry in fs::read_dir(games_dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(err) => {
                warn!(error = %err, "skipping unreadable games dir entry");
                continue;
            }
        };
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let basic = read_game_config(&path.join(GAME_CONFIG_FILE));
        let bg_path = first_existing(&path, IMAGE_BACKGROUNDS)
            .unwrap_or_else(|| path.join(IMAGE_BACKGROUNDS[0]).to_string_lossy().into_owned());
        let bg_video_path = first_existing(&path, VIDEO_BACKGROUNDS);

        games.push(GameInfo {
            name: name.to_string(),
            icon_path: path.join(ICON_FILE).to_string_lossy().into_owned(),
            bg_path,
            bg_video_path,
            bg_type: basic.background_type,
            show_sidebar: basic.show_sidebar,
        });
    }

    games.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = games.len(), dir = %games_dir.display(), "scanned games");
    Ok(games)
}

fn first_existing(dir: &Path, files: &[&str]) -> Option<String> {
    files
        .iter()
        .map(|file| dir.join(file))
        .find(|candidate| candidate.is_file())
        .map(|candidate| candidate.to_string_lossy().into_owned())
}

fn read_game_config(path: &Path) -> GameBasicConfig {
    let Ok(raw) = fs::read_to_string(path) else {
        return GameBasicConfig::default();
    };
    match serde_json::from_str::<GameConfig>(&raw) {
        Ok(config) => config.basic,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "invalid game config, using defaults");
            GameBasicConfig::default()
        }
    }
}
