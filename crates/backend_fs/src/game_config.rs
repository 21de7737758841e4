use std::fs;
use std::path::{Path, PathBuf};

use core_types::{BgType, GameConfig};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{BackendError, Result};

pub(crate) const GAME_CONFIG_FILE: &str = "Config.json";
pub(crate) const IMAGE_BACKGROUNDS: &[&str] = &[
    "Background.png",
    "Background.webp",
    "Background.jpg",
    "Background.jpeg",
];
pub(crate) const VIDEO_BACKGROUNDS: &[&str] =
    &["Background.webm", "Background.mp4", "Background.mkv"];

fn background_files(kind: BgType) -> &'static [&'static str] {
    match kind {
        BgType::Image => IMAGE_BACKGROUNDS,
        BgType::Video => VIDEO_BACKGROUNDS,
    }
}

/// Directory of the game called `game`, refusing names that would leave `games_dir`.
pub fn game_dir(games_dir: &Path, game: &str) -> Result<PathBuf> {
    let plain = !game.is_empty()
        && game != "."
        && game != ".."
        && !game.contains(['/', '\\']);
    if !plain {
        return Err(BackendError::InvalidGameName(game.to_string()));
    }
    Ok(games_dir.join(game))
}

/// Reads `Config.json` of `game`; a missing file yields the defaults.
pub fn load_game_config(games_dir: &Path, game: &str) -> Result<GameConfig> {
    let path = game_dir(games_dir, game)?.join(GAME_CONFIG_FILE);
    if !path.is_file() {
        debug!(game, "no game config, using defaults");
        return Ok(GameConfig::default());
    }
    let raw = fs::read_to_string(&path)?;
    serde_json::from_str(&raw).map_err(|source| BackendError::InvalidGameConfig { path, source })
}

/// Writes the `basic` section of `config`, creating the game directory when
/// needed. Other sections already in the file are kept.
pub fn save_game_config(games_dir: &Path, game: &str, config: &GameConfig) -> Result<()> {
    let dir = game_dir(games_dir, game)?;
    fs::create_dir_all(&dir)?;
    let path = dir.join(GAME_CONFIG_FILE);

    let mut root = read_object(&path);
    let basic = match serde_json::to_value(&config.basic)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    let section = root
        .entry("basic")
        .or_insert_with(|| Value::Object(Map::new()));
    match section {
        Value::Object(existing) => existing.extend(basic),
        other => *other = Value::Object(basic),
    }

    fs::write(&path, serde_json::to_string_pretty(&Value::Object(root))?)?;
    debug!(game, path = %path.display(), "game config saved");
    Ok(())
}

fn read_object(path: &Path) -> Map<String, Value> {
    let Ok(raw) = fs::read_to_string(path) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(root)) => root,
        _ => {
            warn!(path = %path.display(), "replacing unreadable game config");
            Map::new()
        }
    }
}

/// Copies `source` into the game directory as its `kind` background and
/// records `kind` in the game config.
///
/// Earlier backgrounds of the same kind are removed first so the scanner
/// never picks up a stale file. Returns the path of the new file.
pub fn set_game_background(
    games_dir: &Path,
    game: &str,
    source: &Path,
    kind: BgType,
) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(BackendError::SourceMissing(source.to_path_buf()));
    }
    let dir = game_dir(games_dir, game)?;
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let target_name = format!("Background.{extension}");
    let candidates = background_files(kind);
    if !candidates.contains(&target_name.as_str()) {
        return Err(BackendError::UnsupportedBackground {
            kind: match kind {
                BgType::Image => "image",
                BgType::Video => "video",
            },
            path: source.to_path_buf(),
        });
    }

    fs::create_dir_all(&dir)?;
    for candidate in candidates {
        let stale = dir.join(candidate);
        if stale.is_file() {
            if let Err(err) = fs::remove_file(&stale) {
                warn!(path = %stale.display(), error = %err, "failed to remove old background");
            }
        }
    }
    let target = dir.join(&target_name);
    fs::copy(source, &target)?;

    let mut config = match load_game_config(games_dir, game) {
        Ok(config) => config,
        Err(err) => {
            warn!(game, error = %err, "rewriting unreadable game config");
            GameConfig::default()
        }
    };
    config.basic.background_type = kind;
    save_game_config(games_dir, game, &config)?;
    info!(game, ?kind, path = %target.display(), "game background replaced");
    Ok(target)
}
