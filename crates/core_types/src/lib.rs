use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod route;

pub use route::{AppRoute, ROUTES};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BgType {
    #[default]
    Image,
    Video,
}

impl BgType {
    /// Reads the free-form `backgroundType` of a per-game config.
    ///
    /// Only `video` (any case) selects a video; everything else is an image.
    pub fn from_config_value(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("video") {
            BgType::Video
        } else {
            BgType::Image
        }
    }
}

fn lenient_bg_type<'de, D>(deserializer: D) -> std::result::Result<BgType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(BgType::from_config_value(&raw))
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Zhs,
    Zht,
}

#[derive(Debug, Error)]
#[error("unknown locale `{0}`")]
pub struct UnknownLocale(pub String);

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zhs => "zhs",
            Locale::Zht => "zht",
        }
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "zhs" => Ok(Locale::Zhs),
            "zht" => Ok(Locale::Zht),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The persisted UI configuration record.
///
/// Missing fields deserialize to their defaults, so an older or partial
/// record is merged over [`AppSettings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub bg_type: BgType,
    pub bg_image: String,
    pub bg_video: String,
    pub sidebar_opacity: f64,
    pub sidebar_blur: f64,
    pub content_opacity: f64,
    pub content_blur: f64,
    pub cache_dir: String,
    pub current_config_name: String,
    pub window_width: f64,
    pub window_height: f64,
    pub github_token: String,
    pub show_workbench: bool,
    pub show_stickers: bool,
    pub show_websites: bool,
    pub show_documents: bool,
    pub locale: Locale,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bg_type: BgType::Image,
            bg_image: String::new(),
            bg_video: String::new(),
            sidebar_opacity: 0.3,
            sidebar_blur: 20.0,
            content_opacity: 0.0,
            content_blur: 0.0,
            cache_dir: String::new(),
            current_config_name: "Default".to_string(),
            window_width: 1000.0,
            window_height: 600.0,
            github_token: String::new(),
            show_workbench: false,
            show_stickers: false,
            show_websites: false,
            show_documents: false,
            locale: Locale::default(),
        }
    }
}

impl AppSettings {
    /// The background field selected by `bg_type`. The other one is kept but inert.
    pub fn active_background(&self) -> &str {
        match self.bg_type {
            BgType::Image => &self.bg_image,
            BgType::Video => &self.bg_video,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub name: String,
    #[serde(default)]
    pub icon_path: String,
    #[serde(default)]
    pub bg_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_video_path: Option<String>,
    #[serde(default)]
    pub bg_type: BgType,
    #[serde(default = "default_show_sidebar")]
    pub show_sidebar: bool,
}

const fn default_show_sidebar() -> bool {
    true
}

impl GameInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_path: String::new(),
            bg_path: String::new(),
            bg_video_path: None,
            bg_type: BgType::Image,
            show_sidebar: true,
        }
    }

    /// Video path when it is present and non-empty.
    pub fn video_path(&self) -> Option<&str> {
        self.bg_video_path
            .as_deref()
            .filter(|path| !path.is_empty())
    }
}

/// Per-game preferences kept in `Games/<name>/Config.json`.
///
/// Only the `basic` section is modelled; backends keep any other section
/// of the file as they found it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub basic: GameBasicConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameBasicConfig {
    pub game_preset: String,
    #[serde(deserialize_with = "lenient_bg_type")]
    pub background_type: BgType,
    pub show_sidebar: bool,
}

impl Default for GameBasicConfig {
    fn default() -> Self {
        Self {
            game_preset: "Default".to_string(),
            background_type: BgType::Image,
            show_sidebar: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

/// Calls into the native side that owns persistence and file-system scanning.
#[async_trait]
pub trait LauncherBackend: Send + Sync {
    async fn load_settings(&self) -> Result<AppSettings>;
    async fn save_settings(&self, config: &AppSettings) -> Result<()>;
    async fn scan_games(&self) -> Result<Vec<GameInfo>>;

    /// The game's config, or the defaults when it has none yet.
    async fn load_game_config(&self, game: &str) -> Result<GameConfig>;
    async fn save_game_config(&self, game: &str, config: &GameConfig) -> Result<()>;
    /// Copies `source` in as the game's `kind` background and records `kind`
    /// as the game's preferred background.
    async fn set_game_background(&self, game: &str, source: &Path, kind: BgType) -> Result<()>;
}

/// Turns a native file-system path into a URI the view layer can fetch.
pub trait PathConverter: Send + Sync {
    fn convert(&self, native_path: &str) -> String;
}

/// User-facing modal surface.
pub trait Notifier: Send + Sync {
    fn show(&self, title: &str, message: &str, kind: DialogKind);
}
