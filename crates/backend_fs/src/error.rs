use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("games directory not found at {}", .0.display())]
    GamesDirMissing(PathBuf),

    #[error("invalid game name `{0}`")]
    InvalidGameName(String),

    #[error("background source not found at {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("unsupported {kind} background file {}", .path.display())]
    UnsupportedBackground { kind: &'static str, path: PathBuf },

    #[error("game config {} is not valid JSON: {source}", .path.display())]
    InvalidGameConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;
