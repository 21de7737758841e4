use thiserror::Error;

/// Failures of the calls into the backend bridge, keyed by the call that produced them.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to load settings: {0:#}")]
    Load(anyhow::Error),

    #[error("failed to save settings: {0:#}")]
    Save(anyhow::Error),

    #[error("failed to scan games: {0:#}")]
    Scan(anyhow::Error),

    #[error("failed to update config of game `{game}`: {error:#}")]
    GameConfig { game: String, error: anyhow::Error },
}
