//! State layer of the launcher: settings synchronized with the backend,
//! the scanned game registry, and transient view flags.

mod assets;
mod error;
mod games;
mod launcher;
mod selection;
mod settings;
mod ui;

#[cfg(test)]
mod testing;

pub use assets::AssetUrlConverter;
pub use error::SyncError;
pub use games::{GameRegistry, cache_bust, normalize_game};
pub use launcher::{Launcher, StartupReport};
pub use selection::apply_selection;
pub use settings::{Phase, SettingsStore, UpdateOutcome};
pub use ui::UiFlags;
