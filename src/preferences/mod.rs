//! Preferences Module
//!
//! User favorites and display settings, persisted in the same key-value
//! store as the cache but outside the `cache_` prefix.

mod favorites;
mod settings;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use settings::{AppSettings, FontSize, SettingsStore, SettingsUpdate, ThemeMode, SETTINGS_KEY};
