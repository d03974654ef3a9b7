//! Settings Store
//!
//! Persists display preferences: quote currency, font size, theme and the
//! default category filter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::error;

use crate::error::StorageError;
use crate::market::Currency;
use crate::storage::KeyValueStore;

/// Backing-store key of the settings record
pub const SETTINGS_KEY: &str = "@cryptotracker_settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

/// User display preferences.
///
/// Stored fields override defaults; missing fields fall back to them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub currency: Currency,
    pub font_size: FontSize,
    pub theme: ThemeMode,
    /// Category id applied when a list request names none
    pub default_category: String,
}

/// Partial settings change; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub currency: Option<Currency>,
    pub font_size: Option<FontSize>,
    pub theme: Option<ThemeMode>,
    pub default_category: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.currency.is_none()
            && self.font_size.is_none()
            && self.theme.is_none()
            && self.default_category.is_none()
    }
}

impl AppSettings {
    /// Returns a copy with `update` applied.
    pub fn merged(&self, update: SettingsUpdate) -> Self {
        Self {
            currency: update.currency.unwrap_or(self.currency),
            font_size: update.font_size.unwrap_or(self.font_size),
            theme: update.theme.unwrap_or(self.theme),
            default_category: update
                .default_category
                .unwrap_or_else(|| self.default_category.clone()),
        }
    }
}

/// Settings persisted as one JSON record.
pub struct SettingsStore {
    backend: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the stored settings merged over the defaults.
    ///
    /// Load failures are logged and yield the defaults.
    pub async fn load(&self) -> AppSettings {
        match self.try_load().await {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to load settings: {}", e);
                AppSettings::default()
            }
        }
    }

    /// Applies `update` and persists the result.
    pub async fn update(&self, update: SettingsUpdate) -> Result<AppSettings, StorageError> {
        let _guard = self.write_lock.lock().await;
        let settings = self.load().await.merged(update);
        self.save(&settings).await?;
        Ok(settings)
    }

    pub async fn set_currency(&self, currency: Currency) -> Result<AppSettings, StorageError> {
        self.update(SettingsUpdate {
            currency: Some(currency),
            ..Default::default()
        })
        .await
    }

    pub async fn set_font_size(&self, font_size: FontSize) -> Result<AppSettings, StorageError> {
        self.update(SettingsUpdate {
            font_size: Some(font_size),
            ..Default::default()
        })
        .await
    }

    pub async fn set_theme(&self, theme: ThemeMode) -> Result<AppSettings, StorageError> {
        self.update(SettingsUpdate {
            theme: Some(theme),
            ..Default::default()
        })
        .await
    }

    pub async fn set_default_category(
        &self,
        category: impl Into<String>,
    ) -> Result<AppSettings, StorageError> {
        self.update(SettingsUpdate {
            default_category: Some(category.into()),
            ..Default::default()
        })
        .await
    }

    /// Restores and persists the defaults.
    pub async fn reset(&self) -> Result<AppSettings, StorageError> {
        let _guard = self.write_lock.lock().await;
        let settings = AppSettings::default();
        self.save(&settings).await?;
        Ok(settings)
    }

    async fn try_load(&self) -> Result<AppSettings, StorageError> {
        match self.backend.get(SETTINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(AppSettings::default()),
        }
    }

    async fn save(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(settings)?;
        if let Err(e) = self.backend.set(SETTINGS_KEY, serialized).await {
            error!("Failed to save settings: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
