//! Display settings: theme and background animation.
//!
//! Loaded once with [`SettingsStore::init`], then every change is written
//! to storage immediately and broadcast to subscribers.

use std::sync::Arc;

use recicla_core::{DisplaySettings, ThemeMode};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::storage::{KeyValueStore, StorageError, keys};

/// Observable display settings.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsInner>,
}

struct SettingsInner {
    storage: Arc<dyn KeyValueStore>,
    tx: watch::Sender<DisplaySettings>,
}

impl SettingsStore {
    /// Load settings from storage. Missing or unrecognised values fall back
    /// to the light theme with animation on.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be read.
    #[instrument(skip(storage))]
    pub async fn init(storage: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let mut settings = DisplaySettings::default();

        if let Some(raw) = storage.get(keys::THEME).await? {
            match ThemeMode::from_stored(&raw) {
                Some(theme) => settings.theme = theme,
                None => warn!(value = %raw, "Ignoring unknown stored theme"),
            }
        }
        if let Some(raw) = storage.get(keys::BACKGROUND_ANIMATION).await? {
            match raw.trim() {
                "true" => settings.background_animation = true,
                "false" => settings.background_animation = false,
                other => warn!(value = %other, "Ignoring unknown animation flag"),
            }
        }
        debug!(
            theme = settings.theme.as_str(),
            animation = settings.background_animation,
            "Settings loaded"
        );

        let (tx, _) = watch::channel(settings);
        Ok(Self {
            inner: Arc::new(SettingsInner { storage, tx }),
        })
    }

    #[must_use]
    pub fn current(&self) -> DisplaySettings {
        *self.inner.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisplaySettings> {
        self.inner.tx.subscribe()
    }

    /// Flip between light and dark.
    ///
    /// # Errors
    ///
    /// Returns error if the new value cannot be persisted.
    pub async fn toggle_theme(&self) -> Result<ThemeMode, StorageError> {
        let next = self.current().theme.toggled();
        self.set_theme(next).await?;
        Ok(next)
    }

    /// # Errors
    ///
    /// Returns error if the new value cannot be persisted.
    pub async fn set_theme(&self, theme: ThemeMode) -> Result<(), StorageError> {
        self.inner.tx.send_modify(|s| s.theme = theme);
        self.inner.storage.set(keys::THEME, theme.as_str()).await
    }

    /// # Errors
    ///
    /// Returns error if the new value cannot be persisted.
    pub async fn set_background_animation(&self, enabled: bool) -> Result<(), StorageError> {
        self.inner.tx.send_modify(|s| s.background_animation = enabled);
        self.inner
            .storage
            .set(keys::BACKGROUND_ANIMATION, if enabled { "true" } else { "false" })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the new value cannot be persisted.
    pub async fn toggle_background_animation(&self) -> Result<bool, StorageError> {
        let next = !self.current().background_animation;
        self.set_background_animation(next).await?;
        Ok(next)
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_defaults_when_storage_empty() {
        let store = SettingsStore::init(Arc::new(MemoryStore::new())).await.unwrap();
        let settings = store.current();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert!(settings.background_animation);
    }

    #[tokio::test]
    async fn test_loads_stored_values() {
        let storage = Arc::new(MemoryStore::with_values([
            (keys::THEME, "dark"),
            (keys::BACKGROUND_ANIMATION, "false"),
        ]));
        let store = SettingsStore::init(storage).await.unwrap();
        assert!(store.current().is_dark());
        assert!(!store.current().background_animation);
    }

    #[tokio::test]
    async fn test_unknown_values_fall_back() {
        let storage = Arc::new(MemoryStore::with_values([
            (keys::THEME, "sepia"),
            (keys::BACKGROUND_ANIMATION, "maybe"),
        ]));
        let store = SettingsStore::init(storage).await.unwrap();
        assert_eq!(store.current(), DisplaySettings::default());
    }

    #[tokio::test]
    async fn test_toggle_persists_and_notifies() {
        let storage = Arc::new(MemoryStore::new());
        let store = SettingsStore::init(storage.clone()).await.unwrap();
        let mut rx = store.subscribe();

        assert_eq!(store.toggle_theme().await.unwrap(), ThemeMode::Dark);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().theme, ThemeMode::Dark);
        assert_eq!(storage.snapshot(keys::THEME).as_deref(), Some("dark"));

        assert!(!store.toggle_background_animation().await.unwrap());
        assert!(!rx.borrow_and_update().background_animation);
        assert_eq!(
            storage.snapshot(keys::BACKGROUND_ANIMATION).as_deref(),
            Some("false")
        );
    }
}
