//! Optional persistence of widget state in a key/value store.
//!
//! The registry never touches storage. Hosts call [`save_widget`] after a
//! change they care about and [`load_widget`] when recreating the widget.

mod memory;

pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::WidgetError;
use crate::widget::{InstanceRegistry, WidgetConfig, WidgetId, WidgetInstance, WidgetValue};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Widget(#[from] WidgetError),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value store, shaped like browser `localStorage`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Missing keys are not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// List all keys.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Stored form of a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedWidget {
    pub config: WidgetConfig,
    pub value: WidgetValue,
}

impl PersistedWidget {
    /// Capture an instance.
    pub fn capture(instance: &WidgetInstance) -> Self {
        Self {
            config: instance.to_config(),
            value: instance.value(),
        }
    }

    /// Config that recreates the widget with its saved value.
    pub fn into_config(self) -> WidgetConfig {
        let config = self.config;
        match self.value {
            WidgetValue::Single(v) => config.with_value(v),
            WidgetValue::Dual { start, end } => config.with_values(start, end),
        }
    }
}

/// Save the current state of widget `id` under `key`.
pub fn save_widget(
    store: &dyn KeyValueStore,
    key: &str,
    registry: &InstanceRegistry,
    id: WidgetId,
) -> StorageResult<()> {
    let persisted = PersistedWidget::capture(registry.get(id)?);
    let json = serde_json::to_string(&persisted)?;
    store.set(key, &json)?;
    log::debug!("Saved widget {} under {}", id, key);
    Ok(())
}

/// Load the config saved under `key`.
pub fn load_widget(store: &dyn KeyValueStore, key: &str) -> StorageResult<WidgetConfig> {
    let json = store
        .get(key)?
        .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
    let persisted: PersistedWidget = serde_json::from_str(&json)?;
    Ok(persisted.into_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::SetOptions;

    #[test]
    fn test_save_and_restore() {
        let store = MemoryStore::new();
        let mut registry = InstanceRegistry::new();
        let id = registry
            .create(&WidgetConfig::new(0.0, 100.0, 1.0).with_values(10.0, 90.0))
            .unwrap();
        registry
            .set_value(id, WidgetValue::Dual { start: 25.0, end: 75.0 }, SetOptions::default())
            .unwrap();

        save_widget(&store, "volume-range", &registry, id).unwrap();
        let config = load_widget(&store, "volume-range").unwrap();
        let restored = registry.create(&config).unwrap();

        assert_eq!(
            registry.get(restored).unwrap().value(),
            WidgetValue::Dual { start: 25.0, end: 75.0 }
        );
    }

    #[test]
    fn test_save_unknown_widget() {
        let store = MemoryStore::new();
        let registry = InstanceRegistry::new();
        let result = save_widget(&store, "k", &registry, uuid::Uuid::new_v4());
        assert!(matches!(result, Err(StorageError::Widget(WidgetError::NotFound(_)))));
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let store = MemoryStore::new();
        assert!(matches!(load_widget(&store, "nope"), Err(StorageError::NotFound(_))));

        store.set("bad", "{not json").unwrap();
        assert!(matches!(load_widget(&store, "bad"), Err(StorageError::Serialization(_))));
    }
}
