//! Profile and settings storage, owned by the extension's background side.
//! The runtime only ever reads it, once at the start of every pass.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use autoapply_core_types::{ApplyError, ErrorKind, Profile, Settings};

pub const PROFILE_KEY: &str = "applyai_profile";
pub const SETTINGS_KEY: &str = "applyai_settings";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored {key} is malformed: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StoreError> for ApplyError {
    fn from(err: StoreError) -> Self {
        ApplyError::new(ErrorKind::Store, err.to_string())
    }
}

/// Snapshot read at the start of a pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredState {
    pub profile: Option<Profile>,
    pub settings: Settings,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self) -> Result<StoredState, StoreError>;
}

/// Key-value store holding raw JSON the way the extension storage does.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    entries: RwLock<HashMap<String, Value>>,
    unavailable: RwLock<Option<String>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: &Profile) -> Self {
        let store = Self::new();
        store.put_profile(profile);
        store
    }

    pub fn put_raw(&self, key: &str, value: Value) {
        self.entries.write().insert(key.to_string(), value);
    }

    pub fn put_profile(&self, profile: &Profile) {
        self.put_raw(PROFILE_KEY, serde_json::to_value(profile).unwrap_or(Value::Null));
    }

    pub fn put_settings(&self, settings: &Settings) {
        self.put_raw(SETTINGS_KEY, serde_json::to_value(settings).unwrap_or(Value::Null));
    }

    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Makes every subsequent load fail with `reason`; `None` heals.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        *self.unavailable.write() = reason.map(str::to_string);
    }

    fn read<T>(&self, key: &'static str) -> Result<Option<T>, StoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.entries.read().get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| StoreError::Corrupt { key, source }),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load(&self) -> Result<StoredState, StoreError> {
        if let Some(reason) = self.unavailable.read().clone() {
            return Err(StoreError::Unavailable(reason));
        }
        let profile = self.read(PROFILE_KEY)?;
        // Unreadable settings fall back to defaults; they never cost the profile.
        let settings = match self.read::<Settings>(SETTINGS_KEY) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                warn!(target: "autoapply", "{}; using default settings", err);
                Settings::default()
            }
        };
        Ok(StoredState { profile, settings })
    }
}
