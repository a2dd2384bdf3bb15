//! Namespaced local persistence.
//!
//! The rest of the crate sees two capabilities, `get` and `set`, on a
//! [`Storage`] handle. Keys are prefixed with the trainer's namespace so
//! several trainer variants can share one backing store. Values are JSON
//! envelopes carrying a schema version and a write timestamp.
//!
//! Backend and serialization failures stop here: reads resolve to "absent"
//! and writes are skipped, both with a warning.

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Separator between namespace and key.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Raw string key/value backend.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Stored value wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub value: T,
    pub version: u32,
    pub updated_at: DateTime<Utc>,
}

impl<T> Envelope<T> {
    pub fn new(value: T, updated_at: DateTime<Utc>) -> Self {
        Self {
            value,
            version: schema::ENVELOPE_VERSION,
            updated_at,
        }
    }
}

/// Build the full key for `key` under `namespace`.
pub fn namespaced(namespace: &str, key: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}{key}")
}

/// Namespaced handle over a backend. Cheap to clone.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    pub fn full_key(&self, key: &str) -> String {
        namespaced(&self.namespace, key)
    }

    /// Read a value. Missing, unreadable or undecodable values are `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, treating as absent");
                None
            }
        }
    }

    /// Write a value. Returns whether the write happened.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage write failed, skipping");
                false
            }
        }
    }

    /// Remove a value. Failures are logged and ignored.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(&self.full_key(key)) {
            tracing::warn!(key, error = %e, "storage remove failed, skipping");
        }
    }

    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get_raw(&self.full_key(key))? else {
            return Ok(None);
        };
        let envelope: Envelope<T> = serde_json::from_str(&raw)?;
        Ok(Some(envelope.value))
    }

    pub fn try_set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(&Envelope::new(value, Utc::now()))?;
        self.backend.set_raw(&self.full_key(key), &raw)
    }

    /// Keys in this namespace starting with `prefix`, without the namespace.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let full_prefix = self.full_key(prefix);
        match self.backend.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&full_prefix))
                .map(|k| k[self.namespace.len() + 1..].to_string())
                .collect(),
            Err(e) => {
                tracing::warn!(prefix, error = %e, "storage key listing failed");
                Vec::new()
            }
        }
    }
}
