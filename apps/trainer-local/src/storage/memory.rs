//! In-memory key/value store.

use super::error::StoreError;
use super::{KeyValueStore, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Map-backed store that counts writes. Can be switched to fail every call.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with raw entries (written without counting).
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut map) = store.entries.lock() {
            map.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    /// Number of `set_raw` and `remove` calls that succeeded.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every call fail, as a full or blocked storage would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Copy of all entries.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().map(|m| m.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage disabled".into()));
        }
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_writes() {
        let store = MemoryStore::with_entries([("x", "1")]);
        assert_eq!(store.write_count(), 0);
        store.set_raw("y", "2").unwrap();
        store.remove("x").unwrap();
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.keys().unwrap(), vec!["y".to_string()]);
    }

    #[test]
    fn failing_store_errors() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(store.set_raw("a", "1").is_err());
        assert!(store.get_raw("a").is_err());
        assert_eq!(store.write_count(), 0);
    }
}
