//! Key-Value Storage
//!
//! Where the session is persisted: browser local storage in the console,
//! an in-memory map everywhere else.

use std::cell::RefCell;
use std::collections::HashMap;

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Map-backed storage for tests and non-browser targets
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::KeyValueStorage;

    /// `window.localStorage`
    ///
    /// Storage exceptions (quota, private mode) are logged and swallowed; the
    /// in-memory session stays authoritative for the rest of the page life.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserStorage;

    impl BrowserStorage {
        fn local() -> Option<web_sys::Storage> {
            web_sys::window()?.local_storage().ok().flatten()
        }
    }

    impl KeyValueStorage for BrowserStorage {
        fn get(&self, key: &str) -> Option<String> {
            Self::local()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) {
            match Self::local() {
                Some(storage) => {
                    if let Err(e) = storage.set_item(key, value) {
                        tracing::warn!(key, error = ?e, "localStorage write failed");
                    }
                }
                None => tracing::warn!(key, "localStorage unavailable"),
            }
        }

        fn remove(&self, key: &str) {
            match Self::local() {
                Some(storage) => {
                    if let Err(e) = storage.remove_item(key) {
                        tracing::warn!(key, error = ?e, "localStorage remove failed");
                    }
                }
                None => tracing::warn!(key, "localStorage unavailable"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.get("k").is_none());
        storage.set("k", "v1");
        storage.set("k", "v2");
        assert_eq!(storage.get("k").as_deref(), Some("v2"));
        storage.remove("k");
        assert!(storage.is_empty());
    }
}
