//! Key-value store contract and an in-memory implementation
//!
//! A store is the container a binding finally reads and writes. Stores are
//! shared handles: cloning one yields another view of the same table, and all
//! operations take `&self` so a binding can hold a store owned elsewhere.

use crate::error::Result;
use crate::value::StoreValue;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Host store for primitive values keyed by string.
pub trait KeyValueStore {
    /// Loads the value stored under `key`.
    fn get(&self, key: &str) -> Option<StoreValue>;

    /// Whether `key` is present.
    fn contains(&self, key: &str) -> bool;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the store refuses the value kind or fails to persist.
    fn put(&self, key: &str, value: StoreValue) -> Result<()>;

    /// Deletes `key`, returning whether it was present.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Deletes every key.
    fn clear(&self) -> Result<()>;

    /// Lists the keys currently present.
    fn keys(&self) -> Vec<String>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<StoreValue> {
        (**self).get(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }

    fn put(&self, key: &str, value: StoreValue) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Access counters for a [`MemoryStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of `get` calls
    pub reads: u64,
    /// Number of `put` calls
    pub writes: u64,
    /// Number of `remove` calls
    pub removes: u64,
}

#[derive(Debug, Default)]
struct Counters {
    reads: Cell<u64>,
    writes: Cell<u64>,
    removes: Cell<u64>,
}

impl Counters {
    fn bump(cell: &Cell<u64>) {
        cell.set(cell.get() + 1);
    }
}

/// In-memory store keyed by string, counting every access.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<BTreeMap<String, StoreValue>>>,
    counters: Rc<Counters>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `entries`
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, StoreValue)>,
        K: Into<String>,
    {
        let store = Self::new();
        store
            .inner
            .borrow_mut()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        store
    }

    /// Independent copy of the current contents, with fresh counters
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(self.inner.borrow().clone())),
            counters: Rc::default(),
        }
    }

    /// Snapshot of the contents
    pub fn snapshot(&self) -> BTreeMap<String, StoreValue> {
        self.inner.borrow().clone()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Whether two handles view the same table
    pub fn same_table(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Access counters since creation
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            reads: self.counters.reads.get(),
            writes: self.counters.writes.get(),
            removes: self.counters.removes.get(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        Counters::bump(&self.counters.reads);
        self.inner.borrow().get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }

    fn put(&self, key: &str, value: StoreValue) -> Result<()> {
        Counters::bump(&self.counters.writes);
        self.inner.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Counters::bump(&self.counters.removes);
        Ok(self.inner.borrow_mut().remove(key).is_some())
    }

    fn clear(&self) -> Result<()> {
        self.inner.borrow_mut().clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_remove() {
        let store = MemoryStore::new();
        let store_obj: &dyn KeyValueStore = &store;

        store_obj.put("pref.key", StoreValue::Int(1)).unwrap();
        assert_eq!(store_obj.get("pref.key"), Some(StoreValue::Int(1)));
        assert!(store_obj.remove("pref.key").unwrap());
        assert_eq!(store_obj.get("pref.key"), None);
        assert!(!store_obj.remove("pref.key").unwrap());
    }

    #[test]
    fn test_clones_share_table() {
        let store = MemoryStore::new();
        let view = store.clone();
        view.put("a", StoreValue::Bool(true)).unwrap();

        assert!(store.contains("a"));
        assert!(store.same_table(&view));
        assert!(!store.same_table(&store.deep_copy()));
    }

    #[test]
    fn test_stats_count_accesses() {
        let store = MemoryStore::from_entries([("a", StoreValue::Long(3))]);
        store.get("a");
        store.get("b");
        store.put("c", StoreValue::Double(1.5)).unwrap();
        store.remove("a").unwrap();

        assert_eq!(
            store.stats(),
            StoreStats {
                reads: 2,
                writes: 1,
                removes: 1
            }
        );
        assert_eq!(store.keys(), vec!["c".to_string()]);
    }
}
