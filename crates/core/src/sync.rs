//! Thread-safe store and binding variants
//!
//! [`SharedStore`] and [`SharedProperty`] follow the same cache protocol as
//! [`MemoryStore`](crate::MemoryStore) and [`BoundProperty`](crate::BoundProperty),
//! with the cache and dirty flag guarded so the binding can be read from
//! several threads. Reads and writes on one binding are serialized.

use crate::error::{BindingError, Result};
use crate::property::{fetch, BindingOptions, Parts, StoreResolver};
use crate::registry::SharedAdapter;
use crate::store::KeyValueStore;
use crate::value::StoreValue;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::trace;

/// In-memory store shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<BTreeMap<String, StoreValue>>>,
}

impl SharedStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the contents
    pub fn snapshot(&self) -> BTreeMap<String, StoreValue> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    fn put(&self, key: &str, value: StoreValue) -> Result<()> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some())
    }

    fn clear(&self) -> Result<()> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl StoreResolver for SharedStore {
    type Store = SharedStore;

    fn resolve(&self) -> Result<Option<SharedStore>> {
        Ok(Some(self.clone()))
    }

    fn resolve_or_attach(&self) -> Result<SharedStore> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        "SharedStore".to_string()
    }
}

/// Thread-safe binding; build one with [`PropertyBuilder::shared`](crate::PropertyBuilder::shared).
pub struct SharedProperty<V, R: StoreResolver> {
    resolver: R,
    store: OnceCell<R::Store>,
    key: String,
    default: Option<V>,
    adapter: SharedAdapter<V>,
    options: BindingOptions,
    cache: Mutex<Option<V>>,
    dirty: AtomicBool,
}

impl<V, R> SharedProperty<V, R>
where
    V: Clone + Send,
    R: StoreResolver + Send + Sync,
    R::Store: Send + Sync,
{
    pub(crate) fn from_parts(parts: Parts<V, R>) -> Self {
        Self {
            resolver: parts.resolver,
            store: OnceCell::new(),
            key: parts.key,
            default: parts.default,
            adapter: parts.adapter,
            options: parts.options,
            cache: Mutex::new(None),
            dirty: AtomicBool::new(true),
        }
    }

    /// Store key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the next read goes to the store
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Drop the cached value
    pub fn invalidate(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Current value, else default, else `None`
    pub fn read(&self) -> Result<Option<V>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if self.dirty.load(Ordering::Acquire) {
            let readable = match self.store.get() {
                Some(store) => Some(store),
                None => self
                    .resolver
                    .resolve()?
                    .map(|store| self.store.get_or_init(|| store)),
            };

            *cache = fetch(
                self.adapter.as_ref(),
                &self.key,
                self.default.as_ref(),
                self.options.default_policy,
                readable.map(|store| store as &dyn KeyValueStore),
                || self.store_for_write().map(|store| store as &dyn KeyValueStore),
            )?;
            self.dirty.store(false, Ordering::Release);
            trace!(key = %self.key, present = cache.is_some(), "Refetched shared binding");
        }

        Ok(cache.clone())
    }

    /// Value or [`BindingError::MissingRequiredValue`]
    pub fn get(&self) -> Result<V> {
        self.read()?
            .ok_or_else(|| BindingError::missing(self.key.as_str()))
    }

    /// Store `value`, or remove the key for `None`
    pub fn write(&self, value: Option<&V>) -> Result<()> {
        let _guard = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let store = self.store_for_write()?;
        let result = match value {
            Some(value) => self.adapter.set(store, &self.key, value),
            None => store.remove(&self.key).map(|_| ()),
        };
        self.dirty.store(true, Ordering::Release);
        result
    }

    fn store_for_write(&self) -> Result<&R::Store> {
        self.store.get_or_try_init(|| self.resolver.resolve_or_attach())
    }
}

impl<V: fmt::Debug, R: StoreResolver> fmt::Debug for SharedProperty<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedProperty")
            .field("key", &self.key)
            .field("source", &self.resolver.describe())
            .field("default", &self.default)
            .field("dirty", &self.dirty.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
