//! Bound properties: cached, invalidate-on-write accessors over a store
//!
//! A [`BoundProperty`] is either *dirty* (next read goes to the store) or
//! *clean* (the cached value is returned). It starts dirty. A dirty read makes
//! one store access and leaves the property clean. Every write makes one store
//! mutation and leaves the property dirty, because the store may coerce or
//! reject what was written.
//!
//! # Example
//!
//! ```rust
//! use jetpack_core::{KeyValueStore, MemoryStore, PropertyBuilder, StoreValue};
//!
//! let store = MemoryStore::new();
//! let count = PropertyBuilder::<i32, _>::new(store.clone(), "count")
//!     .with_default(7)
//!     .required()?;
//!
//! assert_eq!(count.get()?, 7);
//! count.set(42)?;
//! assert_eq!(count.get()?, 42);
//! assert_eq!(store.get("count"), Some(StoreValue::Int(42)));
//! # Ok::<(), jetpack_core::BindingError>(())
//! ```

use crate::adapter::{BindableEnum, EnumAdapter, EnumPolicy, TypeAdapter};
use crate::config::BindingsConfig;
use crate::error::{BindingError, Result};
use crate::registry::{self, AdapterRegistry, SharedAdapter};
use crate::store::{KeyValueStore, MemoryStore};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Maps a source object to the store a binding operates on.
pub trait StoreResolver {
    /// Store type reached through this source
    type Store: KeyValueStore + Clone;

    /// The store currently attached to the source, if any.
    fn resolve(&self) -> Result<Option<Self::Store>>;

    /// The attached store, attaching a fresh empty one first if there is none.
    ///
    /// Attaching replaces whatever the source held before; it never merges.
    fn resolve_or_attach(&self) -> Result<Self::Store>;

    /// Short description of the source for diagnostics
    fn describe(&self) -> String;
}

impl StoreResolver for MemoryStore {
    type Store = MemoryStore;

    fn resolve(&self) -> Result<Option<MemoryStore>> {
        Ok(Some(self.clone()))
    }

    fn resolve_or_attach(&self) -> Result<MemoryStore> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("MemoryStore({} keys)", self.len())
    }
}

/// What a read does when the key is absent but a default exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultPolicy {
    /// Return the default without touching the store
    #[default]
    InMemory,
    /// Write the default into the store, then return it
    Materialize,
}

/// Per-binding behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingOptions {
    /// Absent-key handling
    pub default_policy: DefaultPolicy,
    /// Unknown enum constant handling
    pub enum_policy: EnumPolicy,
}

impl BindingOptions {
    /// Options taken from the `[bindings]` configuration section
    pub fn from_config(config: &BindingsConfig) -> Self {
        Self {
            default_policy: config.default_policy,
            enum_policy: config.enum_policy,
        }
    }

    /// Replace the default policy
    #[must_use]
    pub fn with_default_policy(mut self, policy: DefaultPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Replace the enum policy
    #[must_use]
    pub fn with_enum_policy(mut self, policy: EnumPolicy) -> Self {
        self.enum_policy = policy;
        self
    }
}

/// Reads `key`, applying the default and the default policy.
///
/// `writable` is only called when a default has to be materialized.
pub(crate) fn fetch<'s, V: Clone>(
    adapter: &dyn TypeAdapter<V>,
    key: &str,
    default: Option<&V>,
    policy: DefaultPolicy,
    readable: Option<&'s dyn KeyValueStore>,
    writable: impl FnOnce() -> Result<&'s dyn KeyValueStore>,
) -> Result<Option<V>> {
    let fetched = match readable {
        Some(store) => adapter.get(store, key)?,
        None => None,
    };

    if fetched.is_some() {
        return Ok(fetched);
    }

    if let (Some(default), DefaultPolicy::Materialize) = (default, policy) {
        adapter.set(writable()?, key, default)?;
        debug!(key, "Materialized default value");
    }

    Ok(default.cloned())
}

/// Builder for a binding: key, default, adapter and options.
pub struct PropertyBuilder<V, R> {
    resolver: R,
    property: String,
    name: Option<String>,
    default: Option<V>,
    adapter: Option<SharedAdapter<V>>,
    enum_adapter: Option<fn(EnumPolicy) -> SharedAdapter<V>>,
    options: BindingOptions,
}

impl<V: Clone + 'static, R: StoreResolver> PropertyBuilder<V, R> {
    /// Start a binding for the field named `property` on `resolver`
    pub fn new(resolver: R, property: impl Into<String>) -> Self {
        Self {
            resolver,
            property: property.into(),
            name: None,
            default: None,
            adapter: None,
            enum_adapter: None,
            options: BindingOptions::default(),
        }
    }

    /// Use `name` as the key instead of the property name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Value returned when the store has none
    #[must_use]
    pub fn with_default(mut self, value: V) -> Self {
        self.default = Some(value);
        self
    }

    /// Set or clear the default
    #[must_use]
    pub fn with_default_opt(mut self, value: Option<V>) -> Self {
        self.default = value;
        self
    }

    /// Use `adapter` instead of the registry's
    #[must_use]
    pub fn adapter(mut self, adapter: impl TypeAdapter<V> + 'static) -> Self {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    /// Replace every option at once
    #[must_use]
    pub fn options(mut self, options: BindingOptions) -> Self {
        self.options = options;
        self
    }

    /// Absent-key handling for this binding
    #[must_use]
    pub fn default_policy(mut self, policy: DefaultPolicy) -> Self {
        self.options.default_policy = policy;
        self
    }

    /// Unknown constant handling for enum adapters
    #[must_use]
    pub fn enum_policy(mut self, policy: EnumPolicy) -> Self {
        self.options.enum_policy = policy;
        self
    }

    /// Key the finished binding will use
    pub fn key(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.property)
    }

    /// Finish as a binding that fails when no value and no default exist
    pub fn required(self) -> Result<Required<V, R>> {
        self.build(None).map(Required)
    }

    /// Finish as a binding that yields `None` when no value and no default exist
    pub fn optional(self) -> Result<Optional<V, R>> {
        self.build(None).map(Optional)
    }

    /// Like [`required`](Self::required), looking the adapter up in `registry`
    pub fn required_in(self, registry: &AdapterRegistry) -> Result<Required<V, R>> {
        self.build(Some(registry)).map(Required)
    }

    /// Like [`optional`](Self::optional), looking the adapter up in `registry`
    pub fn optional_in(self, registry: &AdapterRegistry) -> Result<Optional<V, R>> {
        self.build(Some(registry)).map(Optional)
    }

    /// Finish as a thread-safe binding
    pub fn shared(self) -> Result<crate::sync::SharedProperty<V, R>>
    where
        V: Send,
        R: Send + Sync,
        R::Store: Send + Sync,
    {
        let parts = self.into_parts(None)?;
        Ok(crate::sync::SharedProperty::from_parts(parts))
    }

    pub(crate) fn into_parts(self, registry: Option<&AdapterRegistry>) -> Result<Parts<V, R>> {
        let key = self.name.unwrap_or(self.property);
        let policy = self.options.enum_policy;
        let adapter = match (self.adapter, self.enum_adapter, registry) {
            (Some(adapter), _, _) => adapter,
            (None, Some(factory), _) => factory(policy),
            (None, None, Some(registry)) => registry.lookup::<V>(&key, policy)?,
            (None, None, None) => registry::lookup::<V>(&key, policy)?,
        };

        debug!(key = %key, source = %self.resolver.describe(), "Declared binding");

        Ok(Parts {
            resolver: self.resolver,
            key,
            default: self.default,
            adapter,
            options: self.options,
        })
    }

    fn build(self, registry: Option<&AdapterRegistry>) -> Result<BoundProperty<V, R>> {
        let parts = self.into_parts(registry)?;
        Ok(BoundProperty {
            resolver: parts.resolver,
            store: OnceCell::new(),
            key: parts.key,
            default: parts.default,
            adapter: parts.adapter,
            options: parts.options,
            cache: RefCell::new(None),
            dirty: Cell::new(true),
        })
    }
}

impl<E: BindableEnum, R: StoreResolver> PropertyBuilder<E, R> {
    /// Store constants by name without registering `E` first
    ///
    /// The adapter follows the enum policy in effect when the binding is finished.
    #[must_use]
    pub fn enumeration(mut self) -> Self {
        self.enum_adapter = Some(|policy| -> SharedAdapter<E> { Arc::new(EnumAdapter::<E>::new(policy)) });
        self
    }
}

pub(crate) struct Parts<V, R> {
    pub(crate) resolver: R,
    pub(crate) key: String,
    pub(crate) default: Option<V>,
    pub(crate) adapter: SharedAdapter<V>,
    pub(crate) options: BindingOptions,
}

/// Stateful accessor caching the last value read from its store.
pub struct BoundProperty<V, R: StoreResolver> {
    resolver: R,
    store: OnceCell<R::Store>,
    key: String,
    default: Option<V>,
    adapter: SharedAdapter<V>,
    options: BindingOptions,
    cache: RefCell<Option<V>>,
    dirty: Cell<bool>,
}

impl<V: Clone, R: StoreResolver> BoundProperty<V, R> {
    /// Key used for every store interaction
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Default applied when the key is absent
    pub fn default_value(&self) -> Option<&V> {
        self.default.as_ref()
    }

    /// Options fixed at declaration
    pub fn options(&self) -> BindingOptions {
        self.options
    }

    /// Source the store is resolved from
    pub fn source(&self) -> &R {
        &self.resolver
    }

    /// Whether the next read will go to the store
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Force the next read to go to the store
    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    /// Current value: stored value, else default, else `None`
    pub fn read(&self) -> Result<Option<V>> {
        if self.dirty.get() {
            let readable = self.store_for_read()?;
            let value = fetch(
                self.adapter.as_ref(),
                &self.key,
                self.default.as_ref(),
                self.options.default_policy,
                readable.map(|store| store as &dyn KeyValueStore),
                || self.store_for_write().map(|store| store as &dyn KeyValueStore),
            )?;

            trace!(key = %self.key, present = value.is_some(), "Refetched binding");
            *self.cache.borrow_mut() = value;
            self.dirty.set(false);
        }

        Ok(self.cache.borrow().clone())
    }

    /// Store `value`, or remove the key when `value` is `None`
    pub fn write(&self, value: Option<&V>) -> Result<()> {
        let store = self.store_for_write()?;
        let result = match value {
            Some(value) => self.adapter.set(store, &self.key, value),
            None => store.remove(&self.key).map(|_| ()),
        };
        self.dirty.set(true);
        result
    }

    fn store_for_read(&self) -> Result<Option<&R::Store>> {
        if let Some(store) = self.store.get() {
            return Ok(Some(store));
        }

        match self.resolver.resolve()? {
            Some(store) => {
                debug!(key = %self.key, source = %self.resolver.describe(), "Resolved store");
                Ok(Some(self.store.get_or_init(|| store)))
            }
            None => Ok(None),
        }
    }

    fn store_for_write(&self) -> Result<&R::Store> {
        self.store.get_or_try_init(|| {
            let store = self.resolver.resolve_or_attach()?;
            debug!(key = %self.key, source = %self.resolver.describe(), "Resolved store for write");
            Ok::<_, BindingError>(store)
        })
    }
}

impl<V: fmt::Debug, R: StoreResolver> fmt::Debug for BoundProperty<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundProperty")
            .field("key", &self.key)
            .field("source", &self.resolver.describe())
            .field("default", &self.default)
            .field("cache", &self.cache.borrow())
            .field("dirty", &self.dirty.get())
            .finish_non_exhaustive()
    }
}

/// Binding whose read fails when neither a value nor a default exists.
#[derive(Debug)]
pub struct Required<V, R: StoreResolver>(BoundProperty<V, R>);

impl<V: Clone, R: StoreResolver> Required<V, R> {
    /// Current value
    ///
    /// # Errors
    ///
    /// [`BindingError::MissingRequiredValue`] when the key is absent and no default is set.
    pub fn get(&self) -> Result<V> {
        self.0
            .read()?
            .ok_or_else(|| BindingError::missing(self.0.key()))
    }

    /// Store `value`
    pub fn set(&self, value: V) -> Result<()> {
        self.0.write(Some(&value))
    }

    /// Underlying binding
    pub fn property(&self) -> &BoundProperty<V, R> {
        &self.0
    }

    /// Store key
    pub fn key(&self) -> &str {
        self.0.key()
    }
}

/// Binding whose read yields `None` when neither a value nor a default exists.
#[derive(Debug)]
pub struct Optional<V, R: StoreResolver>(BoundProperty<V, R>);

impl<V: Clone, R: StoreResolver> Optional<V, R> {
    /// Current value, if any
    pub fn get(&self) -> Result<Option<V>> {
        self.0.read()
    }

    /// Store `value`, or remove the key for `None`
    pub fn set(&self, value: Option<V>) -> Result<()> {
        self.0.write(value.as_ref())
    }

    /// Remove the key from the store
    pub fn remove(&self) -> Result<()> {
        self.0.write(None)
    }

    /// Underlying binding
    pub fn property(&self) -> &BoundProperty<V, R> {
        &self.0
    }

    /// Store key
    pub fn key(&self) -> &str {
        self.0.key()
    }
}
