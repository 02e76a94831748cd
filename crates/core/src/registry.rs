//! Registry mapping value types to adapters
//!
//! Lookup runs once, when a binding is built:
//! 1. exact entries (primitives, serializable types, custom registrations)
//! 2. categorical entries (enumerations, built per binding from an [`EnumPolicy`])
//!
//! A miss is [`BindingError::UnsupportedValueType`].
//!
//! # Example
//!
//! ```rust
//! use jetpack_core::registry::AdapterRegistry;
//! use jetpack_core::EnumPolicy;
//!
//! let registry = AdapterRegistry::with_defaults();
//! assert!(registry.lookup::<i32>("count", EnumPolicy::Strict).is_ok());
//! assert!(registry.lookup::<char>("initial", EnumPolicy::Strict).is_err());
//! ```

use crate::adapter::{BindableEnum, EnumAdapter, EnumPolicy, NativeAdapter, SerializableAdapter, TypeAdapter};
use crate::error::{BindingError, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared handle to an adapter for `V`
pub type SharedAdapter<V> = Arc<dyn TypeAdapter<V>>;

type EnumFactory<V> = fn(EnumPolicy) -> SharedAdapter<V>;
type Erased = Box<dyn Any + Send + Sync>;

/// Process-wide registry used when a binding is not given one explicitly
static GLOBAL: Lazy<RwLock<AdapterRegistry>> =
    Lazy::new(|| RwLock::new(AdapterRegistry::with_defaults()));

/// Typed table of adapters keyed by value type.
#[derive(Default)]
pub struct AdapterRegistry {
    exact: HashMap<TypeId, Erased>,
    enums: HashMap<TypeId, Erased>,
}

impl AdapterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the adapters for every native store kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_native::<bool>();
        registry.register_native::<i32>();
        registry.register_native::<i64>();
        registry.register_native::<f32>();
        registry.register_native::<f64>();
        registry.register_native::<String>();
        registry.register_native::<BTreeSet<String>>();
        registry.register_native::<Vec<String>>();
        registry.register_native::<Vec<i32>>();
        registry.register_native::<Vec<u8>>();
        registry.register_native::<serde_json::Value>();
        registry
    }

    fn register_native<V: crate::value::NativeValue>(&mut self) {
        self.register::<V>(NativeAdapter::<V>::new());
    }

    /// Register `adapter` as the exact match for `V`, replacing any previous one
    pub fn register<V: 'static>(&mut self, adapter: impl TypeAdapter<V> + 'static) -> &mut Self {
        let shared: SharedAdapter<V> = Arc::new(adapter);
        self.exact.insert(TypeId::of::<V>(), Box::new(shared));
        self
    }

    /// Register `T` as a structured value stored through the JSON slot
    pub fn register_serializable<T>(&mut self) -> &mut Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.register::<T>(SerializableAdapter::<T>::new())
    }

    /// Register the enumeration `E`, stored by constant name
    pub fn register_enum<E: BindableEnum>(&mut self) -> &mut Self {
        let factory: EnumFactory<E> = |policy| -> SharedAdapter<E> { Arc::new(EnumAdapter::<E>::new(policy)) };
        self.enums.insert(TypeId::of::<E>(), Box::new(factory));
        self
    }

    /// Whether an adapter is available for `V`
    pub fn contains<V: 'static>(&self) -> bool {
        let id = TypeId::of::<V>();
        self.exact.contains_key(&id) || self.enums.contains_key(&id)
    }

    /// Find the adapter for `V`; `key` only names the binding in the error
    pub fn lookup<V: 'static>(&self, key: &str, policy: EnumPolicy) -> Result<SharedAdapter<V>> {
        let id = TypeId::of::<V>();

        if let Some(adapter) = self
            .exact
            .get(&id)
            .and_then(|entry| entry.downcast_ref::<SharedAdapter<V>>())
        {
            return Ok(Arc::clone(adapter));
        }

        if let Some(factory) = self
            .enums
            .get(&id)
            .and_then(|entry| entry.downcast_ref::<EnumFactory<V>>())
        {
            return Ok(factory(policy));
        }

        Err(BindingError::unsupported_type::<V>(key))
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("exact", &self.exact.len())
            .field("enums", &self.enums.len())
            .finish()
    }
}

/// Register `adapter` for `V` in the process-wide registry
pub fn register<V: 'static>(adapter: impl TypeAdapter<V> + 'static) {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register::<V>(adapter);
}

/// Register a structured type in the process-wide registry
pub fn register_serializable<T>()
where
    T: Serialize + DeserializeOwned + 'static,
{
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_serializable::<T>();
}

/// Register an enumeration in the process-wide registry
pub fn register_enum<E: BindableEnum>() {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_enum::<E>();
}

/// Look `V` up in the process-wide registry
pub fn lookup<V: 'static>(key: &str, policy: EnumPolicy) -> Result<SharedAdapter<V>> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup::<V>(key, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::value::StoreValue;

    crate::bindable_enum! {
        enum Season { Spring, Summer }
    }

    struct Unregistered;

    struct UppercaseAdapter;

    impl TypeAdapter<String> for UppercaseAdapter {
        fn get(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<String>> {
            Ok(store.get(key).and_then(|v| match v {
                StoreValue::String(s) => Some(s.to_lowercase()),
                _ => None,
            }))
        }

        fn set(&self, store: &dyn KeyValueStore, key: &str, value: &String) -> Result<()> {
            store.put(key, StoreValue::String(value.to_uppercase()))
        }
    }

    #[test]
    fn test_defaults_cover_native_kinds() {
        let registry = AdapterRegistry::with_defaults();
        assert!(registry.contains::<bool>());
        assert!(registry.contains::<f64>());
        assert!(registry.contains::<BTreeSet<String>>());
        assert!(!registry.contains::<Unregistered>());
    }

    #[test]
    fn test_unregistered_type_fails() {
        let registry = AdapterRegistry::with_defaults();
        let err = registry
            .lookup::<Unregistered>("thing", EnumPolicy::Strict)
            .err()
            .unwrap();

        assert_eq!(err.code(), ErrorCode::UnsupportedValueType);
        assert!(err.to_string().contains("name = thing"));
        assert!(err.to_string().contains("Unregistered"));
    }

    #[test]
    fn test_enum_lookup_honours_policy() {
        let mut registry = AdapterRegistry::new();
        registry.register_enum::<Season>();
        let store = MemoryStore::from_entries([("season", StoreValue::from("Winter"))]);

        let strict = registry.lookup::<Season>("season", EnumPolicy::Strict).unwrap();
        assert!(strict.get(&store, "season").is_err());

        let lenient = registry.lookup::<Season>("season", EnumPolicy::Lenient).unwrap();
        assert_eq!(lenient.get(&store, "season").unwrap(), None);
    }

    #[test]
    fn test_exact_entry_wins_over_enum_entry() {
        let mut registry = AdapterRegistry::new();
        registry.register_enum::<Season>();
        registry.register::<Season>(EnumAdapter::<Season>::lenient());
        let store = MemoryStore::from_entries([("season", StoreValue::from("Winter"))]);

        let adapter = registry.lookup::<Season>("season", EnumPolicy::Strict).unwrap();
        assert_eq!(adapter.get(&store, "season").unwrap(), None);
    }

    #[test]
    fn test_register_replaces_default() {
        let mut registry = AdapterRegistry::with_defaults();
        registry.register::<String>(UppercaseAdapter);
        let store = MemoryStore::new();

        let adapter = registry.lookup::<String>("name", EnumPolicy::Strict).unwrap();
        adapter.set(&store, "name", &"Rarity".to_string()).unwrap();
        assert_eq!(store.get("name"), Some(StoreValue::from("RARITY")));
    }

    #[test]
    fn test_global_registry_accepts_enums() {
        register_enum::<Season>();
        assert!(lookup::<Season>("season", EnumPolicy::Strict).is_ok());
        assert!(lookup::<i32>("count", EnumPolicy::Strict).is_ok());
    }
}
