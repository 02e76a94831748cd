//! Typed in-memory bundles
//!
//! A [`Bundle`] is a shared handle to a string-keyed table of primitive
//! values. Cloning it yields another view of the same table; use
//! [`Bundle::deep_copy`] for an independent one.
//!
//! Enum constants can also be stored by ordinal with the
//! `put_enum_or_ignore` / `get_enum_or_*` helpers.
//!
//! # Example
//!
//! ```rust
//! use jetpack_bundles::Bundle;
//!
//! let bundle = Bundle::new();
//! bundle.put_int("count", 3);
//! assert_eq!(bundle.get_int("count"), Some(3));
//! assert_eq!(bundle.get_string("count"), None);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use jetpack_core::{BindableEnum, BindingError, KeyValueStore, MemoryStore, NativeValue, Result, StoreResolver, StoreStats, StoreValue};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, trace};

/// Shared string-keyed table of primitive values.
#[derive(Clone, Default)]
pub struct Bundle {
    store: MemoryStore,
}

impl Bundle {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle holding `entries`
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, StoreValue)>,
        K: Into<String>,
    {
        Self {
            store: MemoryStore::from_entries(entries),
        }
    }

    /// Store any native value
    pub fn put_native<V: NativeValue>(&self, key: &str, value: V) {
        self.insert(key, value.to_store());
    }

    /// Load a native value; `None` when absent or of another kind
    pub fn get_native<V: NativeValue>(&self, key: &str) -> Option<V> {
        self.store.get(key).and_then(V::from_store)
    }

    /// Raw value under `key`
    pub fn get_value(&self, key: &str) -> Option<StoreValue> {
        self.store.get(key)
    }

    pub fn put_value(&self, key: &str, value: StoreValue) {
        self.insert(key, value);
    }

    pub fn put_boolean(&self, key: &str, value: bool) {
        self.put_native(key, value);
    }

    pub fn put_int(&self, key: &str, value: i32) {
        self.put_native(key, value);
    }

    pub fn put_long(&self, key: &str, value: i64) {
        self.put_native(key, value);
    }

    pub fn put_float(&self, key: &str, value: f32) {
        self.put_native(key, value);
    }

    pub fn put_double(&self, key: &str, value: f64) {
        self.put_native(key, value);
    }

    pub fn put_string(&self, key: &str, value: impl Into<String>) {
        self.put_native(key, value.into());
    }

    pub fn put_string_set(&self, key: &str, value: BTreeSet<String>) {
        self.put_native(key, value);
    }

    pub fn put_string_array(&self, key: &str, value: Vec<String>) {
        self.put_native(key, value);
    }

    pub fn put_int_array(&self, key: &str, value: Vec<i32>) {
        self.put_native(key, value);
    }

    pub fn put_bytes(&self, key: &str, value: Vec<u8>) {
        self.put_native(key, value);
    }

    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.get_native(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get_native(key)
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.get_native(key)
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.get_native(key)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get_native(key)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_native(key)
    }

    pub fn get_string_set(&self, key: &str) -> Option<BTreeSet<String>> {
        self.get_native(key)
    }

    pub fn get_string_array(&self, key: &str) -> Option<Vec<String>> {
        self.get_native(key)
    }

    pub fn get_int_array(&self, key: &str) -> Option<Vec<i32>> {
        self.get_native(key)
    }

    pub fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.get_native(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    /// Remove `key`, returning whether it was present
    pub fn remove(&self, key: &str) -> bool {
        self.store.remove(key).unwrap_or(false)
    }

    pub fn clear(&self) {
        let _ = self.store.clear();
    }

    /// Copy every entry of `other` into this bundle, overwriting shared keys
    pub fn put_all(&self, other: &Bundle) {
        for (key, value) in other.entries() {
            self.insert(&key, value);
        }
    }

    /// Replace the contents with those of `other`; nothing is merged
    pub fn replace_all(&self, other: &Bundle) {
        let entries = other.entries();
        debug!(replaced = self.store.len(), incoming = entries.len(), "Replacing bundle contents");
        self.clear();
        for (key, value) in entries {
            self.insert(&key, value);
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    /// Snapshot of the contents
    pub fn entries(&self) -> BTreeMap<String, StoreValue> {
        self.store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Independent copy of the current contents
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            store: self.store.deep_copy(),
        }
    }

    /// Whether two handles view the same table
    pub fn same_bundle(&self, other: &Bundle) -> bool {
        self.store.same_table(&other.store)
    }

    /// Store accesses made through this bundle's table
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Store `value` by ordinal; `None` leaves the bundle untouched
    pub fn put_enum_or_ignore<E: BindableEnum>(&self, key: &str, value: Option<E>) {
        if let Some(value) = value {
            self.put_ordinal(key, value);
        }
    }

    /// Store `value` by ordinal
    pub fn put_enum<E: BindableEnum>(&self, key: &str, value: E) {
        self.put_ordinal(key, value);
    }

    /// Constant stored by ordinal under `key`, `None` when absent
    ///
    /// # Errors
    ///
    /// [`BindingError::EnumDecodeFailure`] for an out-of-range ordinal and
    /// [`BindingError::TypeMismatch`] for a non-integer value.
    pub fn get_enum_or_null<E: BindableEnum>(&self, key: &str) -> Result<Option<E>> {
        match self.store.get(key) {
            None => Ok(None),
            Some(value) => decode_ordinal(key, &value).map(Some),
        }
    }

    pub fn get_enum_or_default<E: BindableEnum>(&self, key: &str, default: E) -> Result<E> {
        Ok(self.get_enum_or_null(key)?.unwrap_or(default))
    }

    /// Like [`get_enum_or_null`](Self::get_enum_or_null), failing with
    /// [`BindingError::MissingRequiredValue`] when absent
    pub fn get_enum_or_throw<E: BindableEnum>(&self, key: &str) -> Result<E> {
        self.get_enum_or_null(key)?
            .ok_or_else(|| BindingError::missing(key))
    }

    fn put_ordinal<E: BindableEnum>(&self, key: &str, value: E) {
        let ordinal = i32::try_from(value.ordinal()).unwrap_or(i32::MAX);
        trace!(key, ordinal, enum_name = E::enum_name(), "Storing enum by ordinal");
        self.insert(key, StoreValue::Int(ordinal));
    }

    fn insert(&self, key: &str, value: StoreValue) {
        // MemoryStore never refuses a value
        let _ = self.store.put(key, value);
    }
}

/// Decode an ordinal-encoded enum constant
pub fn decode_ordinal<E: BindableEnum>(key: &str, value: &StoreValue) -> Result<E> {
    let StoreValue::Int(ordinal) = value else {
        return Err(BindingError::TypeMismatch {
            key: key.to_string(),
            expected: "Integer".to_string(),
            found: value.kind().to_string(),
        });
    };

    usize::try_from(*ordinal)
        .ok()
        .and_then(E::from_ordinal)
        .ok_or_else(|| {
            debug!(key, ordinal, enum_name = E::enum_name(), "Ordinal out of range");
            BindingError::EnumDecodeFailure {
                key: key.to_string(),
                value: ordinal.to_string(),
                enum_name: E::enum_name().to_string(),
            }
        })
}

impl KeyValueStore for Bundle {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.store.get(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    fn put(&self, key: &str, value: StoreValue) -> Result<()> {
        self.store.put(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.store.remove(key)
    }

    fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    fn keys(&self) -> Vec<String> {
        self.store.keys()
    }
}

/// A bundle is its own source
impl StoreResolver for Bundle {
    type Store = Bundle;

    fn resolve(&self) -> Result<Option<Bundle>> {
        Ok(Some(self.clone()))
    }

    fn resolve_or_attach(&self) -> Result<Bundle> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        "Bundle".to_string()
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.store.snapshot()).finish()
    }
}

impl PartialEq for Bundle {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::Bundle;
    pub use jetpack_core::{BindableEnum, StoreValue};
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetpack_core::ErrorCode;

    jetpack_core::bindable_enum! {
        enum Direction { North, East, South, West }
    }

    #[test]
    fn test_typed_put_get() {
        let bundle = Bundle::new();
        bundle.put_boolean("flag", true);
        bundle.put_double("ratio", 0.5);
        bundle.put_string("name", "Rarity");
        bundle.put_string_array("tags", vec!["a".to_string(), "b".to_string()]);

        assert_eq!(bundle.get_boolean("flag"), Some(true));
        assert_eq!(bundle.get_double("ratio"), Some(0.5));
        assert_eq!(bundle.get_string("name").as_deref(), Some("Rarity"));
        assert_eq!(bundle.get_string_array("tags").map(|t| t.len()), Some(2));
        assert_eq!(bundle.get_int("name"), None);
        assert_eq!(bundle.len(), 4);
    }

    #[test]
    fn test_clone_shares_and_deep_copy_detaches() {
        let bundle = Bundle::new();
        let view = bundle.clone();
        let copy = bundle.deep_copy();
        view.put_int("count", 1);

        assert!(bundle.contains_key("count"));
        assert!(!copy.contains_key("count"));
        assert!(bundle.same_bundle(&view));
        assert!(!bundle.same_bundle(&copy));
    }

    #[test]
    fn test_put_all_merges_replace_all_replaces() {
        let target = Bundle::from_entries([("a", StoreValue::Int(1)), ("b", StoreValue::Int(2))]);
        let source = Bundle::from_entries([("b", StoreValue::Int(20)), ("c", StoreValue::Int(30))]);

        let merged = target.deep_copy();
        merged.put_all(&source);
        assert_eq!(merged.keys(), vec!["a", "b", "c"]);
        assert_eq!(merged.get_int("b"), Some(20));

        target.replace_all(&source);
        assert_eq!(target, source);
        assert!(!target.same_bundle(&source));
    }

    #[test]
    fn test_enum_ordinal_helpers() {
        let bundle = Bundle::new();
        bundle.put_enum_or_ignore::<Direction>("skip", None);
        bundle.put_enum_or_ignore("dir", Some(Direction::South));

        assert!(!bundle.contains_key("skip"));
        assert_eq!(bundle.get_int("dir"), Some(2));
        assert_eq!(bundle.get_enum_or_null::<Direction>("dir").unwrap(), Some(Direction::South));
        assert_eq!(bundle.get_enum_or_null::<Direction>("skip").unwrap(), None);
        assert_eq!(bundle.get_enum_or_default("skip", Direction::West).unwrap(), Direction::West);

        let err = bundle.get_enum_or_throw::<Direction>("skip").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingRequiredValue);
    }

    #[test]
    fn test_enum_ordinal_out_of_range() {
        let bundle = Bundle::from_entries([("dir", StoreValue::Int(9)), ("name", StoreValue::from("North"))]);

        let err = bundle.get_enum_or_default("dir", Direction::North).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EnumDecodeFailure);

        let err = bundle.get_enum_or_null::<Direction>("name").unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
    }
}
