//! Type adapters: marshal one value type to and from a store
//!
//! - [`NativeAdapter`] for types with their own [`StoreValue`] variant
//! - [`EnumAdapter`] for [`BindableEnum`] types, stored by constant name
//! - [`SerializableAdapter`] passes `serde` values through the store's JSON slot
//! - [`JsonAdapter`] stores `serde` values as JSON text in a string slot

use crate::error::{short_type_name, BindingError, Result};
use crate::store::KeyValueStore;
use crate::value::{NativeValue, StoreValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// Reads and writes values of type `V` under a key.
pub trait TypeAdapter<V>: Send + Sync {
    /// Load the value under `key`, `None` if the key is absent.
    fn get(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<V>>;

    /// Store `value` under `key`.
    fn set(&self, store: &dyn KeyValueStore, key: &str, value: &V) -> Result<()>;
}

impl<V, A: TypeAdapter<V> + ?Sized> TypeAdapter<V> for Arc<A> {
    fn get(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<V>> {
        (**self).get(store, key)
    }

    fn set(&self, store: &dyn KeyValueStore, key: &str, value: &V) -> Result<()> {
        (**self).set(store, key, value)
    }
}

fn mismatch(key: &str, expected: impl ToString, found: &StoreValue) -> BindingError {
    BindingError::TypeMismatch {
        key: key.to_string(),
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

/// Adapter deferring to the store's native slot for `V`.
pub struct NativeAdapter<V>(PhantomData<fn() -> V>);

impl<V> NativeAdapter<V> {
    /// Adapter for `V`
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V> Default for NativeAdapter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: NativeValue> TypeAdapter<V> for NativeAdapter<V> {
    fn get(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<V>> {
        let Some(raw) = store.get(key) else {
            return Ok(None);
        };
        let found = raw.clone();
        V::from_store(raw)
            .map(Some)
            .ok_or_else(|| mismatch(key, V::KIND, &found))
    }

    fn set(&self, store: &dyn KeyValueStore, key: &str, value: &V) -> Result<()> {
        store.put(key, value.to_store())
    }
}

/// What an enum adapter does with a stored name that matches no constant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumPolicy {
    /// Fail with [`BindingError::EnumDecodeFailure`]
    #[default]
    Strict,
    /// Treat the value as absent so the binding's default applies
    Lenient,
}

/// Fieldless enumeration with a fixed, ordered list of named constants.
///
/// Usually implemented through [`bindable_enum!`](crate::bindable_enum).
pub trait BindableEnum: Copy + PartialEq + Send + Sync + 'static {
    /// Every constant in declaration order
    fn constants() -> &'static [Self];

    /// Declared name of this constant
    fn name(&self) -> &'static str;

    /// Position of this constant in [`constants`](Self::constants)
    fn ordinal(&self) -> usize {
        Self::constants()
            .iter()
            .position(|constant| constant == self)
            .unwrap_or_default()
    }

    /// Constant whose [`name`](Self::name) is `name`
    fn from_name(name: &str) -> Option<Self> {
        Self::constants()
            .iter()
            .copied()
            .find(|constant| constant.name() == name)
    }

    /// Constant at position `ordinal`
    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::constants().get(ordinal).copied()
    }

    /// Short name of the enumeration type
    fn enum_name() -> &'static str {
        short_type_name::<Self>()
    }
}

/// Declare a fieldless enum and implement [`BindableEnum`] for it.
///
/// ```
/// jetpack_core::bindable_enum! {
///     pub enum Theme { Light, Dark }
/// }
///
/// use jetpack_core::BindableEnum;
/// assert_eq!(Theme::Dark.name(), "Dark");
/// assert_eq!(Theme::from_name("Light"), Some(Theme::Light));
/// ```
#[macro_export]
macro_rules! bindable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),*
        }

        impl $crate::BindableEnum for $name {
            fn constants() -> &'static [Self] {
                &[$($name::$variant),*]
            }

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Adapter storing an enum constant by its declared name.
pub struct EnumAdapter<E> {
    policy: EnumPolicy,
    marker: PhantomData<fn() -> E>,
}

impl<E: BindableEnum> EnumAdapter<E> {
    /// Adapter applying `policy` to unknown names
    pub fn new(policy: EnumPolicy) -> Self {
        Self {
            policy,
            marker: PhantomData,
        }
    }

    /// Adapter failing on unknown names
    pub fn strict() -> Self {
        Self::new(EnumPolicy::Strict)
    }

    /// Adapter treating unknown names as absent
    pub fn lenient() -> Self {
        Self::new(EnumPolicy::Lenient)
    }

    /// Policy for unknown names
    pub fn policy(&self) -> EnumPolicy {
        self.policy
    }
}

impl<E: BindableEnum> TypeAdapter<E> for EnumAdapter<E> {
    fn get(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<E>> {
        let name = match store.get(key) {
            None => return Ok(None),
            Some(StoreValue::String(name)) => name,
            Some(other) => return Err(mismatch(key, "String", &other)),
        };

        match (E::from_name(&name), self.policy) {
            (Some(constant), _) => Ok(Some(constant)),
            (None, EnumPolicy::Lenient) => {
                tracing::trace!(key, value = %name, enum_name = E::enum_name(), "Unknown enum constant treated as absent");
                Ok(None)
            }
            (None, EnumPolicy::Strict) => Err(BindingError::EnumDecodeFailure {
                key: key.to_string(),
                value: name,
                enum_name: E::enum_name().to_string(),
            }),
        }
    }

    fn set(&self, store: &dyn KeyValueStore, key: &str, value: &E) -> Result<()> {
        store.put(key, StoreValue::String(value.name().to_string()))
    }
}

/// Adapter passing `serde` values through the store's structured slot.
pub struct SerializableAdapter<T>(PhantomData<fn() -> T>);

impl<T> SerializableAdapter<T> {
    /// Adapter for `T`
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SerializableAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> TypeAdapter<T> for SerializableAdapter<T> {
    fn get(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
        match store.get(key) {
            None => Ok(None),
            Some(StoreValue::Json(value)) => Ok(Some(serde_json::from_value(value)?)),
            Some(other) => Err(mismatch(key, "Json", &other)),
        }
    }

    fn set(&self, store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
        store.put(key, StoreValue::Json(serde_json::to_value(value)?))
    }
}

/// Adapter keeping `serde` values as JSON text, for stores limited to strings.
pub struct JsonAdapter<T>(PhantomData<fn() -> T>);

impl<T> JsonAdapter<T> {
    /// Adapter for `T`
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> TypeAdapter<T> for JsonAdapter<T> {
    fn get(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
        match store.get(key) {
            None => Ok(None),
            Some(StoreValue::String(text)) => Ok(Some(serde_json::from_str(&text)?)),
            Some(other) => Err(mismatch(key, "String", &other)),
        }
    }

    fn set(&self, store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
        store.put(key, StoreValue::String(serde_json::to_string(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::store::MemoryStore;

    crate::bindable_enum! {
        enum Pony { Twilight, Rarity, Applejack }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        first_name: String,
        age: u8,
    }

    #[test]
    fn test_native_adapter_round_trip() {
        let store = MemoryStore::new();
        let adapter = NativeAdapter::<i64>::new();

        assert_eq!(adapter.get(&store, "long").unwrap(), None);
        adapter.set(&store, "long", &37).unwrap();
        assert_eq!(adapter.get(&store, "long").unwrap(), Some(37));
    }

    #[test]
    fn test_native_adapter_type_mismatch() {
        let store = MemoryStore::from_entries([("count", StoreValue::from("seven"))]);
        let err = NativeAdapter::<i32>::new().get(&store, "count").unwrap_err();

        assert_eq!(err.code(), ErrorCode::TypeMismatch);
        assert_eq!(err.to_string(), "Key \"count\" expected Integer but value was String");
    }

    #[test]
    fn test_enum_constants_and_ordinals() {
        assert_eq!(Pony::constants().len(), 3);
        assert_eq!(Pony::Applejack.ordinal(), 2);
        assert_eq!(Pony::from_ordinal(1), Some(Pony::Rarity));
        assert_eq!(Pony::from_ordinal(3), None);
        assert_eq!(Pony::enum_name(), "Pony");
    }

    #[test]
    fn test_enum_adapter_stores_name() {
        let store = MemoryStore::new();
        EnumAdapter::<Pony>::strict().set(&store, "pony", &Pony::Rarity).unwrap();

        assert_eq!(store.get("pony"), Some(StoreValue::from("Rarity")));
        assert_eq!(EnumAdapter::<Pony>::strict().get(&store, "pony").unwrap(), Some(Pony::Rarity));
    }

    #[test]
    fn test_enum_adapter_unknown_name_policies() {
        let store = MemoryStore::from_entries([("pony", StoreValue::from("Spike"))]);

        let err = EnumAdapter::<Pony>::strict().get(&store, "pony").unwrap_err();
        assert!(matches!(
            err,
            BindingError::EnumDecodeFailure { ref value, ref enum_name, .. }
                if value == "Spike" && enum_name == "Pony"
        ));

        assert_eq!(EnumAdapter::<Pony>::lenient().get(&store, "pony").unwrap(), None);
    }

    #[test]
    fn test_json_adapter_uses_string_slot() {
        let store = MemoryStore::new();
        let profile = Profile {
            first_name: "Fluttershy".to_string(),
            age: 21,
        };
        JsonAdapter::<Profile>::new().set(&store, "profile", &profile).unwrap();

        assert!(matches!(store.get("profile"), Some(StoreValue::String(_))));
        assert_eq!(JsonAdapter::<Profile>::new().get(&store, "profile").unwrap(), Some(profile));
    }

    #[test]
    fn test_serializable_adapter_uses_json_slot() {
        let store = MemoryStore::new();
        let profile = Profile {
            first_name: "Pinkie".to_string(),
            age: 20,
        };
        SerializableAdapter::<Profile>::new().set(&store, "profile", &profile).unwrap();

        assert!(matches!(store.get("profile"), Some(StoreValue::Json(_))));
        assert_eq!(SerializableAdapter::<Profile>::new().get(&store, "profile").unwrap(), Some(profile));
    }
}
