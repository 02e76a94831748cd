//! Primitive values a store can hold natively

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A value as kept inside a [`KeyValueStore`](crate::store::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoreValue {
    /// `boolean`
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// UTF-8 text
    String(String),
    /// Unordered set of strings, kept sorted
    StringSet(BTreeSet<String>),
    /// Ordered list of strings
    StringArray(Vec<String>),
    /// Ordered list of 32-bit integers
    IntArray(Vec<i32>),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Structured value passed through untouched
    Json(serde_json::Value),
}

impl StoreValue {
    /// Kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            StoreValue::Bool(_) => ValueKind::Bool,
            StoreValue::Int(_) => ValueKind::Int,
            StoreValue::Long(_) => ValueKind::Long,
            StoreValue::Float(_) => ValueKind::Float,
            StoreValue::Double(_) => ValueKind::Double,
            StoreValue::String(_) => ValueKind::String,
            StoreValue::StringSet(_) => ValueKind::StringSet,
            StoreValue::StringArray(_) => ValueKind::StringArray,
            StoreValue::IntArray(_) => ValueKind::IntArray,
            StoreValue::Bytes(_) => ValueKind::Bytes,
            StoreValue::Json(_) => ValueKind::Json,
        }
    }
}

/// Fieldless tag for [`StoreValue`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// [`StoreValue::Bool`]
    Bool,
    /// [`StoreValue::Int`]
    Int,
    /// [`StoreValue::Long`]
    Long,
    /// [`StoreValue::Float`]
    Float,
    /// [`StoreValue::Double`]
    Double,
    /// [`StoreValue::String`]
    String,
    /// [`StoreValue::StringSet`]
    StringSet,
    /// [`StoreValue::StringArray`]
    StringArray,
    /// [`StoreValue::IntArray`]
    IntArray,
    /// [`StoreValue::Bytes`]
    Bytes,
    /// [`StoreValue::Json`]
    Json,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "Boolean",
            ValueKind::Int => "Integer",
            ValueKind::Long => "Long",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::String => "String",
            ValueKind::StringSet => "StringSet",
            ValueKind::StringArray => "StringArray",
            ValueKind::IntArray => "IntArray",
            ValueKind::Bytes => "ByteArray",
            ValueKind::Json => "Json",
        };
        f.write_str(name)
    }
}

/// Rust types with a one-to-one [`StoreValue`] variant.
pub trait NativeValue: Sized + Clone + 'static {
    /// Variant this type maps to
    const KIND: ValueKind;

    /// Extract from a stored value, `None` if the variant differs
    fn from_store(value: StoreValue) -> Option<Self>;

    /// Wrap into a stored value
    fn to_store(&self) -> StoreValue;
}

macro_rules! native_value {
    ($ty:ty, $variant:ident) => {
        impl NativeValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_store(value: StoreValue) -> Option<Self> {
                match value {
                    StoreValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn to_store(&self) -> StoreValue {
                StoreValue::$variant(self.clone())
            }
        }

        impl From<$ty> for StoreValue {
            fn from(value: $ty) -> Self {
                StoreValue::$variant(value)
            }
        }
    };
}

native_value!(bool, Bool);
native_value!(i32, Int);
native_value!(i64, Long);
native_value!(f32, Float);
native_value!(f64, Double);
native_value!(String, String);
native_value!(BTreeSet<String>, StringSet);
native_value!(Vec<String>, StringArray);
native_value!(Vec<i32>, IntArray);
native_value!(Vec<u8>, Bytes);
native_value!(serde_json::Value, Json);

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_matches_platform_names() {
        assert_eq!(ValueKind::Int.to_string(), "Integer");
        assert_eq!(ValueKind::Bool.to_string(), "Boolean");
    }

    #[test]
    fn test_native_value_rejects_other_variant() {
        assert_eq!(i32::from_store(StoreValue::Int(4)), Some(4));
        assert_eq!(i32::from_store(StoreValue::Long(4)), None);
        assert_eq!(String::from_store("x".into()), Some("x".to_string()));
    }

    #[test]
    fn test_store_value_json_is_tagged() {
        let json = serde_json::to_string(&StoreValue::Int(3)).unwrap();
        assert_eq!(json, r#"{"type":"int","value":3}"#);

        let back: StoreValue = serde_json::from_str(r#"{"type":"string_set","value":["a","b"]}"#).unwrap();
        assert_eq!(back.kind(), ValueKind::StringSet);
    }
}
