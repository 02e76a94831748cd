//! Core of the property binding toolkit
//!
//! A binding is a named, typed field backed by an entry in a key-value store.
//! This crate provides what every binding family shares:
//!
//! - **Stores**: the [`KeyValueStore`] contract, typed [`StoreValue`]s, and an in-memory store
//! - **Adapters**: per-type marshalling ([`TypeAdapter`]) and a registry resolved at declaration time
//! - **Enumerations**: [`BindableEnum`] and the [`bindable_enum!`] macro
//! - **Bound properties**: lazy, invalidate-on-write accessors ([`Required`], [`Optional`])
//! - **Lazy values**: compute-once read-only values ([`LazyVal`])
//! - **Configuration**: TOML-based defaults for every binding family
//! - **Error handling**: coded errors with serializable reports
//!
//! # Example
//!
//! ```rust
//! use jetpack_core::prelude::*;
//!
//! jetpack_core::bindable_enum! {
//!     pub enum Theme { Light, Dark }
//! }
//!
//! jetpack_core::registry::register_enum::<Theme>();
//!
//! let store = MemoryStore::new();
//! let theme = PropertyBuilder::<Theme, _>::new(store.clone(), "theme")
//!     .with_default(Theme::Light)
//!     .required()?;
//!
//! assert_eq!(theme.get()?, Theme::Light);
//! theme.set(Theme::Dark)?;
//! assert_eq!(store.get("theme"), Some(StoreValue::from("Dark")));
//! # Ok::<(), jetpack_core::BindingError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod lazy;
pub mod property;
pub mod registry;
pub mod store;
pub mod sync;
pub mod value;

pub use adapter::{BindableEnum, EnumAdapter, EnumPolicy, JsonAdapter, NativeAdapter, SerializableAdapter, TypeAdapter};
pub use error::{BindingError, ErrorCode, ErrorReport, Result};
pub use lazy::LazyVal;
pub use property::{BindingOptions, BoundProperty, DefaultPolicy, Optional, PropertyBuilder, Required, StoreResolver};
pub use registry::{AdapterRegistry, SharedAdapter};
pub use store::{KeyValueStore, MemoryStore, StoreStats};
pub use sync::{SharedProperty, SharedStore};
pub use value::{NativeValue, StoreValue, ValueKind};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::adapter::{BindableEnum, EnumPolicy, TypeAdapter};
    pub use crate::config::Config;
    pub use crate::error::{BindingError, ErrorCode, Result};
    pub use crate::lazy::LazyVal;
    pub use crate::property::{BindingOptions, DefaultPolicy, Optional, PropertyBuilder, Required, StoreResolver};
    pub use crate::registry::AdapterRegistry;
    pub use crate::store::{KeyValueStore, MemoryStore};
    pub use crate::value::StoreValue;
}
