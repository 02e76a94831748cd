//! Property bindings over preference stores
//!
//! - [`Preferences`]: a named table of primitive values, in memory or persisted as JSON
//! - [`PreferenceManager`]: named stores memoized per name, plus a default store
//! - [`PreferencesAware`]: capability for custom hosts
//! - `bind_*_preference`: typed bindings with zero-value defaults
//!
//! # Example
//!
//! ```rust
//! use jetpack_preferences::{bind_int_preference, bind_optional_preference, Preferences};
//!
//! let prefs = Preferences::in_memory();
//! let launches = bind_int_preference(prefs.clone(), "launches")?;
//! let nickname = bind_optional_preference::<String>(prefs.clone(), "nickname")?;
//!
//! assert_eq!(launches.get()?, 0);
//! launches.set(launches.get()? + 1)?;
//! assert_eq!(prefs.get_int("launches", 0), 1);
//! assert_eq!(nickname.get()?, None);
//! # Ok::<(), jetpack_core::BindingError>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod manager;
pub mod source;
pub mod store;

pub use manager::PreferenceManager;
pub use source::{PreferencesAware, PreferencesSource};
pub use store::{Editor, Preferences};

use jetpack_core::{BindableEnum, EnumPolicy, JsonAdapter, Optional, PropertyBuilder, Required, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;

/// Binding on a preference source
pub type PreferenceBuilder<V> = PropertyBuilder<V, PreferencesSource>;

/// Start a preference binding for `property` on `source`
pub fn bind_preference<V: Clone + 'static>(source: impl Into<PreferencesSource>, property: &str) -> PreferenceBuilder<V> {
    PropertyBuilder::new(source.into(), property)
}

/// Optional preference binding with no default
pub fn bind_optional_preference<V: Clone + 'static>(
    source: impl Into<PreferencesSource>,
    property: &str,
) -> Result<Optional<V, PreferencesSource>> {
    bind_preference(source, property).optional()
}

/// Boolean preference, `false` when unset
pub fn bind_boolean_preference(
    source: impl Into<PreferencesSource>,
    property: &str,
) -> Result<Required<bool, PreferencesSource>> {
    bind_preference(source, property).with_default(false).required()
}

/// Integer preference, `0` when unset
pub fn bind_int_preference(source: impl Into<PreferencesSource>, property: &str) -> Result<Required<i32, PreferencesSource>> {
    bind_preference(source, property).with_default(0).required()
}

pub fn bind_long_preference(source: impl Into<PreferencesSource>, property: &str) -> Result<Required<i64, PreferencesSource>> {
    bind_preference(source, property).with_default(0_i64).required()
}

pub fn bind_float_preference(source: impl Into<PreferencesSource>, property: &str) -> Result<Required<f32, PreferencesSource>> {
    bind_preference(source, property).with_default(0.0_f32).required()
}

/// String preference, empty when unset
pub fn bind_string_preference(
    source: impl Into<PreferencesSource>,
    property: &str,
) -> Result<Required<String, PreferencesSource>> {
    bind_preference(source, property).with_default(String::new()).required()
}

pub fn bind_string_set_preference(
    source: impl Into<PreferencesSource>,
    property: &str,
) -> Result<Required<BTreeSet<String>, PreferencesSource>> {
    bind_preference(source, property).with_default(BTreeSet::new()).required()
}

/// Enum preference stored by constant name; unknown names fail or fall back per `policy`
pub fn bind_enum_preference<E: BindableEnum>(
    source: impl Into<PreferencesSource>,
    property: &str,
    default: E,
    policy: EnumPolicy,
) -> Result<Required<E, PreferencesSource>> {
    bind_preference(source, property)
        .enumeration()
        .enum_policy(policy)
        .with_default(default)
        .required()
}

/// Structured preference stored as JSON text
pub fn bind_json_preference<T>(source: impl Into<PreferencesSource>, property: &str) -> Result<Optional<T, PreferencesSource>>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    bind_preference(source, property)
        .adapter(JsonAdapter::<T>::new())
        .optional()
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        bind_boolean_preference, bind_enum_preference, bind_float_preference, bind_int_preference,
        bind_json_preference, bind_long_preference, bind_optional_preference, bind_preference,
        bind_string_preference, bind_string_set_preference, PreferenceManager, Preferences,
        PreferencesAware, PreferencesSource,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetpack_core::{DefaultPolicy, ErrorCode, KeyValueStore, StoreValue};
    use serde::Deserialize;
    use std::rc::Rc;

    jetpack_core::bindable_enum! {
        enum Theme { Light, Dark }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Account {
        email: String,
        verified: bool,
    }

    struct Screen {
        manager: PreferenceManager,
    }

    impl PreferencesAware for Screen {
        fn preferences(&self) -> Result<Preferences> {
            self.manager.preferences("screen")
        }
    }

    #[test]
    fn test_typed_wrappers_default_to_zero_values() {
        let prefs = Preferences::in_memory();

        assert!(!bind_boolean_preference(prefs.clone(), "boolean").unwrap().get().unwrap());
        assert_eq!(bind_int_preference(prefs.clone(), "int").unwrap().get().unwrap(), 0);
        assert_eq!(bind_long_preference(prefs.clone(), "long").unwrap().get().unwrap(), 0);
        assert!(bind_float_preference(prefs.clone(), "float").unwrap().get().unwrap().abs() < f32::EPSILON);
        assert_eq!(bind_string_preference(prefs.clone(), "string").unwrap().get().unwrap(), "");
        assert!(bind_string_set_preference(prefs.clone(), "set").unwrap().get().unwrap().is_empty());
        assert!(prefs.keys().is_empty());
    }

    #[test]
    fn test_typed_wrappers_write_then_read() {
        let prefs = Preferences::in_memory();
        let boolean = bind_boolean_preference(prefs.clone(), "boolean").unwrap();
        let string_set = bind_string_set_preference(prefs.clone(), "set").unwrap();
        let long = bind_long_preference(prefs.clone(), "long").unwrap();

        boolean.set(true).unwrap();
        string_set
            .set(["rarity", "applejack"].into_iter().map(String::from).collect())
            .unwrap();
        long.set(37).unwrap();

        assert!(boolean.get().unwrap());
        assert_eq!(string_set.get().unwrap().len(), 2);
        assert_eq!(long.get().unwrap(), 37);
        assert!(prefs.get_boolean("boolean", false));
    }

    #[test]
    fn test_double_rejected_by_store() {
        let prefs = Preferences::in_memory();
        let ratio = bind_preference::<f64>(prefs.clone(), "ratio").optional().unwrap();

        let err = ratio.set(Some(0.5)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RejectedValue);
        assert!(ratio.property().is_dirty());
        assert!(!prefs.contains("ratio"));
    }

    #[test]
    fn test_enum_preference_policies() {
        let prefs = Preferences::in_memory();
        prefs.put("theme", StoreValue::from("Sepia")).unwrap();

        let strict = bind_enum_preference(prefs.clone(), "theme", Theme::Light, EnumPolicy::Strict).unwrap();
        assert_eq!(strict.get().unwrap_err().code(), ErrorCode::EnumDecodeFailure);

        let lenient = bind_enum_preference(prefs.clone(), "theme", Theme::Light, EnumPolicy::Lenient).unwrap();
        assert_eq!(lenient.get().unwrap(), Theme::Light);

        lenient.set(Theme::Dark).unwrap();
        assert_eq!(prefs.get_string("theme").as_deref(), Some("Dark"));
        strict.property().invalidate();
        assert_eq!(strict.get().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_json_preference() {
        let prefs = Preferences::in_memory();
        let account = bind_json_preference::<Account>(prefs.clone(), "account").unwrap();
        let value = Account {
            email: "twilight@canterlot.eq".to_string(),
            verified: true,
        };

        assert_eq!(account.get().unwrap(), None);
        account.set(Some(value.clone())).unwrap();
        assert_eq!(account.get().unwrap(), Some(value));
        assert!(matches!(prefs.get("account"), Some(StoreValue::String(_))));

        account.remove().unwrap();
        assert!(!prefs.contains("account"));
    }

    #[test]
    fn test_manager_and_aware_sources() {
        let manager = PreferenceManager::in_memory();
        let screen: Rc<dyn PreferencesAware> = Rc::new(Screen {
            manager: manager.clone(),
        });

        bind_int_preference(manager.clone(), "launches").unwrap().set(2).unwrap();
        bind_string_preference(Rc::clone(&screen), "title").unwrap().set("Pantry".to_string()).unwrap();

        assert_eq!(manager.default_preferences().unwrap().get_int("launches", 0), 2);
        assert_eq!(manager.preferences("screen").unwrap().get_string("title").as_deref(), Some("Pantry"));
    }

    #[test]
    fn test_from_any() {
        assert!(matches!(
            PreferencesSource::from_any(&Preferences::in_memory()),
            Ok(PreferencesSource::Preferences(_))
        ));
        assert!(matches!(
            PreferencesSource::from_any(&PreferenceManager::in_memory()),
            Ok(PreferencesSource::Manager(_))
        ));

        let err = PreferencesSource::from_any(&"text").unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnrecognizedSourceKind);
    }

    #[test]
    fn test_materialized_default_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let prefs = Preferences::open(&path).unwrap();

        let volume = bind_preference::<i32>(prefs, "volume")
            .with_default(5)
            .default_policy(DefaultPolicy::Materialize)
            .required()
            .unwrap();
        assert_eq!(volume.get().unwrap(), 5);

        let reopened = Preferences::open(&path).unwrap();
        assert_eq!(reopened.get_int("volume", 0), 5);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let manager = PreferenceManager::with_directory(dir.path());

        bind_string_preference(manager.clone(), "name").unwrap().set("Spike".to_string()).unwrap();

        let reopened = PreferenceManager::with_directory(dir.path());
        let name = bind_string_preference(reopened, "name").unwrap();
        assert_eq!(name.get().unwrap(), "Spike");
    }
}
