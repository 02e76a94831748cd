//! Resolution of a preference store from a source object

use crate::manager::PreferenceManager;
use crate::store::Preferences;
use jetpack_core::{BindingError, Result, StoreResolver};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Custom capability: anything exposing a preference store.
pub trait PreferencesAware {
    fn preferences(&self) -> Result<Preferences>;
}

/// Source kinds a preference binding can read from.
#[derive(Clone)]
pub enum PreferencesSource {
    /// The store itself
    Preferences(Preferences),
    /// The manager's default store
    Manager(PreferenceManager),
    /// Any other [`PreferencesAware`] host
    Aware(Rc<dyn PreferencesAware>),
}

impl PreferencesSource {
    /// Recognize a source object by its concrete type.
    ///
    /// # Errors
    ///
    /// [`BindingError::UnrecognizedSourceKind`] for unsupported types.
    pub fn from_any<T: Any>(source: &T) -> Result<Self> {
        let source: &dyn Any = source;

        if let Some(source) = source.downcast_ref::<PreferencesSource>() {
            return Ok(source.clone());
        }
        if let Some(preferences) = source.downcast_ref::<Preferences>() {
            return Ok(Self::Preferences(preferences.clone()));
        }
        if let Some(manager) = source.downcast_ref::<PreferenceManager>() {
            return Ok(Self::Manager(manager.clone()));
        }
        if let Some(aware) = source.downcast_ref::<Rc<dyn PreferencesAware>>() {
            return Ok(Self::Aware(Rc::clone(aware)));
        }

        Err(BindingError::unrecognized_source::<T>())
    }
}

impl StoreResolver for PreferencesSource {
    type Store = Preferences;

    fn resolve(&self) -> Result<Option<Preferences>> {
        self.resolve_or_attach().map(Some)
    }

    fn resolve_or_attach(&self) -> Result<Preferences> {
        match self {
            Self::Preferences(preferences) => Ok(preferences.clone()),
            Self::Manager(manager) => manager.default_preferences(),
            Self::Aware(host) => host.preferences(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Preferences(preferences) => format!("Preferences({})", preferences.name()),
            Self::Manager(_) => "PreferenceManager".to_string(),
            Self::Aware(_) => "PreferencesAware".to_string(),
        }
    }
}

impl From<Preferences> for PreferencesSource {
    fn from(preferences: Preferences) -> Self {
        Self::Preferences(preferences)
    }
}

impl From<PreferenceManager> for PreferencesSource {
    fn from(manager: PreferenceManager) -> Self {
        Self::Manager(manager)
    }
}

impl From<Rc<dyn PreferencesAware>> for PreferencesSource {
    fn from(host: Rc<dyn PreferencesAware>) -> Self {
        Self::Aware(host)
    }
}

impl fmt::Debug for PreferencesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
