//! Named preference stores, memoized per name

use crate::store::Preferences;
use jetpack_core::config::PreferencesConfig;
use jetpack_core::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

struct ManagerState {
    directory: Option<PathBuf>,
    default_name: String,
    stores: RefCell<HashMap<String, Preferences>>,
}

/// Hands out one [`Preferences`] handle per name.
///
/// With a directory, store `name` is persisted as `<directory>/<name>.json`;
/// without one, stores live in memory.
#[derive(Clone)]
pub struct PreferenceManager {
    state: Rc<ManagerState>,
}

impl PreferenceManager {
    /// Manager for in-memory stores
    pub fn in_memory() -> Self {
        Self::build(None, "default".to_string())
    }

    /// Manager persisting stores under `directory`
    pub fn with_directory(directory: impl AsRef<Path>) -> Self {
        Self::build(Some(directory.as_ref().to_path_buf()), "default".to_string())
    }

    /// Manager described by the `[preferences]` configuration section
    pub fn from_config(config: &PreferencesConfig) -> Self {
        Self::build(config.directory.clone(), config.default_name.clone())
    }

    fn build(directory: Option<PathBuf>, default_name: String) -> Self {
        Self {
            state: Rc::new(ManagerState {
                directory,
                default_name,
                stores: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.state.directory.as_deref()
    }

    /// Store named `name`; repeated calls return the same handle
    pub fn preferences(&self, name: &str) -> Result<Preferences> {
        if let Some(store) = self.state.stores.borrow().get(name) {
            return Ok(store.clone());
        }

        let store = match &self.state.directory {
            Some(directory) => Preferences::open(directory.join(format!("{name}.json")))?,
            None => Preferences::named(name),
        };

        self.state
            .stores
            .borrow_mut()
            .insert(name.to_string(), store.clone());
        Ok(store)
    }

    /// Store under the configured default name
    pub fn default_preferences(&self) -> Result<Preferences> {
        self.preferences(&self.state.default_name)
    }
}

impl Default for PreferenceManager {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for PreferenceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceManager")
            .field("directory", &self.state.directory)
            .field("default_name", &self.state.default_name)
            .field("stores", &self.state.stores.borrow().len())
            .finish()
    }
}
