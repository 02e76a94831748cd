//! Preference stores and their batch editor

use jetpack_core::{BindingError, KeyValueStore, Result, StoreValue, ValueKind};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

type Table = BTreeMap<String, StoreValue>;

struct PreferencesState {
    name: String,
    path: Option<PathBuf>,
    table: RefCell<Table>,
}

/// Shared handle to a named preference table, optionally backed by a JSON file.
///
/// Only boolean, integer, long, float, string and string set values are
/// accepted. Anything else fails with [`BindingError::RejectedValue`].
#[derive(Clone)]
pub struct Preferences {
    state: Rc<PreferencesState>,
}

impl Preferences {
    /// Unnamed store kept in memory only
    pub fn in_memory() -> Self {
        Self::named("default")
    }

    /// Named store kept in memory only
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_table(name.into(), None, Table::new())
    }

    /// Store persisted at `path`, loading its current contents if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map_or_else(|| "default".to_string(), |stem| stem.to_string_lossy().into_owned());

        let table = if path.exists() {
            let content = fs::read_to_string(path)?;
            let table: Table = serde_json::from_str(&content)?;
            debug!(path = %path.display(), entries = table.len(), "Loaded preferences");
            table
        } else {
            Table::new()
        };

        Ok(Self::with_table(name, Some(path.to_path_buf()), table))
    }

    fn with_table(name: String, path: Option<PathBuf>, table: Table) -> Self {
        Self {
            state: Rc::new(PreferencesState {
                name,
                path,
                table: RefCell::new(table),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.state.path.as_deref()
    }

    /// Start a batch of changes
    pub fn edit(&self) -> Editor {
        Editor {
            preferences: self.clone(),
            clear: false,
            changes: Vec::new(),
        }
    }

    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        self.typed(key).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.typed(key).unwrap_or(default)
    }

    pub fn get_long(&self, key: &str, default: i64) -> i64 {
        self.typed(key).unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.typed(key).unwrap_or(default)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.typed(key)
    }

    pub fn get_string_set(&self, key: &str) -> Option<BTreeSet<String>> {
        self.typed(key)
    }

    /// Snapshot of every entry
    pub fn all(&self) -> BTreeMap<String, StoreValue> {
        self.state.table.borrow().clone()
    }

    /// Whether two handles refer to the same store
    pub fn same_store(&self, other: &Preferences) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn typed<V: jetpack_core::NativeValue>(&self, key: &str) -> Option<V> {
        self.state
            .table
            .borrow()
            .get(key)
            .cloned()
            .and_then(V::from_store)
    }

    fn check(&self, key: &str, value: &StoreValue) -> Result<()> {
        match value.kind() {
            ValueKind::Bool
            | ValueKind::Int
            | ValueKind::Long
            | ValueKind::Float
            | ValueKind::String
            | ValueKind::StringSet => Ok(()),
            kind => Err(BindingError::RejectedValue {
                key: key.to_string(),
                kind: kind.to_string(),
                store: format!("Preferences({})", self.name()),
            }),
        }
    }

    fn commit(&self, clear: bool, changes: Vec<Change>) -> Result<()> {
        for change in &changes {
            if let Change::Put(key, value) = change {
                self.check(key, value)?;
            }
        }

        let mut next = if clear {
            Table::new()
        } else {
            self.state.table.borrow().clone()
        };
        for change in changes {
            match change {
                Change::Put(key, value) => {
                    next.insert(key, value);
                }
                Change::Remove(key) => {
                    next.remove(&key);
                }
            }
        }

        // memory only changes once the file is written
        self.persist(&next)?;
        *self.state.table.borrow_mut() = next;
        Ok(())
    }

    fn persist(&self, table: &Table) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(table)?)?;
        debug!(path = %path.display(), entries = table.len(), "Wrote preferences");
        Ok(())
    }
}

impl KeyValueStore for Preferences {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.state.table.borrow().get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.state.table.borrow().contains_key(key)
    }

    fn put(&self, key: &str, value: StoreValue) -> Result<()> {
        self.edit().put(key, value).apply()
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let present = self.contains(key);
        if present {
            self.edit().remove(key).apply()?;
        }
        Ok(present)
    }

    fn clear(&self) -> Result<()> {
        self.edit().clear().apply()
    }

    fn keys(&self) -> Vec<String> {
        self.state.table.borrow().keys().cloned().collect()
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("name", &self.state.name)
            .field("path", &self.state.path)
            .field("entries", &self.state.table.borrow().len())
            .finish()
    }
}

enum Change {
    Put(String, StoreValue),
    Remove(String),
}

/// Pending batch of changes, committed at once by [`Editor::apply`].
///
/// A `clear()` in the batch runs before every put and remove, wherever it
/// appears.
#[must_use = "changes are only committed by apply()"]
pub struct Editor {
    preferences: Preferences,
    clear: bool,
    changes: Vec<Change>,
}

impl Editor {
    pub fn put(mut self, key: &str, value: StoreValue) -> Self {
        self.changes.push(Change::Put(key.to_string(), value));
        self
    }

    pub fn put_boolean(self, key: &str, value: bool) -> Self {
        self.put(key, StoreValue::Bool(value))
    }

    pub fn put_int(self, key: &str, value: i32) -> Self {
        self.put(key, StoreValue::Int(value))
    }

    pub fn put_long(self, key: &str, value: i64) -> Self {
        self.put(key, StoreValue::Long(value))
    }

    pub fn put_float(self, key: &str, value: f32) -> Self {
        self.put(key, StoreValue::Float(value))
    }

    pub fn put_string(self, key: &str, value: impl Into<String>) -> Self {
        self.put(key, StoreValue::String(value.into()))
    }

    pub fn put_string_set(self, key: &str, value: BTreeSet<String>) -> Self {
        self.put(key, StoreValue::StringSet(value))
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.changes.push(Change::Remove(key.to_string()));
        self
    }

    pub fn clear(mut self) -> Self {
        self.clear = true;
        self
    }

    /// Commit the batch; nothing is changed if any value is rejected
    pub fn apply(self) -> Result<()> {
        self.preferences.commit(self.clear, self.changes)
    }
}
