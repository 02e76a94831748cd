//! Resource tables loaded from TOML
//!
//! ```toml
//! [[resource]]
//! id = 0x7f010001
//! name = "app_name"
//! type = "string"
//! value = "Pantry"
//!
//! [[resource]]
//! id = 0x7f020001
//! name = "padding"
//! type = "dimen"
//! value = "16dp"
//! ```
//!
//! Types: `bool`, `color`, `dimen`, `integer`, `integer-array`, `string`,
//! `string-array`.

use crate::value::{parse_color, ResourceId, ResourceValue};
use jetpack_core::config::ResourcesConfig;
use jetpack_core::{BindingError, KeyValueStore, Result, StoreValue};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    resource: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: u32,
    name: String,
    #[serde(rename = "type")]
    kind: RawKind,
    value: toml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RawKind {
    Bool,
    Color,
    Dimen,
    Integer,
    IntegerArray,
    String,
    StringArray,
}

impl RawEntry {
    fn into_value(self) -> Result<(ResourceId, String, ResourceValue)> {
        let id = ResourceId(self.id);
        let invalid = |expected: &str| {
            BindingError::config(format!("Resource {} ({id}) expects {expected}", self.name))
        };

        let value = match (self.kind, &self.value) {
            (RawKind::Bool, toml::Value::Boolean(b)) => ResourceValue::Bool(*b),
            (RawKind::Color, toml::Value::String(text)) => ResourceValue::Color(parse_color(text)?),
            (RawKind::Dimen, toml::Value::String(text)) => ResourceValue::Dimension(text.parse()?),
            (RawKind::Integer, toml::Value::Integer(n)) => {
                ResourceValue::Integer(i32::try_from(*n).map_err(|_| invalid("a 32-bit integer"))?)
            }
            (RawKind::IntegerArray, toml::Value::Array(items)) => ResourceValue::IntArray(
                items
                    .iter()
                    .map(|item| item.as_integer().and_then(|n| i32::try_from(n).ok()))
                    .collect::<Option<_>>()
                    .ok_or_else(|| invalid("an array of 32-bit integers"))?,
            ),
            (RawKind::String, toml::Value::String(text)) => ResourceValue::String(text.clone()),
            (RawKind::StringArray, toml::Value::Array(items)) => ResourceValue::StringArray(
                items
                    .iter()
                    .map(|item| item.as_str().map(String::from))
                    .collect::<Option<_>>()
                    .ok_or_else(|| invalid("an array of strings"))?,
            ),
            (kind, _) => return Err(invalid(&format!("a value of type {kind:?}"))),
        };

        Ok((id, self.name, value))
    }
}

struct Entry {
    name: String,
    value: ResourceValue,
}

struct Table {
    entries: HashMap<ResourceId, Entry>,
    names: HashMap<String, ResourceId>,
    density: f32,
    scaled_density: f32,
}

/// Shared handle to a read-only resource table.
#[derive(Clone)]
pub struct Resources {
    table: Rc<Table>,
}

impl Resources {
    /// Empty table at density 1
    pub fn empty() -> Self {
        Self::from_entries(Vec::new(), 1.0, None)
    }

    /// Parse a TOML resource table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)?;
        let entries = file
            .resource
            .into_iter()
            .map(RawEntry::into_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_entries(entries, 1.0, None))
    }

    /// Load a TOML resource table from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let resources = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), entries = resources.len(), "Loaded resource table");
        Ok(resources)
    }

    /// Table and densities described by the `[resources]` configuration section
    pub fn from_config(config: &ResourcesConfig) -> Result<Self> {
        let resources = match &config.table {
            Some(path) => Self::load(path)?,
            None => Self::empty(),
        };
        Ok(resources.with_density(config.density, config.scaled_density))
    }

    /// Same entries at another density
    #[must_use]
    pub fn with_density(&self, density: f32, scaled_density: Option<f32>) -> Self {
        let entries = self
            .table
            .entries
            .iter()
            .map(|(id, entry)| (*id, entry.name.clone(), entry.value.clone()))
            .collect();
        Self::from_entries(entries, density, scaled_density)
    }

    fn from_entries(entries: Vec<(ResourceId, String, ResourceValue)>, density: f32, scaled_density: Option<f32>) -> Self {
        let mut table = Table {
            entries: HashMap::with_capacity(entries.len()),
            names: HashMap::with_capacity(entries.len()),
            density,
            scaled_density: scaled_density.unwrap_or(density),
        };
        for (id, name, value) in entries {
            table.names.insert(name.clone(), id);
            table.entries.insert(id, Entry { name, value });
        }
        Self { table: Rc::new(table) }
    }

    pub fn density(&self) -> f32 {
        self.table.density
    }

    pub fn scaled_density(&self) -> f32 {
        self.table.scaled_density
    }

    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// Identifier of the resource called `name`
    pub fn id_of(&self, name: &str) -> Option<ResourceId> {
        self.table.names.get(name).copied()
    }

    pub fn name_of(&self, id: ResourceId) -> Option<&str> {
        self.table.entries.get(&id).map(|entry| entry.name.as_str())
    }

    /// Raw value for `id`
    ///
    /// # Errors
    ///
    /// [`BindingError::MissingRequiredValue`] when the table has no such id.
    pub fn value(&self, id: ResourceId) -> Result<&ResourceValue> {
        self.table
            .entries
            .get(&id)
            .map(|entry| &entry.value)
            .ok_or_else(|| BindingError::missing(id.to_string()))
    }

    pub fn get_boolean(&self, id: ResourceId) -> Result<bool> {
        match self.value(id)? {
            ResourceValue::Bool(b) => Ok(*b),
            other => Err(mismatch(id, "bool", other)),
        }
    }

    /// ARGB color
    pub fn get_color(&self, id: ResourceId) -> Result<u32> {
        match self.value(id)? {
            ResourceValue::Color(color) => Ok(*color),
            other => Err(mismatch(id, "color", other)),
        }
    }

    /// Dimension in pixels at this table's density
    pub fn get_dimension(&self, id: ResourceId) -> Result<f32> {
        match self.value(id)? {
            ResourceValue::Dimension(dimension) => Ok(dimension.to_px(self.table.density, self.table.scaled_density)),
            other => Err(mismatch(id, "dimen", other)),
        }
    }

    /// Dimension in whole pixels, truncated
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_dimension_pixel_offset(&self, id: ResourceId) -> Result<i32> {
        Ok(self.get_dimension(id)?.trunc() as i32)
    }

    /// Dimension in whole pixels, rounded; never zero for a non-zero dimension
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_dimension_pixel_size(&self, id: ResourceId) -> Result<i32> {
        let px = self.get_dimension(id)?;
        let rounded = (px + 0.5).floor() as i32;
        Ok(match rounded {
            0 if px > 0.0 => 1,
            0 if px < 0.0 => -1,
            n => n,
        })
    }

    pub fn get_integer(&self, id: ResourceId) -> Result<i32> {
        match self.value(id)? {
            ResourceValue::Integer(n) => Ok(*n),
            other => Err(mismatch(id, "integer", other)),
        }
    }

    pub fn get_int_array(&self, id: ResourceId) -> Result<Vec<i32>> {
        match self.value(id)? {
            ResourceValue::IntArray(items) => Ok(items.clone()),
            other => Err(mismatch(id, "integer-array", other)),
        }
    }

    pub fn get_string(&self, id: ResourceId) -> Result<String> {
        match self.value(id)? {
            ResourceValue::String(text) => Ok(text.clone()),
            other => Err(mismatch(id, "string", other)),
        }
    }

    pub fn get_string_array(&self, id: ResourceId) -> Result<Vec<String>> {
        match self.value(id)? {
            ResourceValue::StringArray(items) => Ok(items.clone()),
            other => Err(mismatch(id, "string-array", other)),
        }
    }

    /// Text resource; plain strings carry no styling here
    pub fn get_text(&self, id: ResourceId) -> Result<String> {
        self.get_string(id)
    }

    pub fn get_text_array(&self, id: ResourceId) -> Result<Vec<String>> {
        self.get_string_array(id)
    }
}

fn mismatch(id: ResourceId, expected: &str, found: &ResourceValue) -> BindingError {
    BindingError::TypeMismatch {
        key: id.to_string(),
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

/// Read-only view by resource name
impl KeyValueStore for Resources {
    fn get(&self, key: &str) -> Option<StoreValue> {
        let id = self.id_of(key)?;
        Some(match self.value(id).ok()? {
            ResourceValue::Bool(b) => StoreValue::Bool(*b),
            ResourceValue::Color(color) => StoreValue::Long(i64::from(*color)),
            ResourceValue::Dimension(_) => StoreValue::Float(self.get_dimension(id).ok()?),
            ResourceValue::Integer(n) => StoreValue::Int(*n),
            ResourceValue::IntArray(items) => StoreValue::IntArray(items.clone()),
            ResourceValue::String(text) => StoreValue::String(text.clone()),
            ResourceValue::StringArray(items) => StoreValue::StringArray(items.clone()),
        })
    }

    fn contains(&self, key: &str) -> bool {
        self.id_of(key).is_some()
    }

    fn put(&self, key: &str, value: StoreValue) -> Result<()> {
        Err(read_only(key, &value.kind().to_string()))
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Err(read_only(key, "any"))
    }

    fn clear(&self) -> Result<()> {
        Err(read_only("*", "any"))
    }

    fn keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.names.keys().cloned().collect();
        names.sort();
        names
    }
}

fn read_only(key: &str, kind: &str) -> BindingError {
    BindingError::RejectedValue {
        key: key.to_string(),
        kind: kind.to_string(),
        store: "Resources (read-only)".to_string(),
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("entries", &self.table.entries.len())
            .field("density", &self.table.density)
            .field("scaled_density", &self.table.scaled_density)
            .finish()
    }
}
