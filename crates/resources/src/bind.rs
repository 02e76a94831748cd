//! Read-only resource bindings resolved once per binding

use crate::source::ResourcesSource;
use crate::table::Resources;
use crate::value::{Dimension, ResourceId, ResourceValue};
use jetpack_core::{BindingError, LazyVal, Result};
use std::fmt;
use tracing::trace;

/// Reader turning a table entry into a binding value
pub type ResourceReader<V> = fn(&Resources, ResourceId) -> Result<V>;

/// Read-only binding to one resource, resolved on first read and kept for its lifetime.
pub struct ResourceVal<V> {
    id: ResourceId,
    value: LazyVal<V>,
}

impl<V: Clone + 'static> ResourceVal<V> {
    /// Binding reading `id` from `source` with `reader`
    pub fn new(source: impl Into<ResourcesSource>, id: ResourceId, reader: ResourceReader<V>) -> Self {
        let source = source.into();
        Self {
            id,
            value: LazyVal::new(move || {
                trace!(%id, "Resolving resource binding");
                reader(&source.resources(), id).map(Some)
            }),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The resource value
    ///
    /// # Errors
    ///
    /// [`BindingError::MissingRequiredValue`] for an unknown id and
    /// [`BindingError::TypeMismatch`] for an entry of another type.
    pub fn get(&self) -> Result<V> {
        self.value
            .get()?
            .cloned()
            .ok_or_else(|| BindingError::missing(self.id.to_string()))
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_resolved()
    }
}

impl<V: fmt::Debug> fmt::Debug for ResourceVal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceVal")
            .field("id", &self.id)
            .field("value", &self.value)
            .finish()
    }
}

/// Types readable from a resource table without naming a reader
pub trait FromResource: Clone + Sized + 'static {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self>;
}

impl FromResource for bool {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self> {
        resources.get_boolean(id)
    }
}

impl FromResource for i32 {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self> {
        resources.get_integer(id)
    }
}

/// Dimensions resolve to pixels
impl FromResource for f32 {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self> {
        resources.get_dimension(id)
    }
}

impl FromResource for String {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self> {
        resources.get_string(id)
    }
}

impl FromResource for Vec<i32> {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self> {
        resources.get_int_array(id)
    }
}

impl FromResource for Vec<String> {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self> {
        resources.get_string_array(id)
    }
}

/// Unscaled dimension as declared
impl FromResource for Dimension {
    fn from_resource(resources: &Resources, id: ResourceId) -> Result<Self> {
        match resources.value(id)? {
            ResourceValue::Dimension(dimension) => Ok(*dimension),
            other => Err(BindingError::TypeMismatch {
                key: id.to_string(),
                expected: "dimen".to_string(),
                found: other.kind().to_string(),
            }),
        }
    }
}

/// Binding for any [`FromResource`] type
pub fn bind_resource<V: FromResource>(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<V> {
    ResourceVal::new(source, id.into(), V::from_resource)
}

pub fn bind_boolean_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<bool> {
    ResourceVal::new(source, id.into(), Resources::get_boolean)
}

/// ARGB color
pub fn bind_color_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<u32> {
    ResourceVal::new(source, id.into(), Resources::get_color)
}

pub fn bind_dimension_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<f32> {
    ResourceVal::new(source, id.into(), Resources::get_dimension)
}

pub fn bind_dimension_pixel_offset_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<i32> {
    ResourceVal::new(source, id.into(), Resources::get_dimension_pixel_offset)
}

pub fn bind_dimension_pixel_size_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<i32> {
    ResourceVal::new(source, id.into(), Resources::get_dimension_pixel_size)
}

pub fn bind_int_array_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<Vec<i32>> {
    ResourceVal::new(source, id.into(), Resources::get_int_array)
}

pub fn bind_integer_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<i32> {
    ResourceVal::new(source, id.into(), Resources::get_integer)
}

pub fn bind_string_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<String> {
    ResourceVal::new(source, id.into(), Resources::get_string)
}

pub fn bind_string_array_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<Vec<String>> {
    ResourceVal::new(source, id.into(), Resources::get_string_array)
}

pub fn bind_text_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<String> {
    ResourceVal::new(source, id.into(), Resources::get_text)
}

pub fn bind_text_array_resource(source: impl Into<ResourcesSource>, id: impl Into<ResourceId>) -> ResourceVal<Vec<String>> {
    ResourceVal::new(source, id.into(), Resources::get_text_array)
}
