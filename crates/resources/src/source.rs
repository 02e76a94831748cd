//! Resolution of a resource table from a source object

use crate::table::Resources;
use jetpack_core::{BindingError, Result, StoreResolver};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Custom capability: anything exposing a resource table.
pub trait ResourcesAware {
    fn resources(&self) -> Resources;
}

/// Source kinds a resource binding can read from.
#[derive(Clone)]
pub enum ResourcesSource {
    Resources(Resources),
    Aware(Rc<dyn ResourcesAware>),
}

impl ResourcesSource {
    /// Recognize a source object by its concrete type.
    ///
    /// # Errors
    ///
    /// [`BindingError::UnrecognizedSourceKind`] for unsupported types.
    pub fn from_any<T: Any>(source: &T) -> Result<Self> {
        let source: &dyn Any = source;

        if let Some(source) = source.downcast_ref::<ResourcesSource>() {
            return Ok(source.clone());
        }
        if let Some(resources) = source.downcast_ref::<Resources>() {
            return Ok(Self::Resources(resources.clone()));
        }
        if let Some(aware) = source.downcast_ref::<Rc<dyn ResourcesAware>>() {
            return Ok(Self::Aware(Rc::clone(aware)));
        }

        Err(BindingError::unrecognized_source::<T>())
    }

    /// The table behind this source
    pub fn resources(&self) -> Resources {
        match self {
            Self::Resources(resources) => resources.clone(),
            Self::Aware(host) => host.resources(),
        }
    }
}

impl StoreResolver for ResourcesSource {
    type Store = Resources;

    fn resolve(&self) -> Result<Option<Resources>> {
        Ok(Some(self.resources()))
    }

    fn resolve_or_attach(&self) -> Result<Resources> {
        Ok(self.resources())
    }

    fn describe(&self) -> String {
        match self {
            Self::Resources(_) => "Resources".to_string(),
            Self::Aware(_) => "ResourcesAware".to_string(),
        }
    }
}

impl From<Resources> for ResourcesSource {
    fn from(resources: Resources) -> Self {
        Self::Resources(resources)
    }
}

impl From<Rc<dyn ResourcesAware>> for ResourcesSource {
    fn from(host: Rc<dyn ResourcesAware>) -> Self {
        Self::Aware(host)
    }
}

impl fmt::Debug for ResourcesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
