//! Property bindings over screen arguments
//!
//! Arguments live in a [`Bundle`] reached through one of several hosts:
//!
//! - a bare [`Bundle`]
//! - an [`Intent`](jetpack_intents::Intent)'s extras
//! - an [`Activity`]'s current intent extras
//! - a [`Fragment`]'s arguments
//! - any custom [`ArgumentsAware`] host
//!
//! A write to a host without arguments attaches a fresh bundle first.
//!
//! # Example
//!
//! ```rust
//! use jetpack_arguments::{bind_argument, Fragment};
//!
//! let fragment = Fragment::new();
//! let count = bind_argument::<i32>(fragment.clone(), "count")
//!     .with_default(7)
//!     .required()?;
//!
//! assert_eq!(count.get()?, 7);
//! count.set(42)?;
//! assert_eq!(count.get()?, 42);
//! # Ok::<(), jetpack_core::BindingError>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod host;
pub mod source;

pub use host::{Activity, ArgumentsAware, Fragment};
pub use jetpack_bundles::Bundle;
pub use source::ArgumentsSource;

use jetpack_core::{BindableEnum, Optional, PropertyBuilder, Result};

/// Start an argument binding for `property` on `source`
pub fn bind_argument<V: Clone + 'static>(
    source: impl Into<ArgumentsSource>,
    property: &str,
) -> PropertyBuilder<V, ArgumentsSource> {
    PropertyBuilder::new(source.into(), property)
}

/// Optional argument binding with no default
pub fn bind_optional_argument<V: Clone + 'static>(
    source: impl Into<ArgumentsSource>,
    property: &str,
) -> Result<Optional<V, ArgumentsSource>> {
    bind_argument(source, property).optional()
}

/// Enum argument stored by constant name; no registration needed
pub fn bind_enum_argument<E: BindableEnum>(
    source: impl Into<ArgumentsSource>,
    property: &str,
) -> PropertyBuilder<E, ArgumentsSource> {
    bind_argument(source, property).enumeration()
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{bind_argument, bind_enum_argument, bind_optional_argument, Activity, ArgumentsAware, ArgumentsSource, Bundle, Fragment};
    pub use jetpack_core::{BindableEnum, Optional, Required, Result};
}
