//! Read-only bindings over resource tables
//!
//! Resources are looked up by [`ResourceId`] in a [`Resources`] table loaded
//! from TOML. Every `bind_*_resource` function returns a [`ResourceVal`]
//! that resolves on first read and keeps the value for its lifetime.
//!
//! # Example
//!
//! ```rust
//! use jetpack_resources::{bind_dimension_pixel_size_resource, bind_string_resource, ResourceId, Resources};
//!
//! let resources = Resources::from_toml_str(r#"
//!     [[resource]]
//!     id = 0x7f010001
//!     name = "title"
//!     type = "string"
//!     value = "Pantry"
//!
//!     [[resource]]
//!     id = 0x7f020001
//!     name = "margin"
//!     type = "dimen"
//!     value = "8dp"
//! "#)?
//! .with_density(2.0, None);
//!
//! let title = bind_string_resource(resources.clone(), ResourceId(0x7f01_0001));
//! let margin = bind_dimension_pixel_size_resource(resources, ResourceId(0x7f02_0001));
//!
//! assert_eq!(title.get()?, "Pantry");
//! assert_eq!(margin.get()?, 16);
//! # Ok::<(), jetpack_core::BindingError>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bind;
pub mod source;
pub mod table;
pub mod value;

pub use bind::{
    bind_boolean_resource, bind_color_resource, bind_dimension_pixel_offset_resource,
    bind_dimension_pixel_size_resource, bind_dimension_resource, bind_int_array_resource,
    bind_integer_resource, bind_resource, bind_string_array_resource, bind_string_resource,
    bind_text_array_resource, bind_text_resource, FromResource, ResourceReader, ResourceVal,
};
pub use source::{ResourcesAware, ResourcesSource};
pub use table::Resources;
pub use value::{parse_color, Dimension, DimensionUnit, ResourceId, ResourceValue};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bind::*;
    pub use crate::{Dimension, ResourceId, Resources, ResourcesAware, ResourcesSource};
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetpack_core::{ErrorCode, PropertyBuilder};
    use std::cell::Cell;
    use std::rc::Rc;

    const TABLE: &str = r##"
[[resource]]
id = 0x7f010001
name = "first_name_label"
type = "string"
value = "First name"

[[resource]]
id = 0x7f010002
name = "planets"
type = "string-array"
value = ["Mercury", "Venus"]

[[resource]]
id = 0x7f020001
name = "gutter"
type = "dimen"
value = "12sp"

[[resource]]
id = 0x7f030001
name = "dark_mode"
type = "bool"
value = true

[[resource]]
id = 0x7f040001
name = "max_items"
type = "integer"
value = 25

[[resource]]
id = 0x7f050001
name = "brand"
type = "color"
value = "#cc112233"

[[resource]]
id = 0x7f060001
name = "steps"
type = "integer-array"
value = [1, 2]
"##;

    /// Host counting how often it hands out its table
    struct Screen {
        resources: Resources,
        lookups: Cell<u32>,
    }

    impl ResourcesAware for Screen {
        fn resources(&self) -> Resources {
            self.lookups.set(self.lookups.get() + 1);
            self.resources.clone()
        }
    }

    fn table() -> Resources {
        Resources::from_toml_str(TABLE).unwrap().with_density(2.0, Some(3.0))
    }

    #[test]
    fn test_every_binding_kind() {
        let resources = table();

        assert_eq!(bind_string_resource(resources.clone(), ResourceId(0x7f01_0001)).get().unwrap(), "First name");
        assert_eq!(bind_text_resource(resources.clone(), ResourceId(0x7f01_0001)).get().unwrap(), "First name");
        assert_eq!(bind_string_array_resource(resources.clone(), ResourceId(0x7f01_0002)).get().unwrap().len(), 2);
        assert_eq!(bind_text_array_resource(resources.clone(), ResourceId(0x7f01_0002)).get().unwrap()[1], "Venus");
        assert!((bind_dimension_resource(resources.clone(), ResourceId(0x7f02_0001)).get().unwrap() - 36.0).abs() < 1e-4);
        assert_eq!(bind_dimension_pixel_offset_resource(resources.clone(), ResourceId(0x7f02_0001)).get().unwrap(), 36);
        assert_eq!(bind_dimension_pixel_size_resource(resources.clone(), ResourceId(0x7f02_0001)).get().unwrap(), 36);
        assert!(bind_boolean_resource(resources.clone(), ResourceId(0x7f03_0001)).get().unwrap());
        assert_eq!(bind_integer_resource(resources.clone(), ResourceId(0x7f04_0001)).get().unwrap(), 25);
        assert_eq!(bind_color_resource(resources.clone(), ResourceId(0x7f05_0001)).get().unwrap(), 0xcc11_2233);
        assert_eq!(bind_int_array_resource(resources, ResourceId(0x7f06_0001)).get().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_generic_binding() {
        let resources = table();

        let max_items = bind_resource::<i32>(resources.clone(), ResourceId(0x7f04_0001));
        let gutter = bind_resource::<Dimension>(resources.clone(), ResourceId(0x7f02_0001));
        let gutter_px = bind_resource::<f32>(resources, ResourceId(0x7f02_0001));

        assert_eq!(max_items.get().unwrap(), 25);
        assert_eq!(gutter.get().unwrap(), Dimension::sp(12.0));
        assert!((gutter_px.get().unwrap() - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolved_once() {
        let screen = Rc::new(Screen {
            resources: table(),
            lookups: Cell::new(0),
        });
        let host: Rc<dyn ResourcesAware> = screen.clone();
        let label = bind_string_resource(Rc::clone(&host), ResourceId(0x7f01_0001));

        assert!(!label.is_resolved());
        assert_eq!(label.get().unwrap(), "First name");
        assert_eq!(label.get().unwrap(), "First name");
        assert!(label.is_resolved());
        assert_eq!(screen.lookups.get(), 1);
    }

    #[test]
    fn test_missing_and_mismatched() {
        let resources = table();

        let missing = bind_string_resource(resources.clone(), ResourceId(0x7f0f_ffff));
        assert_eq!(missing.get().unwrap_err().code(), ErrorCode::MissingRequiredValue);
        assert!(!missing.is_resolved());

        let wrong = bind_integer_resource(resources, ResourceId(0x7f01_0001));
        assert_eq!(wrong.get().unwrap_err().code(), ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_from_any() {
        assert!(matches!(ResourcesSource::from_any(&table()), Ok(ResourcesSource::Resources(_))));

        let err = ResourcesSource::from_any(&0.5_f64).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnrecognizedSourceKind);
        assert!(err.to_string().ends_with("f64"));
    }

    #[test]
    fn test_name_keyed_property_is_read_only() {
        let resources = table();
        let limit = PropertyBuilder::<i32, _>::new(ResourcesSource::from(resources), "max_items")
            .required()
            .unwrap();

        assert_eq!(limit.get().unwrap(), 25);
        assert_eq!(limit.set(30).unwrap_err().code(), ErrorCode::RejectedValue);
        assert_eq!(limit.get().unwrap(), 25);
    }
}
