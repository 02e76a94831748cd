//! Intents: an action plus an optional extras [`Bundle`]
//!
//! An [`Intent`] is a shared handle. Extras are created on the first
//! `put_extra` and can be swapped wholesale with [`Intent::replace_extras`].
//! Enum extras are stored by ordinal, like the bundle helpers.

#![warn(clippy::all)]

use jetpack_bundles::{decode_ordinal, Bundle};
use jetpack_core::{BindableEnum, BindingError, NativeValue, Result, StoreResolver};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

#[derive(Default)]
struct IntentState {
    action: Option<String>,
    extras: Option<Bundle>,
}

/// Shared handle to an intent.
#[derive(Clone, Default)]
pub struct Intent {
    state: Rc<RefCell<IntentState>>,
}

impl Intent {
    /// Create an intent for `action` without extras
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(IntentState {
                action: Some(action.into()),
                extras: None,
            })),
        }
    }

    /// Create an intent without an action
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn action(&self) -> Option<String> {
        self.state.borrow().action.clone()
    }

    pub fn set_action(&self, action: impl Into<String>) {
        self.state.borrow_mut().action = Some(action.into());
    }

    /// Attached extras, if any
    pub fn extras(&self) -> Option<Bundle> {
        self.state.borrow().extras.clone()
    }

    /// Attach `extras`, dropping whatever was attached before
    pub fn replace_extras(&self, extras: Bundle) {
        self.state.borrow_mut().extras = Some(extras);
    }

    /// Detach the extras
    pub fn remove_extras(&self) -> Option<Bundle> {
        self.state.borrow_mut().extras.take()
    }

    /// Attached extras, attaching an empty bundle first if there are none
    pub fn extras_or_attach(&self) -> Bundle {
        let mut state = self.state.borrow_mut();
        state
            .extras
            .get_or_insert_with(|| {
                debug!("Attached fresh extras to intent");
                Bundle::new()
            })
            .clone()
    }

    pub fn put_extra<V: NativeValue>(&self, key: &str, value: V) -> &Self {
        self.extras_or_attach().put_native(key, value);
        self
    }

    pub fn has_extra(&self, key: &str) -> bool {
        self.extras().is_some_and(|extras| extras.contains_key(key))
    }

    pub fn get_extra<V: NativeValue>(&self, key: &str) -> Option<V> {
        self.extras().and_then(|extras| extras.get_native(key))
    }

    pub fn remove_extra(&self, key: &str) -> bool {
        self.extras().is_some_and(|extras| extras.remove(key))
    }

    /// Store `value` by ordinal; `None` leaves the intent untouched
    pub fn put_extra_or_ignore<E: BindableEnum>(&self, key: &str, value: Option<E>) -> &Self {
        if let Some(value) = value {
            self.extras_or_attach().put_enum(key, value);
        }
        self
    }

    /// Enum extra stored by ordinal, `None` when absent
    pub fn get_enum_extra_or_null<E: BindableEnum>(&self, key: &str) -> Result<Option<E>> {
        match self.extras().and_then(|extras| extras.get_value(key)) {
            None => Ok(None),
            Some(value) => decode_ordinal(key, &value).map(Some),
        }
    }

    pub fn get_enum_extra_or_default<E: BindableEnum>(&self, key: &str, default: E) -> Result<E> {
        Ok(self.get_enum_extra_or_null(key)?.unwrap_or(default))
    }

    pub fn get_enum_extra_or_throw<E: BindableEnum>(&self, key: &str) -> Result<E> {
        self.get_enum_extra_or_null(key)?
            .ok_or_else(|| BindingError::missing(key))
    }

    /// Whether two handles refer to the same intent
    pub fn same_intent(&self, other: &Intent) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Intent extras as a binding source
impl StoreResolver for Intent {
    type Store = Bundle;

    fn resolve(&self) -> Result<Option<Bundle>> {
        Ok(self.extras())
    }

    fn resolve_or_attach(&self) -> Result<Bundle> {
        Ok(self.extras_or_attach())
    }

    fn describe(&self) -> String {
        match self.action() {
            Some(action) => format!("Intent({action})"),
            None => "Intent".to_string(),
        }
    }
}

impl fmt::Debug for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Intent")
            .field("action", &state.action)
            .field("extras", &state.extras)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetpack_core::{ErrorCode, PropertyBuilder, StoreValue};

    jetpack_core::bindable_enum! {
        enum Screen { Home, Settings }
    }

    #[test]
    fn test_extras_created_on_first_put() {
        let intent = Intent::new("VIEW");
        assert!(intent.extras().is_none());
        assert!(!intent.has_extra("id"));

        intent.put_extra("id", 7_i64).put_extra("title", "Cake".to_string());
        assert_eq!(intent.get_extra::<i64>("id"), Some(7));
        assert_eq!(intent.get_extra::<String>("title").as_deref(), Some("Cake"));
        assert!(intent.remove_extra("id"));
        assert!(!intent.has_extra("id"));
    }

    #[test]
    fn test_replace_extras_never_merges() {
        let intent = Intent::new("VIEW");
        intent.put_extra("old", true);

        let fresh = Bundle::from_entries([("new", StoreValue::Int(1))]);
        intent.replace_extras(fresh.clone());

        assert!(!intent.has_extra("old"));
        assert!(intent.extras().unwrap().same_bundle(&fresh));
    }

    #[test]
    fn test_enum_extras() {
        let intent = Intent::empty();
        intent.put_extra_or_ignore::<Screen>("none", None);
        intent.put_extra_or_ignore("screen", Some(Screen::Settings));

        assert!(!intent.has_extra("none"));
        assert_eq!(intent.get_enum_extra_or_null::<Screen>("screen").unwrap(), Some(Screen::Settings));
        assert_eq!(intent.get_enum_extra_or_default("none", Screen::Home).unwrap(), Screen::Home);
        assert_eq!(
            intent.get_enum_extra_or_throw::<Screen>("none").unwrap_err().code(),
            ErrorCode::MissingRequiredValue
        );

        intent.put_extra("screen", 5_i32);
        assert_eq!(
            intent.get_enum_extra_or_null::<Screen>("screen").unwrap_err().code(),
            ErrorCode::EnumDecodeFailure
        );
    }

    #[test]
    fn test_binding_attaches_extras_on_write() {
        let intent = Intent::new("EDIT");
        let title = PropertyBuilder::<String, _>::new(intent.clone(), "title")
            .optional()
            .unwrap();

        assert_eq!(title.get().unwrap(), None);
        assert!(intent.extras().is_none());

        title.set(Some("Pie".to_string())).unwrap();
        assert_eq!(intent.get_extra::<String>("title").as_deref(), Some("Pie"));
        assert_eq!(title.get().unwrap().as_deref(), Some("Pie"));
    }
}
