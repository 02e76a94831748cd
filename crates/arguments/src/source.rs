//! Resolution of an arguments bundle from a source object

use crate::host::{Activity, ArgumentsAware, Fragment};
use jetpack_bundles::Bundle;
use jetpack_core::{BindingError, Result, StoreResolver};
use jetpack_intents::Intent;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Source kinds an argument binding can read from.
#[derive(Clone)]
pub enum ArgumentsSource {
    /// The bundle itself
    Bundle(Bundle),
    /// The intent's extras
    Intent(Intent),
    /// The extras of the activity's current intent
    Activity(Activity),
    /// The fragment's arguments
    Fragment(Fragment),
    /// Any other [`ArgumentsAware`] host
    Aware(Rc<dyn ArgumentsAware>),
}

impl ArgumentsSource {
    /// Recognize a source object by its concrete type.
    ///
    /// # Errors
    ///
    /// [`BindingError::UnrecognizedSourceKind`] when `source` is none of the
    /// supported kinds.
    pub fn from_any<T: Any>(source: &T) -> Result<Self> {
        let source: &dyn Any = source;

        if let Some(source) = source.downcast_ref::<ArgumentsSource>() {
            return Ok(source.clone());
        }
        if let Some(bundle) = source.downcast_ref::<Bundle>() {
            return Ok(Self::Bundle(bundle.clone()));
        }
        if let Some(intent) = source.downcast_ref::<Intent>() {
            return Ok(Self::Intent(intent.clone()));
        }
        if let Some(activity) = source.downcast_ref::<Activity>() {
            return Ok(Self::Activity(activity.clone()));
        }
        if let Some(fragment) = source.downcast_ref::<Fragment>() {
            return Ok(Self::Fragment(fragment.clone()));
        }
        if let Some(aware) = source.downcast_ref::<Rc<dyn ArgumentsAware>>() {
            return Ok(Self::Aware(Rc::clone(aware)));
        }

        Err(BindingError::unrecognized_source::<T>())
    }

    fn attach(host: &dyn ArgumentsAware) -> Bundle {
        match host.arguments() {
            Some(arguments) => arguments,
            None => {
                let arguments = Bundle::new();
                host.set_arguments(Some(arguments.clone()));
                debug!("Attached fresh arguments bundle");
                arguments
            }
        }
    }
}

impl StoreResolver for ArgumentsSource {
    type Store = Bundle;

    fn resolve(&self) -> Result<Option<Bundle>> {
        Ok(match self {
            Self::Bundle(bundle) => Some(bundle.clone()),
            Self::Intent(intent) => intent.extras(),
            Self::Activity(activity) => activity.intent().extras(),
            Self::Fragment(fragment) => fragment.arguments(),
            Self::Aware(host) => host.arguments(),
        })
    }

    fn resolve_or_attach(&self) -> Result<Bundle> {
        Ok(match self {
            Self::Bundle(bundle) => bundle.clone(),
            Self::Intent(intent) => intent.extras_or_attach(),
            Self::Activity(activity) => activity.intent().extras_or_attach(),
            Self::Fragment(fragment) => Self::attach(fragment),
            Self::Aware(host) => Self::attach(host.as_ref()),
        })
    }

    fn describe(&self) -> String {
        match self {
            Self::Bundle(_) => "Bundle".to_string(),
            Self::Intent(intent) => intent.describe(),
            Self::Activity(_) => "Activity".to_string(),
            Self::Fragment(_) => "Fragment".to_string(),
            Self::Aware(_) => "ArgumentsAware".to_string(),
        }
    }
}

impl From<Bundle> for ArgumentsSource {
    fn from(bundle: Bundle) -> Self {
        Self::Bundle(bundle)
    }
}

impl From<Intent> for ArgumentsSource {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}

impl From<Activity> for ArgumentsSource {
    fn from(activity: Activity) -> Self {
        Self::Activity(activity)
    }
}

impl From<Fragment> for ArgumentsSource {
    fn from(fragment: Fragment) -> Self {
        Self::Fragment(fragment)
    }
}

impl From<Rc<dyn ArgumentsAware>> for ArgumentsSource {
    fn from(host: Rc<dyn ArgumentsAware>) -> Self {
        Self::Aware(host)
    }
}

impl fmt::Debug for ArgumentsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
