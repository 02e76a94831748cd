//! Argument hosts: screens that carry an arguments bundle

use jetpack_bundles::Bundle;
use jetpack_intents::Intent;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Custom capability: anything exposing an optional, replaceable arguments bundle.
pub trait ArgumentsAware {
    /// Current arguments, if any
    fn arguments(&self) -> Option<Bundle>;

    /// Attach `arguments`, replacing the previous bundle
    fn set_arguments(&self, arguments: Option<Bundle>);
}

/// Screen started by an intent; its arguments are the intent's extras.
#[derive(Clone)]
pub struct Activity {
    intent: Rc<RefCell<Intent>>,
}

impl Activity {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent: Rc::new(RefCell::new(intent)),
        }
    }

    /// Intent the activity was started with
    pub fn intent(&self) -> Intent {
        self.intent.borrow().clone()
    }

    /// Swap the intent; bindings that already resolved keep the old extras
    pub fn set_intent(&self, intent: Intent) {
        *self.intent.borrow_mut() = intent;
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self::new(Intent::empty())
    }
}

impl fmt::Debug for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activity").field("intent", &self.intent.borrow()).finish()
    }
}

/// Screen fragment holding an optional arguments bundle.
#[derive(Clone, Default)]
pub struct Fragment {
    arguments: Rc<RefCell<Option<Bundle>>>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arguments(arguments: Bundle) -> Self {
        let fragment = Self::new();
        fragment.set_arguments(Some(arguments));
        fragment
    }
}

impl ArgumentsAware for Fragment {
    fn arguments(&self) -> Option<Bundle> {
        self.arguments.borrow().clone()
    }

    fn set_arguments(&self, arguments: Option<Bundle>) {
        *self.arguments.borrow_mut() = arguments;
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("arguments", &self.arguments.borrow())
            .finish()
    }
}
