//! Read-only value resolved once on first access
//!
//! [`LazyVal`] runs its initializer the first time it is read and keeps the
//! outcome for its whole lifetime, including an absent outcome. A failed
//! initializer is not cached; the next read tries again.

use crate::error::Result;
use once_cell::unsync::OnceCell;
use std::fmt;

/// Lazily computed, possibly absent value.
pub struct LazyVal<V> {
    initializer: Box<dyn Fn() -> Result<Option<V>>>,
    value: OnceCell<Option<V>>,
}

impl<V> LazyVal<V> {
    /// Create a value computed by `initializer` on first read
    pub fn new(initializer: impl Fn() -> Result<Option<V>> + 'static) -> Self {
        Self {
            initializer: Box::new(initializer),
            value: OnceCell::new(),
        }
    }

    /// Create an already resolved value
    pub fn resolved(value: Option<V>) -> Self {
        Self {
            initializer: Box::new(|| Ok(None)),
            value: OnceCell::with_value(value),
        }
    }

    /// Read the value, running the initializer if this is the first read
    pub fn get(&self) -> Result<Option<&V>> {
        self.value
            .get_or_try_init(|| (self.initializer)())
            .map(Option::as_ref)
    }

    /// Whether the initializer has already succeeded
    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<V: fmt::Debug> fmt::Debug for LazyVal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyVal")
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindingError;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_initializer_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lazy = LazyVal::new(move || {
            counter.set(counter.get() + 1);
            Ok(Some(12))
        });

        assert!(!lazy.is_resolved());
        assert_eq!(lazy.get().unwrap(), Some(&12));
        assert_eq!(lazy.get().unwrap(), Some(&12));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_absent_value_is_cached() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lazy: LazyVal<String> = LazyVal::new(move || {
            counter.set(counter.get() + 1);
            Ok(None)
        });

        assert_eq!(lazy.get().unwrap(), None);
        assert_eq!(lazy.get().unwrap(), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failure_is_retried() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lazy = LazyVal::new(move || {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                Err(BindingError::missing("first"))
            } else {
                Ok(Some(1))
            }
        });

        assert!(lazy.get().is_err());
        assert_eq!(lazy.get().unwrap(), Some(&1));
        assert!(LazyVal::resolved(Some(3)).is_resolved());
    }
}
