//! Keyed lookup of theme states.

use std::cell::RefCell;
use std::collections::HashMap;

use super::store::ThemeState;
use crate::persist::PersistenceAdapter;
use crate::theme::{Theme, ThemeName};

/// Hands out one [`ThemeState`] per key.
///
/// Hosts that address theme states by name (for example one per window or
/// per document type) use a registry so that every lookup of the same key
/// shares one record, and the persisted override is loaded only once.
///
/// ```rust
/// use shade::persist::PersistenceAdapter;
/// use shade::{StateRegistry, Theme};
///
/// let registry = StateRegistry::<Theme>::new(PersistenceAdapter::memory());
/// let a = registry.state("theme");
/// let b = registry.state("theme");
/// assert!(a.same_state(&b));
/// ```
#[derive(Debug)]
pub struct StateRegistry<T: ThemeName = Theme> {
    persistence: PersistenceAdapter,
    states: RefCell<HashMap<String, ThemeState<T>>>,
}

impl<T: ThemeName> StateRegistry<T> {
    /// Create an empty registry persisting through `persistence`.
    pub fn new(persistence: PersistenceAdapter) -> Self {
        Self {
            persistence,
            states: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the state for `key`, creating it on first use.
    pub fn state(&self, key: &str) -> ThemeState<T> {
        if let Some(state) = self.states.borrow().get(key) {
            return state.clone();
        }
        let state = ThemeState::new(key, self.persistence.clone());
        self.states
            .borrow_mut()
            .insert(key.to_string(), state.clone());
        state
    }

    /// Returns true if a state for `key` has been created.
    pub fn contains(&self, key: &str) -> bool {
        self.states.borrow().contains_key(key)
    }

    /// Number of states created so far.
    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    /// Returns true if no state has been created.
    pub fn is_empty(&self) -> bool {
        self.states.borrow().is_empty()
    }
}
