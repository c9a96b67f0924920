//! Operating-system "prefers dark" observation.
//!
//! A [`PreferenceSource`] reports a boolean preference and notifies
//! listeners when it changes; it is the equivalent of the
//! `(prefers-color-scheme: dark)` media query. The
//! [`SystemPreferenceObserver`] bridges such a source into a theme state's
//! `current` field.
//!
//! Two sources ship with the crate:
//!
//! - [`SystemPreference`]: asks the OS through the `dark-light` crate. The
//!   OS offers no push channel, so the host calls
//!   [`poll`](PreferenceSource::poll) from its event loop.
//! - [`ManualPreference`]: driven by the host (a settings toggle, a test).
//!
//! ```rust
//! use std::rc::Rc;
//! use shade::preference::{ManualPreference, PreferenceSource, SystemPreferenceObserver};
//! use shade::persist::PersistenceAdapter;
//! use shade::{Theme, ThemeState};
//!
//! let state = ThemeState::<Theme>::new("theme", PersistenceAdapter::memory());
//! let source = Rc::new(ManualPreference::new(true));
//!
//! let mut observer = SystemPreferenceObserver::new(state.clone(), source.clone());
//! observer.activate();
//! assert_eq!(state.get().current, Some(Theme::Dark));
//!
//! source.set_prefers_dark(false);
//! assert_eq!(state.get().current, Some(Theme::Light));
//!
//! observer.deactivate();
//! assert_eq!(source.listener_count(), 0);
//! ```

mod manual;
mod observer;
mod system;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub use manual::ManualPreference;
pub use observer::SystemPreferenceObserver;
pub use system::{SystemPreference, ThemeDetector};

/// Callback invoked with the new "prefers dark" value.
pub type PreferenceListener = Rc<dyn Fn(bool)>;

/// Identifies a listener registered on a [`PreferenceSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A boolean "prefers dark" preference with change notification.
pub trait PreferenceSource {
    /// The current preference, or `None` if the source cannot tell.
    fn prefers_dark(&self) -> Option<bool>;

    /// Registers a change listener.
    fn add_listener(&self, listener: PreferenceListener) -> ListenerId;

    /// Removes a listener. Unknown or already removed ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Number of registered listeners.
    fn listener_count(&self) -> usize;

    /// Re-checks the preference and notifies listeners if it changed.
    ///
    /// Sources that push their own changes keep the default, which does
    /// nothing and returns false.
    fn poll(&self) -> bool {
        false
    }
}

/// Listener bookkeeping shared by the built-in sources.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RefCell<Vec<(ListenerId, PreferenceListener)>>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` and returns its id.
    pub fn add(&self, listener: PreferenceListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Removes the listener with `id`. Returns false if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Calls every registered listener, in registration order.
    ///
    /// Listeners may add or remove registrations while being notified. A
    /// listener removed earlier in the same round is not called; one added
    /// during the round is first called on the next notification.
    pub fn notify(&self, prefers_dark: bool) {
        let snapshot: Vec<(ListenerId, PreferenceListener)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in snapshot {
            if self.contains(id) {
                listener(prefers_dark);
            }
        }
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|(lid, _)| *lid == id)
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_add_remove() {
        let registry = ListenerRegistry::new();
        let id = registry.add(Rc::new(|_: bool| {}));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_notifies_in_order() {
        let registry = ListenerRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = seen.clone();
        registry.add(Rc::new(move |dark: bool| a.borrow_mut().push(("a", dark))));
        let b = seen.clone();
        registry.add(Rc::new(move |dark: bool| b.borrow_mut().push(("b", dark))));

        registry.notify(true);
        assert_eq!(*seen.borrow(), vec![("a", true), ("b", true)]);
    }

    #[test]
    fn test_listener_removed_mid_round_is_skipped() {
        let registry = Rc::new(ListenerRegistry::new());
        let calls = Rc::new(Cell::new(0));

        let victim: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let handle = victim.clone();
        let owner = registry.clone();
        registry.add(Rc::new(move |_: bool| {
            if let Some(id) = handle.get() {
                owner.remove(id);
            }
        }));
        let c = calls.clone();
        victim.set(Some(registry.add(Rc::new(move |_: bool| c.set(c.get() + 1)))));

        registry.notify(true);
        assert_eq!(calls.get(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let registry = ListenerRegistry::new();
        let first = registry.add(Rc::new(|_: bool| {}));
        registry.remove(first);
        let second = registry.add(Rc::new(|_: bool| {}));
        assert_ne!(first, second);
    }
}
