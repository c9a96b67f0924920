//! Bridge from a preference source into a theme state.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::{ListenerId, PreferenceSource};
use crate::state::ThemeState;
use crate::theme::{Theme, ThemeName};

/// Feeds a [`PreferenceSource`] into a state's `current` field.
///
/// Activation and deactivation are paired: activating an already active
/// observer does nothing, as does deactivating an inactive one, so however
/// often the host's lifecycle hooks fire there is at most one listener on
/// the source. Dropping an active observer deactivates it.
pub struct SystemPreferenceObserver<T: ThemeName = Theme> {
    state: ThemeState<T>,
    source: Rc<dyn PreferenceSource>,
    listener: Option<ListenerId>,
}

impl<T: ThemeName> SystemPreferenceObserver<T> {
    /// Create an inactive observer.
    pub fn new(state: ThemeState<T>, source: Rc<dyn PreferenceSource>) -> Self {
        Self {
            state,
            source,
            listener: None,
        }
    }

    /// Starts observing.
    ///
    /// If the state has no observed preference yet, the source is queried
    /// once and the answer written into `current`. Then a change listener
    /// is registered; every change event rewrites `current` on the latest
    /// record, leaving the override and the last applied theme alone.
    pub fn activate(&mut self) {
        if self.listener.is_some() {
            trace!(key = self.state.key(), "observer already active");
            return;
        }

        if self.state.get().current.is_none() {
            match self.source.prefers_dark() {
                Some(dark) => write_current(&self.state, dark),
                None => debug!(
                    key = self.state.key(),
                    "system theme preference unavailable"
                ),
            }
        }

        let state = self.state.clone();
        let id = self.source.add_listener(Rc::new(move |dark: bool| {
            trace!(key = state.key(), prefers_dark = dark, "preference changed");
            write_current(&state, dark);
        }));
        self.listener = Some(id);
        debug!(key = self.state.key(), "activated preference observer");
    }

    /// Stops observing. Safe to call when already inactive.
    pub fn deactivate(&mut self) {
        if let Some(id) = self.listener.take() {
            self.source.remove_listener(id);
            debug!(key = self.state.key(), "deactivated preference observer");
        }
    }

    /// Returns true while a listener is registered.
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// The source being observed.
    pub fn source(&self) -> &Rc<dyn PreferenceSource> {
        &self.source
    }
}

fn write_current<T: ThemeName>(state: &ThemeState<T>, prefers_dark: bool) {
    let record = state.get();
    state.set(record.with_current(Some(T::from_prefers_dark(prefers_dark))));
}

impl<T: ThemeName> Drop for SystemPreferenceObserver<T> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl<T: ThemeName> fmt::Debug for SystemPreferenceObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemPreferenceObserver")
            .field("key", &self.state.key())
            .field("active", &self.is_active())
            .finish()
    }
}
