//! Host-driven preference source.

use std::cell::Cell;

use tracing::trace;

use super::{ListenerId, ListenerRegistry, PreferenceListener, PreferenceSource};

/// A preference whose value the host sets explicitly.
///
/// Useful where the host already receives appearance-change events from its
/// windowing toolkit, and in tests.
#[derive(Debug, Default)]
pub struct ManualPreference {
    value: Cell<Option<bool>>,
    listeners: ListenerRegistry,
}

impl ManualPreference {
    /// A source that currently reports `prefers_dark`.
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            value: Cell::new(Some(prefers_dark)),
            listeners: ListenerRegistry::new(),
        }
    }

    /// A source that cannot report a preference.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Updates the preference, notifying listeners if it changed.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        if self.value.replace(Some(prefers_dark)) == Some(prefers_dark) {
            trace!(prefers_dark, "preference unchanged");
            return;
        }
        self.listeners.notify(prefers_dark);
    }
}

impl PreferenceSource for ManualPreference {
    fn prefers_dark(&self) -> Option<bool> {
        self.value.get()
    }

    fn add_listener(&self, listener: PreferenceListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
