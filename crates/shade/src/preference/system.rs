//! OS preference detection through `dark-light`.

use std::cell::Cell;
use std::fmt;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use tracing::{debug, trace};

use super::{ListenerId, ListenerRegistry, PreferenceListener, PreferenceSource};

/// Function used to ask whether the OS prefers a dark theme.
///
/// Returns `None` when the platform cannot tell.
pub type ThemeDetector = fn() -> Option<bool>;

/// The operating system's light/dark preference.
///
/// Detection goes through the `dark-light` crate by default. Use
/// [`with_detector`](Self::with_detector) to substitute a fixed answer, for
/// tests or for platforms where the host knows better.
///
/// There is no OS notification channel behind this source. The host calls
/// [`poll`](PreferenceSource::poll) on its own cadence (a timer, a window
/// focus event) and listeners hear about real changes only.
///
/// ```rust
/// use shade::preference::{PreferenceSource, SystemPreference};
///
/// let source = SystemPreference::with_detector(|| Some(true));
/// assert_eq!(source.prefers_dark(), Some(true));
/// assert!(!source.poll()); // unchanged since the last detection
/// ```
pub struct SystemPreference {
    detector: ThemeDetector,
    last: Cell<Option<bool>>,
    listeners: ListenerRegistry,
}

impl SystemPreference {
    /// Detect through the OS.
    pub fn new() -> Self {
        Self::with_detector(os_theme_detector)
    }

    /// Detect through `detector` instead of the OS.
    pub fn with_detector(detector: ThemeDetector) -> Self {
        Self {
            detector,
            last: Cell::new(None),
            listeners: ListenerRegistry::new(),
        }
    }
}

impl Default for SystemPreference {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceSource for SystemPreference {
    fn prefers_dark(&self) -> Option<bool> {
        let detected = (self.detector)();
        if detected.is_some() {
            self.last.set(detected);
        }
        detected
    }

    fn add_listener(&self, listener: PreferenceListener) -> ListenerId {
        if self.last.get().is_none() {
            self.last.set((self.detector)());
        }
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Re-detects the preference and notifies listeners if it changed.
    ///
    /// Returns true if listeners were notified. A detection that yields
    /// `None` is ignored and leaves the last known value in place.
    fn poll(&self) -> bool {
        let Some(now) = (self.detector)() else {
            trace!("system theme preference unavailable during poll");
            return false;
        };
        if self.last.replace(Some(now)) == Some(now) {
            return false;
        }
        debug!(prefers_dark = now, "system theme preference changed");
        self.listeners.notify(now);
        true
    }
}

impl fmt::Debug for SystemPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemPreference")
            .field("last", &self.last.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn os_theme_detector() -> Option<bool> {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => Some(true),
        Ok(OsThemeMode::Light) => Some(false),
        Ok(_) => None,
        Err(_) => {
            debug!("OS theme detection failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    thread_local! {
        static OS_DARK: Cell<Option<bool>> = const { Cell::new(None) };
    }

    fn fake_detector() -> Option<bool> {
        OS_DARK.with(|d| d.get())
    }

    fn set_os(value: Option<bool>) {
        OS_DARK.with(|d| d.set(value));
    }

    #[test]
    fn test_detector_override() {
        let dark = SystemPreference::with_detector(|| Some(true));
        let light = SystemPreference::with_detector(|| Some(false));
        let unknown = SystemPreference::with_detector(|| None);

        assert_eq!(dark.prefers_dark(), Some(true));
        assert_eq!(light.prefers_dark(), Some(false));
        assert_eq!(unknown.prefers_dark(), None);
    }

    #[test]
    fn test_poll_notifies_only_on_change() {
        set_os(Some(false));
        let source = SystemPreference::with_detector(fake_detector);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        source.add_listener(Rc::new(move |dark: bool| log.borrow_mut().push(dark)));

        assert!(!source.poll());
        set_os(Some(true));
        assert!(source.poll());
        assert!(!source.poll());
        set_os(Some(false));
        assert!(source.poll());

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_poll_ignores_unavailable() {
        set_os(Some(true));
        let source = SystemPreference::with_detector(fake_detector);
        assert_eq!(source.prefers_dark(), Some(true));

        set_os(None);
        assert!(!source.poll());
        set_os(Some(true));
        assert!(!source.poll());
    }

    #[test]
    fn test_remove_listener_is_idempotent() {
        let source = SystemPreference::with_detector(|| Some(false));
        let id = source.add_listener(Rc::new(|_: bool| {}));

        source.remove_listener(id);
        source.remove_listener(id);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_os_detection_does_not_panic() {
        let _ = SystemPreference::new().prefers_dark();
    }
}
