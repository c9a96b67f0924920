//! Plain accessors over a theme state.
//!
//! [`create_state`] builds a named state seeded from persistence, and
//! [`create_utilities`] hands out a reader/writer pair that works from any
//! context: no provider has to be mounted to read the effective theme or to
//! change the override.

use std::fmt;

use tracing::debug;

use crate::persist::PersistenceAdapter;
use crate::reconcile;
use crate::state::ThemeState;
use crate::theme::{Theme, ThemeName};

/// Creates the state for `key`.
///
/// The override is loaded from `persistence`; `current` and `previous` start
/// out empty.
pub fn create_state<T: ThemeName>(key: &str, persistence: &PersistenceAdapter) -> ThemeState<T> {
    ThemeState::new(key, persistence.clone())
}

/// Returns the read/write accessors for `state`.
pub fn create_utilities<T: ThemeName>(state: &ThemeState<T>) -> ThemeUtilities<T> {
    ThemeUtilities {
        state: state.clone(),
    }
}

/// Reader and writer for one theme state.
///
/// ```rust
/// use shade::persist::{MemoryStorage, PersistenceAdapter};
/// use shade::{create_state, create_utilities, Theme};
///
/// let storage = MemoryStorage::new();
/// let state = create_state::<Theme>("theme", &PersistenceAdapter::new(storage.clone()));
/// let utilities = create_utilities(&state);
///
/// let (theme, set_theme) = utilities.theme();
/// assert_eq!(theme, Theme::Light);
///
/// set_theme.set(Some(Theme::Dark));
/// assert_eq!(utilities.effective(), Theme::Dark);
/// assert_eq!(storage.item("theme").as_deref(), Some("dark"));
/// ```
#[derive(Clone)]
pub struct ThemeUtilities<T: ThemeName = Theme> {
    state: ThemeState<T>,
}

impl<T: ThemeName> ThemeUtilities<T> {
    /// The effective theme and a setter for the override.
    pub fn theme(&self) -> (T, ThemeSetter<T>) {
        (self.effective(), self.setter())
    }

    /// The effective theme.
    pub fn effective(&self) -> T {
        reconcile::effective(&self.state.get())
    }

    /// A setter for the override.
    pub fn setter(&self) -> ThemeSetter<T> {
        ThemeSetter {
            state: self.state.clone(),
        }
    }

    /// Shorthand for `self.setter().set(theme)`.
    pub fn set_theme(&self, theme: Option<T>) {
        self.setter().set(theme);
    }

    /// The underlying state.
    pub fn state(&self) -> &ThemeState<T> {
        &self.state
    }
}

impl<T: ThemeName> fmt::Debug for ThemeUtilities<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeUtilities")
            .field("key", &self.state.key())
            .finish()
    }
}

/// Writes the user override.
#[derive(Clone)]
pub struct ThemeSetter<T: ThemeName = Theme> {
    state: ThemeState<T>,
}

impl<T: ThemeName> ThemeSetter<T> {
    /// Sets or clears the override.
    ///
    /// The value is written through to persistence first (`None` removes
    /// the entry), then committed to the state with `current` and
    /// `previous` taken from the latest record.
    pub fn set(&self, theme: Option<T>) {
        let key = self.state.key();
        debug!(key, theme = theme.map(|t| t.as_str()), "setting theme override");
        self.state.persistence().save(key, theme);

        let record = self.state.get();
        self.state.set(record.with_override(theme));
    }
}

impl<T: ThemeName> fmt::Debug for ThemeSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeSetter")
            .field("key", &self.state.key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{KeyValueStore, MemoryStorage, UnavailableStorage};
    use crate::state::ThemeRecord;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_create_state_seeds_override() {
        let persistence = PersistenceAdapter::new(MemoryStorage::new().with_item("theme", "dark"));
        let state = create_state::<Theme>("theme", &persistence);
        assert_eq!(state.get(), ThemeRecord::seeded(Some(Theme::Dark)));
    }

    #[test]
    fn test_invalid_persisted_value_is_no_override() {
        let persistence = PersistenceAdapter::new(MemoryStorage::new().with_item("theme", "sepia"));
        let state = create_state::<Theme>("theme", &persistence);
        assert_eq!(state.get().override_theme, None);
        assert_eq!(create_utilities(&state).effective(), Theme::Light);
    }

    #[test]
    fn test_set_preserves_current_and_previous() {
        let state = create_state::<Theme>("theme", &PersistenceAdapter::memory());
        state.set(ThemeRecord {
            override_theme: None,
            current: Some(Theme::Dark),
            previous: Some(Theme::Dark),
        });

        create_utilities(&state).set_theme(Some(Theme::Light));

        assert_eq!(
            state.get(),
            ThemeRecord {
                override_theme: Some(Theme::Light),
                current: Some(Theme::Dark),
                previous: Some(Theme::Dark),
            }
        );
    }

    #[test]
    fn test_persists_before_committing() {
        let storage = MemoryStorage::new();
        let state = create_state::<Theme>("theme", &PersistenceAdapter::new(storage.clone()));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let reader = storage.clone();
        let _sub = state.subscribe(move |_| log.borrow_mut().push(reader.item("theme")));

        let (_, set_theme) = create_utilities(&state).theme();
        set_theme.set(Some(Theme::Dark));
        set_theme.set(None);

        assert_eq!(*seen.borrow(), vec![Some("dark".to_string()), None]);
    }

    #[test]
    fn test_clearing_override_follows_current() {
        let storage = MemoryStorage::new();
        let state = create_state::<Theme>("theme", &PersistenceAdapter::new(storage.clone()));
        state.set(state.get().with_current(Some(Theme::Dark)));
        let utilities = create_utilities(&state);

        utilities.set_theme(Some(Theme::Light));
        assert_eq!(utilities.effective(), Theme::Light);

        utilities.set_theme(None);
        assert_eq!(utilities.effective(), Theme::Dark);
        assert_eq!(storage.get_item("theme").unwrap(), None);
    }

    #[test]
    fn test_unavailable_storage_keeps_session_override() {
        let state = create_state::<Theme>("theme", &PersistenceAdapter::new(UnavailableStorage));
        let utilities = create_utilities(&state);

        utilities.set_theme(Some(Theme::Dark));
        assert_eq!(utilities.effective(), Theme::Dark);
    }

    #[test]
    fn test_setter_outlives_utilities() {
        let state = create_state::<Theme>("theme", &PersistenceAdapter::memory());
        let setter = create_utilities(&state).setter();

        setter.set(Some(Theme::Dark));
        assert_eq!(state.effective(), Theme::Dark);
    }
}
