//! Persistence of the user override.
//!
//! [`PersistenceAdapter`] sits between a theme state and a [`KeyValueStore`].
//! It converts themes to and from their stored string form and absorbs every
//! backend failure: a store that cannot be read behaves as if it held
//! nothing, a store that cannot be written turns the override into a
//! session-only value.
//!
//! ```rust
//! use shade::persist::{MemoryStorage, PersistenceAdapter};
//! use shade::Theme;
//!
//! let storage = MemoryStorage::new();
//! let persistence = PersistenceAdapter::new(storage.clone());
//!
//! persistence.save("theme", Some(Theme::Dark));
//! assert_eq!(storage.item("theme").as_deref(), Some("dark"));
//! assert_eq!(persistence.load::<Theme>("theme"), Some(Theme::Dark));
//!
//! persistence.save::<Theme>("theme", None);
//! assert!(storage.is_empty());
//! ```

mod storage;

use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::theme::ThemeName;

pub use storage::{FileStorage, KeyValueStore, MemoryStorage, UnavailableStorage};

/// Reads and writes a single override value per state key.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Rc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    /// Wrap a storage backend.
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    /// Wrap an already shared backend.
    pub fn from_shared(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// An adapter over fresh volatile storage.
    pub fn memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Loads the persisted override for `key`.
    ///
    /// Returns `None` when nothing is stored, when the backend fails, or when
    /// the stored string does not name a member of `T`.
    pub fn load<T: ThemeName>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "could not read persisted theme");
                return None;
            }
        };

        match T::parse(&raw) {
            Some(theme) => {
                debug!(key, theme = theme.as_str(), "loaded persisted theme");
                Some(theme)
            }
            None => {
                warn!(key, value = %raw, "ignoring unknown persisted theme");
                None
            }
        }
    }

    /// Persists `theme` under `key`, or removes the entry for `None`.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save<T: ThemeName>(&self, key: &str, theme: Option<T>) {
        let result = match theme {
            Some(theme) => self.store.set_item(key, theme.as_str()),
            None => self.store.remove_item(key),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "could not persist theme override");
        }
    }
}

impl fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceAdapter").finish_non_exhaustive()
    }
}

impl Default for PersistenceAdapter {
    fn default() -> Self {
        Self::memory()
    }
}
