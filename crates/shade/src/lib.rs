//! Theme reconciliation for interactive front ends.
//!
//! `shade` decides which theme an application should show, given three
//! competing inputs, and restyles the application when that decision changes:
//!
//! - the **override**: an explicit user choice, persisted across sessions,
//! - the **current** value: the operating system's light/dark preference,
//! - the **previous** value: the theme last applied to the screen.
//!
//! The effective theme is the override if set, else the system preference if
//! known, else a fixed default. Side effects run once per change of the
//! effective theme, at the host's commit boundary.
//!
//! # Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use shade::effect::{Document, Palette};
//! use shade::persist::{MemoryStorage, PersistenceAdapter};
//! use shade::preference::ManualPreference;
//! use shade::{create_state, create_utilities, Theme, ThemeProvider};
//!
//! let storage = MemoryStorage::new();
//! let state = create_state::<Theme>("theme", &PersistenceAdapter::new(storage.clone()));
//!
//! // The OS prefers dark.
//! let system = Rc::new(ManualPreference::new(true));
//! let document = Rc::new(Document::new(Palette::standard()).with_hint("theme-color"));
//!
//! let mut provider = ThemeProvider::builder(state.clone())
//!     .source(system.clone())
//!     .surface(document.clone())
//!     .build()?;
//! provider.mount();
//! provider.commit();
//! assert_eq!(document.hint("theme-color").as_deref(), Some("rgb(30, 30, 30)"));
//!
//! // The user picks light; the choice is persisted and applied.
//! let (_, set_theme) = create_utilities(&state).theme();
//! set_theme.set(Some(Theme::Light));
//! provider.commit();
//! assert_eq!(storage.item("theme").as_deref(), Some("light"));
//! assert_eq!(document.hint("theme-color").as_deref(), Some("rgb(255, 255, 255)"));
//! # Ok::<(), shade::ShadeError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! PersistenceAdapter ──seeds override──► ThemeState ◄──current── SystemPreferenceObserver
//!         ▲                                   │                          ▲
//!         │ write-through                     │ notify                   │ change events
//!    ThemeSetter                         ThemeProvider              PreferenceSource
//!                                             │ commit
//!                                             ▼
//!                                       EffectApplier ──► Surface / callback
//! ```
//!
//! Everything is single-threaded: handles are `Rc`-based and `!Send`.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Swallowed storage failures are reported at `warn`.

pub mod api;
pub mod config;
pub mod effect;
pub mod error;
pub mod persist;
pub mod preference;
pub mod provider;
pub mod reconcile;
pub mod state;
pub mod theme;

pub use api::{create_state, create_utilities, ThemeSetter, ThemeUtilities};
pub use config::{ShadeConfig, StorageConfig};
pub use effect::EffectApplier;
pub use error::{PaletteError, Result, ShadeError, StorageError};
pub use provider::{ThemeProvider, ThemeProviderBuilder};
pub use reconcile::{effective, should_apply};
pub use state::{StateRegistry, Subscription, ThemeRecord, ThemeState};
pub use theme::{Theme, ThemeName, UnknownTheme};
