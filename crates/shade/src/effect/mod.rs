//! Side-effect application on effective-theme transitions.
//!
//! An [`EffectApplier`] restyles the environment when the effective theme
//! differs from the last one it applied, then records the new value as the
//! state's `previous`. Two strategies exist:
//!
//! - **Surface** (default): write the theme identifier to a root attribute
//!   (`data-theme`) and copy the root's computed background into the
//!   `theme-color` hint, if the surface has one.
//! - **Callback**: hand the theme to caller code and touch nothing else.
//!
//! ```rust
//! use std::rc::Rc;
//! use shade::effect::{Document, EffectApplier, Palette};
//! use shade::persist::PersistenceAdapter;
//! use shade::{Theme, ThemeState};
//!
//! let state = ThemeState::<Theme>::new("theme", PersistenceAdapter::memory());
//! let doc = Rc::new(Document::new(Palette::standard()).with_hint("theme-color"));
//! let applier = EffectApplier::surface(doc.clone());
//!
//! assert!(applier.apply(&state));
//! assert!(!applier.apply(&state)); // nothing changed
//! assert_eq!(doc.hint("theme-color").as_deref(), Some("rgb(255, 255, 255)"));
//! ```

mod palette;
mod surface;

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::reconcile;
use crate::state::ThemeState;
use crate::theme::{Theme, ThemeName};

pub use palette::{Palette, Rgb};
pub use surface::{Document, Surface};

/// Root attribute written by the surface strategy.
pub const DEFAULT_ATTRIBUTE: &str = "data-theme";

/// Hint element updated by the surface strategy.
pub const DEFAULT_HINT: &str = "theme-color";

/// Caller-supplied replacement for the surface strategy.
pub type ApplyThemeFn<T> = Rc<dyn Fn(T)>;

/// How a theme transition is made visible.
#[derive(Clone)]
pub enum ApplyStrategy<T: ThemeName = Theme> {
    /// Hand the theme to caller code.
    Callback(ApplyThemeFn<T>),
    /// Restyle a [`Surface`].
    Surface {
        /// The surface to restyle.
        surface: Rc<dyn Surface>,
        /// Root attribute receiving the theme identifier.
        attribute: String,
        /// Hint element receiving the computed background.
        hint: String,
    },
}

/// Applies effective-theme transitions exactly once each.
#[derive(Clone)]
pub struct EffectApplier<T: ThemeName = Theme> {
    strategy: ApplyStrategy<T>,
}

impl<T: ThemeName> EffectApplier<T> {
    /// Apply through `strategy`.
    pub fn new(strategy: ApplyStrategy<T>) -> Self {
        Self { strategy }
    }

    /// Apply by calling `apply_theme`.
    pub fn callback<F>(apply_theme: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        Self::new(ApplyStrategy::Callback(Rc::new(apply_theme)))
    }

    /// Apply to `surface` using the default attribute and hint names.
    pub fn surface(surface: Rc<dyn Surface>) -> Self {
        Self::new(ApplyStrategy::Surface {
            surface,
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            hint: DEFAULT_HINT.to_string(),
        })
    }

    /// The configured strategy.
    pub fn strategy(&self) -> &ApplyStrategy<T> {
        &self.strategy
    }

    /// Applies the state's current effective theme if it has not been
    /// applied yet. Returns true if a side effect ran.
    pub fn apply(&self, state: &ThemeState<T>) -> bool {
        let theme = reconcile::effective(&state.get());
        self.apply_transition(state, theme)
    }

    /// Applies `theme` unless it equals the state's `previous`, then records
    /// it as `previous`. Returns true if a side effect ran.
    pub fn apply_transition(&self, state: &ThemeState<T>, theme: T) -> bool {
        if state.get().previous == Some(theme) {
            trace!(key = state.key(), theme = theme.as_str(), "theme already applied");
            return false;
        }

        debug!(key = state.key(), theme = theme.as_str(), "applying theme");
        self.run(theme);

        // Re-read: the callback may have written to the state.
        let record = state.get();
        state.set(record.with_previous(Some(theme)));
        true
    }

    fn run(&self, theme: T) {
        match &self.strategy {
            ApplyStrategy::Callback(apply_theme) => apply_theme(theme),
            ApplyStrategy::Surface {
                surface,
                attribute,
                hint,
            } => {
                surface.set_root_attribute(attribute, theme.as_str());
                match surface.computed_background() {
                    Some(background) => {
                        if !surface.set_hint(hint, &background) {
                            trace!(hint = %hint, "no hint element on surface");
                        }
                    }
                    None => trace!(theme = theme.as_str(), "no computed background"),
                }
            }
        }
    }
}

impl<T: ThemeName> fmt::Debug for ApplyStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyStrategy::Callback(_) => f.write_str("Callback"),
            ApplyStrategy::Surface {
                attribute, hint, ..
            } => f
                .debug_struct("Surface")
                .field("attribute", attribute)
                .field("hint", hint)
                .finish_non_exhaustive(),
        }
    }
}

impl<T: ThemeName> fmt::Debug for EffectApplier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectApplier")
            .field("strategy", &self.strategy)
            .finish()
    }
}
