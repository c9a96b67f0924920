//! Provider binding: the scoped half of the theme hook.
//!
//! A [`ThemeProvider`] ties one [`ThemeState`] to a preference source and an
//! apply strategy for as long as it is mounted. The host drives it through
//! three calls:
//!
//! - [`mount`](ThemeProvider::mount) when the themed region comes into
//!   existence: subscribe to the state and start observing the OS,
//! - [`commit`](ThemeProvider::commit) at every render-commit boundary: apply
//!   the effective-theme transitions observed since the last commit,
//! - [`unmount`](ThemeProvider::unmount) (or drop) when it goes away.
//!
//! ```rust
//! use std::rc::Rc;
//! use shade::preference::ManualPreference;
//! use shade::{create_state, Theme, ThemeProvider};
//! use shade::persist::PersistenceAdapter;
//!
//! let state = create_state::<Theme>("theme", &PersistenceAdapter::memory());
//! let source = Rc::new(ManualPreference::new(true));
//! let applied = Rc::new(std::cell::RefCell::new(Vec::new()));
//!
//! let log = applied.clone();
//! let mut provider = ThemeProvider::builder(state.clone())
//!     .source(source.clone())
//!     .apply_theme(move |theme| log.borrow_mut().push(theme))
//!     .build()?;
//!
//! provider.mount();
//! assert_eq!(provider.commit(), 1);
//! assert_eq!(*applied.borrow(), vec![Theme::Dark]);
//!
//! source.set_prefers_dark(false);
//! provider.commit();
//! assert_eq!(*applied.borrow(), vec![Theme::Dark, Theme::Light]);
//! # Ok::<(), shade::ShadeError>(())
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::ShadeConfig;
use crate::effect::{ApplyStrategy, EffectApplier, Surface, DEFAULT_ATTRIBUTE, DEFAULT_HINT};
use crate::error::{Result, ShadeError};
use crate::preference::{
    PreferenceSource, SystemPreference, SystemPreferenceObserver, ThemeDetector,
};
use crate::reconcile;
use crate::state::{Subscription, ThemeState};
use crate::theme::{Theme, ThemeName};

/// Binds a theme state to a preference source and an apply strategy.
pub struct ThemeProvider<T: ThemeName = Theme> {
    state: ThemeState<T>,
    observer: SystemPreferenceObserver<T>,
    applier: EffectApplier<T>,
    pending: Rc<RefCell<VecDeque<T>>>,
    subscription: Option<Subscription>,
}

impl<T: ThemeName> ThemeProvider<T> {
    /// Starts configuring a provider for `state`.
    pub fn builder(state: ThemeState<T>) -> ThemeProviderBuilder<T> {
        ThemeProviderBuilder::new(state)
    }

    /// The state this provider drives.
    pub fn state(&self) -> &ThemeState<T> {
        &self.state
    }

    /// The applier used at commit time.
    pub fn applier(&self) -> &EffectApplier<T> {
        &self.applier
    }

    /// The preference source being observed.
    pub fn source(&self) -> &Rc<dyn PreferenceSource> {
        self.observer.source()
    }

    /// Re-checks the preference source, see [`PreferenceSource::poll`].
    ///
    /// With the default OS source this is how system changes reach the
    /// state; call it from the host's event loop. Changes picked up while
    /// mounted are applied on the next [`commit`](Self::commit).
    pub fn poll(&self) -> bool {
        self.observer.source().poll()
    }

    /// Subscribes to the state and activates the preference observer.
    ///
    /// Calling this while mounted does nothing.
    pub fn mount(&mut self) {
        if self.subscription.is_some() {
            trace!(key = self.state.key(), "provider already mounted");
            return;
        }

        let pending = Rc::clone(&self.pending);
        let key = self.state.key().to_string();
        self.subscription = Some(self.state.subscribe(move |record| {
            let theme = reconcile::effective(record);
            let mut pending = pending.borrow_mut();
            // Compare against the newest queued value, or the applied one.
            let changed = match pending.back() {
                Some(last) => *last != theme,
                None => reconcile::should_apply(record),
            };
            if changed {
                trace!(key = %key, theme = theme.as_str(), "queued theme transition");
                pending.push_back(theme);
            }
        }));
        self.observer.activate();
        debug!(key = self.state.key(), "mounted theme provider");
    }

    /// Applies queued effective-theme transitions, oldest first, then the
    /// latest effective theme if it still differs from the last applied one.
    ///
    /// Returns the number of side effects that ran. Without a mount this
    /// only performs the catch-up step.
    pub fn commit(&self) -> usize {
        let mut applied = 0;
        loop {
            // Applying writes `previous`, which re-enters the subscriber.
            let next = self.pending.borrow_mut().pop_front();
            let Some(theme) = next else { break };
            if self.applier.apply_transition(&self.state, theme) {
                applied += 1;
            }
        }
        if self.applier.apply(&self.state) {
            applied += 1;
        }
        trace!(key = self.state.key(), applied, "committed theme transitions");
        applied
    }

    /// Deactivates the observer, unsubscribes from the state and drops
    /// uncommitted transitions. Safe to call when not mounted.
    pub fn unmount(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        self.observer.deactivate();
        subscription.unsubscribe();
        self.pending.borrow_mut().clear();
        debug!(key = self.state.key(), "unmounted theme provider");
    }

    /// Returns true between [`mount`](Self::mount) and
    /// [`unmount`](Self::unmount).
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Number of transitions waiting for the next commit.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl<T: ThemeName> Drop for ThemeProvider<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<T: ThemeName> fmt::Debug for ThemeProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeProvider")
            .field("key", &self.state.key())
            .field("mounted", &self.is_mounted())
            .field("pending", &self.pending())
            .field("applier", &self.applier)
            .finish()
    }
}

/// Builder for [`ThemeProvider`].
///
/// Either a [`surface`](Self::surface) or an
/// [`apply_theme`](Self::apply_theme) callback is required. When both are
/// given the callback wins and the surface is left untouched.
pub struct ThemeProviderBuilder<T: ThemeName = Theme> {
    state: ThemeState<T>,
    source: Option<Rc<dyn PreferenceSource>>,
    surface: Option<Rc<dyn Surface>>,
    apply_theme: Option<Rc<dyn Fn(T)>>,
    attribute: String,
    hint: String,
}

impl<T: ThemeName> ThemeProviderBuilder<T> {
    fn new(state: ThemeState<T>) -> Self {
        Self {
            state,
            source: None,
            surface: None,
            apply_theme: None,
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            hint: DEFAULT_HINT.to_string(),
        }
    }

    /// Observes `source` instead of the operating system.
    pub fn source(mut self, source: Rc<dyn PreferenceSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Observes the operating system through `detector` instead of
    /// `dark-light`.
    pub fn detector(self, detector: ThemeDetector) -> Self {
        self.source(Rc::new(SystemPreference::with_detector(detector)))
    }

    /// Restyles `surface` on each transition.
    pub fn surface(mut self, surface: Rc<dyn Surface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Calls `apply_theme` on each transition instead of restyling a surface.
    pub fn apply_theme<F>(mut self, apply_theme: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        self.apply_theme = Some(Rc::new(apply_theme));
        self
    }

    /// Root attribute written by the surface strategy.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = name.into();
        self
    }

    /// Hint element updated by the surface strategy.
    pub fn hint(mut self, name: impl Into<String>) -> Self {
        self.hint = name.into();
        self
    }

    /// Takes the attribute and hint names from `config`.
    pub fn config(self, config: &ShadeConfig) -> Self {
        self.attribute(config.attribute.clone()).hint(config.hint.clone())
    }

    /// Builds an unmounted provider.
    ///
    /// # Errors
    ///
    /// Returns [`ShadeError::NoApplyTarget`] if neither a surface nor a
    /// callback was configured.
    pub fn build(self) -> Result<ThemeProvider<T>> {
        let strategy = match (self.apply_theme, self.surface) {
            (Some(apply_theme), _) => ApplyStrategy::Callback(apply_theme),
            (None, Some(surface)) => ApplyStrategy::Surface {
                surface,
                attribute: self.attribute,
                hint: self.hint,
            },
            (None, None) => return Err(ShadeError::NoApplyTarget),
        };
        let source = self
            .source
            .unwrap_or_else(|| Rc::new(SystemPreference::new()));

        Ok(ThemeProvider {
            observer: SystemPreferenceObserver::new(self.state.clone(), source),
            state: self.state,
            applier: EffectApplier::new(strategy),
            pending: Rc::new(RefCell::new(VecDeque::new())),
            subscription: None,
        })
    }
}
