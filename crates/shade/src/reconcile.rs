//! Reconciliation rules.
//!
//! The effective theme is resolved with a fixed precedence:
//!
//! ```text
//! override_theme ── Some ──► override
//!      │ None
//! current ───────── Some ──► current
//!      │ None
//! ThemeName::DEFAULT
//! ```
//!
//! [`should_apply`] compares that result against the last applied theme so
//! effect application only happens on real transitions.

use crate::state::ThemeRecord;
use crate::theme::ThemeName;

/// Resolves the theme consumers see and the surface displays.
pub fn effective<T: ThemeName>(record: &ThemeRecord<T>) -> T {
    record
        .override_theme
        .or(record.current)
        .unwrap_or(T::DEFAULT)
}

/// Returns true if the effective theme differs from the last applied one.
pub fn should_apply<T: ThemeName>(record: &ThemeRecord<T>) -> bool {
    record.previous != Some(effective(record))
}
