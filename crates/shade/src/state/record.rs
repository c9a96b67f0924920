//! The three-field reconciliation record.

use crate::theme::{Theme, ThemeName};

/// Snapshot of one named theme state.
///
/// Records are plain values. The store replaces them wholesale, so the
/// `with_*` helpers return a modified copy instead of mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeRecord<T: ThemeName = Theme> {
    /// Explicit user choice. `None` means "follow the system".
    pub override_theme: Option<T>,
    /// Last observed system preference. `None` until first observation.
    pub current: Option<T>,
    /// Last effective theme for which a side effect was applied.
    pub previous: Option<T>,
}

impl<T: ThemeName> ThemeRecord<T> {
    /// Creates a record with only the override populated.
    pub fn seeded(override_theme: Option<T>) -> Self {
        Self {
            override_theme,
            current: None,
            previous: None,
        }
    }

    /// Returns a copy with the override replaced.
    pub fn with_override(self, override_theme: Option<T>) -> Self {
        Self {
            override_theme,
            ..self
        }
    }

    /// Returns a copy with the observed system preference replaced.
    pub fn with_current(self, current: Option<T>) -> Self {
        Self { current, ..self }
    }

    /// Returns a copy with the last-applied theme replaced.
    pub(crate) fn with_previous(self, previous: Option<T>) -> Self {
        Self { previous, ..self }
    }
}

impl<T: ThemeName> Default for ThemeRecord<T> {
    fn default() -> Self {
        Self::seeded(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let record: ThemeRecord = ThemeRecord::default();
        assert_eq!(record.override_theme, None);
        assert_eq!(record.current, None);
        assert_eq!(record.previous, None);
    }

    #[test]
    fn test_with_helpers_preserve_other_fields() {
        let record = ThemeRecord {
            override_theme: Some(Theme::Light),
            current: Some(Theme::Dark),
            previous: Some(Theme::Light),
        };

        let moved = record.with_current(Some(Theme::Light));
        assert_eq!(moved.override_theme, Some(Theme::Light));
        assert_eq!(moved.previous, Some(Theme::Light));

        let cleared = record.with_override(None);
        assert_eq!(cleared.current, Some(Theme::Dark));
        assert_eq!(cleared.previous, Some(Theme::Light));
    }
}
