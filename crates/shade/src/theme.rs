//! Theme enumerations.
//!
//! The engine is generic over the set of themes it reconciles. Any closed
//! enumeration can take part by implementing [`ThemeName`], which ties each
//! variant to the string stored in persistence and names the fallback used
//! when neither an override nor a system preference is known.
//!
//! [`Theme`] is the stock two-variant enumeration and the default type
//! parameter throughout the crate.
//!
//! ```rust
//! use shade::{Theme, ThemeName};
//!
//! assert_eq!(Theme::DEFAULT, Theme::Light);
//! assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
//! assert_eq!(Theme::from_prefers_dark(true), Theme::Dark);
//! ```

use std::fmt;
use std::str::FromStr;

/// A closed set of theme identifiers.
///
/// Implementors must be cheap to copy; the engine passes themes by value
/// through listeners and callbacks.
///
/// # Example
///
/// ```rust
/// use shade::ThemeName;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Scheme { Day, Night, Contrast }
///
/// impl ThemeName for Scheme {
///     const DEFAULT: Self = Scheme::Day;
///
///     fn as_str(&self) -> &'static str {
///         match self {
///             Scheme::Day => "day",
///             Scheme::Night => "night",
///             Scheme::Contrast => "contrast",
///         }
///     }
///
///     fn parse(s: &str) -> Option<Self> {
///         match s {
///             "day" => Some(Scheme::Day),
///             "night" => Some(Scheme::Night),
///             "contrast" => Some(Scheme::Contrast),
///             _ => None,
///         }
///     }
///
///     fn from_prefers_dark(dark: bool) -> Self {
///         if dark { Scheme::Night } else { Scheme::Day }
///     }
/// }
/// ```
pub trait ThemeName: Copy + Eq + fmt::Debug + 'static {
    /// Fallback used when there is neither an override nor an observed
    /// system preference.
    const DEFAULT: Self;

    /// Identifier written to persistence and to the surface attribute.
    fn as_str(&self) -> &'static str;

    /// Parses a persisted identifier. Unknown strings yield `None`.
    fn parse(s: &str) -> Option<Self>;

    /// Maps the OS "prefers dark" flag onto this enumeration.
    fn from_prefers_dark(dark: bool) -> Self;
}

/// The stock light/dark theme pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Dark background, light text.
    Dark,
    /// Light background, dark text.
    Light,
}

impl ThemeName for Theme {
    const DEFAULT: Self = Theme::Light;

    fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    fn from_prefers_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Theme`] from an unknown string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::parse(s).ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::DEFAULT, Theme::Light);
    }

    #[test]
    fn test_parse_known_names() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Theme::parse("Dark"), None);
        assert_eq!(Theme::parse(" light"), None);
        assert_eq!(Theme::parse(""), None);
    }

    #[test]
    fn test_from_str_error_names_input() {
        let err = "sepia".parse::<Theme>().unwrap_err();
        assert_eq!(err.to_string(), "unknown theme: sepia");
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!(Theme::Light.to_string(), Theme::Light.as_str());
    }

    #[test]
    fn test_from_prefers_dark() {
        assert_eq!(Theme::from_prefers_dark(true), Theme::Dark);
        assert_eq!(Theme::from_prefers_dark(false), Theme::Light);
    }
}
