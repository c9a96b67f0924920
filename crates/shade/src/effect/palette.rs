//! Background colours per theme.
//!
//! A palette answers one question for the in-memory [`Document`]: what is
//! the computed background colour of the root when it carries a given theme
//! identifier? That colour feeds the `theme-color` hint.
//!
//! Palettes load from YAML, one entry per theme:
//!
//! ```yaml
//! light:
//!   background: "#ffffff"
//! dark:
//!   background: "#1e1e1e"
//! contrast:
//!   background: [0, 0, 0]
//! ```
//!
//! Colours accept `#rgb`, `#rrggbb`, and `[r, g, b]` tuples. Other keys in
//! an entry are ignored so palettes can be shared with other tooling.
//!
//! [`Document`]: super::Document

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::PaletteError;

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#rgb` or `#rrggbb`.
    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("Invalid hex color: {} (missing #)", s))?;
        if !hex.is_ascii() {
            return Err(format!("Invalid hex: {}", hex));
        }

        match hex.len() {
            // #rgb -> #rrggbb
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16)
                    .map_err(|_| format!("Invalid hex: {}", hex))?
                    * 17;
                let g = u8::from_str_radix(&hex[1..2], 16)
                    .map_err(|_| format!("Invalid hex: {}", hex))?
                    * 17;
                let b = u8::from_str_radix(&hex[2..3], 16)
                    .map_err(|_| format!("Invalid hex: {}", hex))?
                    * 17;
                Ok(Rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16)
                    .map_err(|_| format!("Invalid hex: {}", hex))?;
                let g = u8::from_str_radix(&hex[2..4], 16)
                    .map_err(|_| format!("Invalid hex: {}", hex))?;
                let b = u8::from_str_radix(&hex[4..6], 16)
                    .map_err(|_| format!("Invalid hex: {}", hex))?;
                Ok(Rgb(r, g, b))
            }
            _ => Err(format!(
                "Invalid hex color: #{} (must be 3 or 6 digits)",
                hex
            )),
        }
    }

    /// Parses a colour from a YAML value: a hex string or an `[r, g, b]`
    /// sequence.
    pub fn parse_value(value: &serde_yaml::Value) -> Result<Self, String> {
        match value {
            serde_yaml::Value::String(s) => Self::parse_hex(s),
            serde_yaml::Value::Sequence(seq) => Self::parse_tuple(seq),
            _ => Err(format!("Invalid color value: {:?}", value)),
        }
    }

    fn parse_tuple(seq: &[serde_yaml::Value]) -> Result<Self, String> {
        if seq.len() != 3 {
            return Err(format!(
                "RGB tuple must have exactly 3 values, got {}",
                seq.len()
            ));
        }

        let mut components = [0u8; 3];
        for (i, val) in seq.iter().enumerate() {
            let n = val
                .as_u64()
                .ok_or_else(|| format!("RGB component {} is not a number", i))?;
            if n > 255 {
                return Err(format!("RGB component {} out of range (0-255): {}", i, n));
            }
            components[i] = n as u8;
        }

        Ok(Rgb(components[0], components[1], components[2]))
    }
}

/// Renders as a CSS computed value, e.g. `rgb(30, 30, 30)`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

#[derive(Deserialize)]
struct PaletteEntry {
    background: Option<serde_yaml::Value>,
}

/// Theme identifier → background colour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    backgrounds: HashMap<String, Rgb>,
}

impl Palette {
    /// An empty palette. Every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// White for `light`, near-black for `dark`.
    pub fn standard() -> Self {
        Self::new()
            .with_background("light", Rgb(255, 255, 255))
            .with_background("dark", Rgb(30, 30, 30))
    }

    /// Sets the background for `theme`, returning `self` for chaining.
    pub fn with_background(mut self, theme: impl Into<String>, color: Rgb) -> Self {
        self.backgrounds.insert(theme.into(), color);
        self
    }

    /// The background colour for `theme`, if the palette defines one.
    pub fn background(&self, theme: &str) -> Option<Rgb> {
        self.backgrounds.get(theme).copied()
    }

    /// Number of themes with a background.
    pub fn len(&self) -> usize {
        self.backgrounds.len()
    }

    /// Returns true if no backgrounds are defined.
    pub fn is_empty(&self) -> bool {
        self.backgrounds.is_empty()
    }

    /// Parses a palette from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Parse`] for malformed YAML or entries without a
    /// `background`, and [`PaletteError::InvalidColor`] for unreadable colours.
    pub fn from_yaml(yaml: &str) -> Result<Self, PaletteError> {
        let entries: HashMap<String, PaletteEntry> =
            serde_yaml::from_str(yaml).map_err(|e| PaletteError::Parse {
                message: e.to_string(),
            })?;

        let mut palette = Self::new();
        for (theme, entry) in entries {
            let background = entry.background.ok_or_else(|| PaletteError::Parse {
                message: format!("theme '{}' has no background", theme),
            })?;
            let color =
                Rgb::parse_value(&background).map_err(|reason| PaletteError::InvalidColor {
                    theme: theme.clone(),
                    value: describe(&background),
                    reason,
                })?;
            palette.backgrounds.insert(theme, color);
        }
        Ok(palette)
    }
}

fn describe(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6_digit() {
        assert_eq!(Rgb::parse_hex("#1e1e1e").unwrap(), Rgb(30, 30, 30));
        assert_eq!(Rgb::parse_hex("#FFFFFF").unwrap(), Rgb(255, 255, 255));
    }

    #[test]
    fn test_parse_hex_3_digit() {
        assert_eq!(Rgb::parse_hex("#f80").unwrap(), Rgb(255, 136, 0));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert!(Rgb::parse_hex("1e1e1e").is_err());
        assert!(Rgb::parse_hex("#12").is_err());
        assert!(Rgb::parse_hex("#gggggg").is_err());
        assert!(Rgb::parse_hex("#éa").is_err());
    }

    #[test]
    fn test_display_is_css_rgb() {
        assert_eq!(Rgb(30, 30, 30).to_string(), "rgb(30, 30, 30)");
    }

    #[test]
    fn test_from_yaml_hex_and_tuple() {
        let palette = Palette::from_yaml(
            r##"
            light:
                background: "#ffffff"
            dark:
                background: [30, 30, 30]
                foreground: "#eeeeee"
            "##,
        )
        .unwrap();

        assert_eq!(palette.len(), 2);
        assert_eq!(palette.background("light"), Some(Rgb(255, 255, 255)));
        assert_eq!(palette.background("dark"), Some(Rgb(30, 30, 30)));
        assert_eq!(palette.background("sepia"), None);
    }

    #[test]
    fn test_from_yaml_invalid_color() {
        let err = Palette::from_yaml(
            r#"
            dark:
                background: [300, 0, 0]
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, PaletteError::InvalidColor { ref theme, .. } if theme == "dark"));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_from_yaml_invalid_hex_keeps_reason() {
        let err = Palette::from_yaml("light: { background: '#1234' }").unwrap_err();
        match err {
            PaletteError::InvalidColor { value, reason, .. } => {
                assert_eq!(value, "#1234");
                assert!(reason.contains("must be 3 or 6 digits"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_yaml_missing_background() {
        let result = Palette::from_yaml("dark: { foreground: '#fff' }");
        assert!(matches!(result, Err(PaletteError::Parse { .. })));
    }

    #[test]
    fn test_from_yaml_malformed() {
        assert!(Palette::from_yaml("not valid yaml: [").is_err());
    }
}
