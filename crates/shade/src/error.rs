//! Error types.
//!
//! Runtime paths (reading state, persisting overrides, observing the OS,
//! applying effects) never fail outward; storage problems are reported as
//! [`StorageError`] by backends and swallowed by the persistence adapter.
//! Only construction-time work such as loading configuration or palettes
//! returns [`ShadeError`].

use std::io;
use std::path::PathBuf;

/// Failure reported by a [`KeyValueStore`](crate::persist::KeyValueStore)
/// backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend is disabled or otherwise not reachable.
    #[error("storage unavailable")]
    Unavailable,

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backing file does not contain a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failure while loading a [`Palette`](crate::effect::Palette).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    /// The YAML document could not be parsed.
    #[error("palette parse error: {message}")]
    Parse {
        /// Message from the YAML parser.
        message: String,
    },

    /// A colour value is not `#rgb`, `#rrggbb` or an `[r, g, b]` tuple.
    #[error("invalid color for theme '{theme}': {value} ({reason})")]
    InvalidColor {
        /// Theme entry holding the bad value.
        theme: String,
        /// The offending value, as written.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors surfaced while setting up an engine.
#[derive(Debug, thiserror::Error)]
pub enum ShadeError {
    /// The configuration document is malformed.
    #[error("config error{}: {message}", in_path(.path))]
    Config {
        /// Optional source file path.
        path: Option<PathBuf>,
        /// What went wrong.
        message: String,
    },

    /// A configuration or palette file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The palette referenced by the configuration is invalid.
    #[error(transparent)]
    Palette(#[from] PaletteError),

    /// A provider was built without a surface or an apply callback.
    #[error("provider needs a surface or an apply_theme callback")]
    NoApplyTarget,
}

impl ShadeError {
    /// Create a configuration error.
    pub fn config(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path,
            message: message.into(),
        }
    }
}

fn in_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

/// Result type for setup operations.
pub type Result<T> = std::result::Result<T, ShadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_from_io() {
        let err: StorageError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_palette_error_display() {
        let err = PaletteError::InvalidColor {
            theme: "dark".into(),
            value: "#12".into(),
            reason: "must be 3 or 6 digits".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid color for theme 'dark': #12 (must be 3 or 6 digits)"
        );
    }

    #[test]
    fn test_config_error_names_path() {
        let err = ShadeError::config(Some(PathBuf::from("/etc/shade.yaml")), "bad key");
        assert_eq!(err.to_string(), "config error in /etc/shade.yaml: bad key");

        let err = ShadeError::config(None, "bad key");
        assert_eq!(err.to_string(), "config error: bad key");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ShadeError::Io {
            path: PathBuf::from("/etc/shade.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/etc/shade.yaml"));
    }
}
