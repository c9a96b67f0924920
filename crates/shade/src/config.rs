//! YAML configuration.
//!
//! Every field is optional; an empty document yields the defaults.
//!
//! ```yaml
//! key: theme
//! storage:
//!   kind: file
//!   path: state/theme.json
//! attribute: data-theme
//! hint: theme-color
//! palette: palette.yaml
//! ```
//!
//! Relative paths in a file loaded with [`ShadeConfig::from_file`] resolve
//! against the directory holding that file.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;
use tracing::debug;

use crate::effect::{Document, Palette, DEFAULT_ATTRIBUTE, DEFAULT_HINT};
use crate::error::{Result, ShadeError};
use crate::persist::{FileStorage, KeyValueStore, MemoryStorage, PersistenceAdapter};

/// Where the override is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Volatile, lost when the process exits.
    #[default]
    Memory,
    /// A JSON file.
    File {
        /// Location of the file.
        path: PathBuf,
    },
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadeConfig {
    /// State key, also the persistence key.
    pub key: String,
    /// Persistence backend.
    pub storage: StorageConfig,
    /// Root attribute written by the surface strategy.
    pub attribute: String,
    /// Hint element updated by the surface strategy.
    pub hint: String,
    /// Palette file. The standard palette is used when absent.
    pub palette: Option<PathBuf>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            key: "theme".to_string(),
            storage: StorageConfig::default(),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            hint: DEFAULT_HINT.to_string(),
            palette: None,
            base_dir: None,
        }
    }
}

impl ShadeConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ShadeError::Config`] for malformed YAML, unknown fields, or
    /// an empty key.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse(yaml, None)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ShadeError::Io`] if the file cannot be read and
    /// [`ShadeError::Config`] if it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ShadeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&yaml, Some(path))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!(path = %path.display(), key = %config.key, "loaded shade config");
        Ok(config)
    }

    fn parse(yaml: &str, path: Option<&Path>) -> Result<Self> {
        // An empty document deserializes as null, not as an empty mapping.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| ShadeError::config(path.map(Path::to_path_buf), e.to_string()))?
        };

        if config.key.trim().is_empty() {
            return Err(ShadeError::config(
                path.map(Path::to_path_buf),
                "key must not be empty",
            ));
        }
        Ok(config)
    }

    /// Opens the configured storage backend.
    ///
    /// File storage is opened lazily; a missing file is not an error.
    pub fn open_storage(&self) -> Result<Rc<dyn KeyValueStore>> {
        let store: Rc<dyn KeyValueStore> = match &self.storage {
            StorageConfig::Memory => Rc::new(MemoryStorage::new()),
            StorageConfig::File { path } => {
                let path = self.resolve(path);
                if path.is_dir() {
                    return Err(ShadeError::config(
                        None,
                        format!("storage path {} is a directory", path.display()),
                    ));
                }
                Rc::new(FileStorage::new(path))
            }
        };
        Ok(store)
    }

    /// A persistence adapter over [`open_storage`](Self::open_storage).
    pub fn persistence(&self) -> Result<PersistenceAdapter> {
        Ok(PersistenceAdapter::from_shared(self.open_storage()?))
    }

    /// Loads the configured palette, or the standard one.
    ///
    /// # Errors
    ///
    /// Returns [`ShadeError::Io`] if the palette file cannot be read and
    /// [`ShadeError::Palette`] if it is invalid.
    pub fn load_palette(&self) -> Result<Palette> {
        let Some(path) = &self.palette else {
            return Ok(Palette::standard());
        };
        let path = self.resolve(path);
        let yaml = fs::read_to_string(&path).map_err(|source| ShadeError::Io {
            path: path.clone(),
            source,
        })?;
        let palette = Palette::from_yaml(&yaml)?;
        debug!(path = %path.display(), themes = palette.len(), "loaded palette");
        Ok(palette)
    }

    /// An in-memory document using the configured palette and attribute,
    /// with the configured hint element declared.
    pub fn document(&self) -> Result<Document> {
        Ok(Document::new(self.load_palette()?)
            .with_theme_attribute(self.attribute.clone())
            .with_hint(self.hint.clone()))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Rgb, Surface};
    use crate::error::PaletteError;
    use crate::Theme;
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_is_default() {
        let config = ShadeConfig::from_yaml("").unwrap();
        assert_eq!(config, ShadeConfig::default());
        assert_eq!(config.key, "theme");
        assert_eq!(config.attribute, "data-theme");
        assert_eq!(config.hint, "theme-color");
        assert_eq!(config.storage, StorageConfig::Memory);
    }

    #[test]
    fn test_full_document() {
        let config = ShadeConfig::from_yaml(
            r#"
            key: editor-theme
            storage:
              kind: file
              path: /tmp/theme.json
            attribute: data-mode
            hint: color-scheme
            palette: palette.yaml
            "#,
        )
        .unwrap();

        assert_eq!(config.key, "editor-theme");
        assert_eq!(
            config.storage,
            StorageConfig::File {
                path: PathBuf::from("/tmp/theme.json")
            }
        );
        assert_eq!(config.attribute, "data-mode");
        assert_eq!(config.hint, "color-scheme");
        assert_eq!(config.palette, Some(PathBuf::from("palette.yaml")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ShadeConfig::from_yaml("colour: blue").unwrap_err();
        assert!(matches!(err, ShadeError::Config { path: None, .. }));
    }

    #[test]
    fn test_unknown_storage_kind_rejected() {
        assert!(ShadeConfig::from_yaml("storage: { kind: cloud }").is_err());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(ShadeConfig::from_yaml("key: ''").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ShadeConfig::from_file(dir.path().join("shade.yaml")).unwrap_err();
        assert!(matches!(err, ShadeError::Io { .. }));
    }

    #[test]
    fn test_file_storage_resolves_relative_to_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("shade.yaml");
        fs::write(&config_path, "storage:\n  kind: file\n  path: state/theme.json\n").unwrap();

        let config = ShadeConfig::from_file(&config_path).unwrap();
        let persistence = config.persistence().unwrap();
        persistence.save("theme", Some(Theme::Dark));

        let written = fs::read_to_string(dir.path().join("state/theme.json")).unwrap();
        assert!(written.contains("\"dark\""));
        assert_eq!(persistence.load::<Theme>("theme"), Some(Theme::Dark));
    }

    #[test]
    fn test_storage_path_is_directory() {
        let dir = TempDir::new().unwrap();
        let yaml = format!("storage:\n  kind: file\n  path: {}\n", dir.path().display());
        let config = ShadeConfig::from_yaml(&yaml).unwrap();
        assert!(matches!(config.open_storage(), Err(ShadeError::Config { .. })));
    }

    #[test]
    fn test_default_palette_is_standard() {
        let config = ShadeConfig::default();
        assert_eq!(config.load_palette().unwrap(), Palette::standard());
    }

    #[test]
    fn test_palette_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("palette.yaml"), "dark:\n  background: \"#000\"\n").unwrap();
        let config_path = dir.path().join("shade.yaml");
        fs::write(&config_path, "palette: palette.yaml\nattribute: data-mode\n").unwrap();

        let config = ShadeConfig::from_file(&config_path).unwrap();
        let doc = config.document().unwrap();
        doc.set_root_attribute("data-mode", "dark");

        assert_eq!(doc.palette().background("dark"), Some(Rgb(0, 0, 0)));
        assert_eq!(doc.computed_background().as_deref(), Some("rgb(0, 0, 0)"));
        assert_eq!(doc.hint("theme-color").as_deref(), Some(""));
    }

    #[test]
    fn test_invalid_palette_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("palette.yaml"), "dark:\n  background: nope\n").unwrap();
        let config_path = dir.path().join("shade.yaml");
        fs::write(&config_path, "palette: palette.yaml\n").unwrap();

        let err = ShadeConfig::from_file(&config_path)
            .unwrap()
            .load_palette()
            .unwrap_err();
        assert!(matches!(
            err,
            ShadeError::Palette(PaletteError::InvalidColor { .. })
        ));
    }
}
