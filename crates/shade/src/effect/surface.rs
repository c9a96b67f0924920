//! The presentation surface restyled by the default apply strategy.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::palette::Palette;
use super::DEFAULT_ATTRIBUTE;

/// The document-like target of the default apply strategy.
///
/// Mirrors the small slice of a DOM the engine touches: attributes on the
/// root element, the root's computed background, and optional named hint
/// elements (a `<meta name="theme-color">` in a browser).
pub trait Surface {
    /// Sets an attribute on the root element.
    fn set_root_attribute(&self, name: &str, value: &str);

    /// Reads an attribute from the root element.
    fn root_attribute(&self, name: &str) -> Option<String>;

    /// The root's current background colour in CSS form, if known.
    fn computed_background(&self) -> Option<String>;

    /// Sets the content of the hint element `name`.
    ///
    /// Returns false, without error, when no such element exists.
    fn set_hint(&self, name: &str, content: &str) -> bool;
}

/// An in-memory [`Surface`].
///
/// The computed background is looked up in a [`Palette`] using the value of
/// the root's theme attribute (`data-theme` unless configured otherwise).
/// Hint elements exist only when declared with [`with_hint`](Self::with_hint).
///
/// ```rust
/// use shade::effect::{Document, Palette, Surface};
///
/// let doc = Document::new(Palette::standard()).with_hint("theme-color");
/// doc.set_root_attribute("data-theme", "dark");
/// assert_eq!(doc.computed_background().as_deref(), Some("rgb(30, 30, 30)"));
/// ```
#[derive(Debug)]
pub struct Document {
    palette: Palette,
    theme_attribute: String,
    root: RefCell<BTreeMap<String, String>>,
    hints: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

impl Document {
    /// A document with no attributes and no hint elements.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            theme_attribute: DEFAULT_ATTRIBUTE.to_string(),
            root: RefCell::new(BTreeMap::new()),
            hints: RefCell::new(BTreeMap::new()),
            writes: Cell::new(0),
        }
    }

    /// Declares a hint element with empty content.
    pub fn with_hint(self, name: impl Into<String>) -> Self {
        self.hints.borrow_mut().insert(name.into(), String::new());
        self
    }

    /// Uses `name` as the root attribute that selects the palette entry.
    pub fn with_theme_attribute(mut self, name: impl Into<String>) -> Self {
        self.theme_attribute = name.into();
        self
    }

    /// Content of the hint element `name`, if it exists.
    pub fn hint(&self, name: &str) -> Option<String> {
        self.hints.borrow().get(name).cloned()
    }

    /// Total number of attribute and hint writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// The palette backing [`computed_background`](Surface::computed_background).
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl Surface for Document {
    fn set_root_attribute(&self, name: &str, value: &str) {
        self.root
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root.borrow().get(name).cloned()
    }

    fn computed_background(&self) -> Option<String> {
        let theme = self.root_attribute(&self.theme_attribute)?;
        self.palette.background(&theme).map(|rgb| rgb.to_string())
    }

    fn set_hint(&self, name: &str, content: &str) -> bool {
        let mut hints = self.hints.borrow_mut();
        match hints.get_mut(name) {
            Some(slot) => {
                *slot = content.to_string();
                self.writes.set(self.writes.get() + 1);
                true
            }
            None => false,
        }
    }
}
