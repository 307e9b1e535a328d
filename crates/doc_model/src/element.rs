//! Parsed-element input model
//!
//! The package/XML collaborator hands the document in as trees of `Element`
//! values: local element names, raw attribute strings, children in document
//! order. All numeric and unit interpretation happens on this side of the
//! seam, so the collaborator needs no knowledge of WordprocessingML
//! semantics, and this crate needs no XML parser.

use serde::{Deserialize, Serialize};

/// One node of a parsed element tree.
///
/// Names and attribute keys are local names without namespace prefixes
/// (`"pPr"`, `"val"`, `"ascii"`). Attribute values are the raw strings from
/// the document; unparseable values are treated as absent wherever they are
/// consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Local element name
    pub name: String,
    /// Attributes as (name, raw value) pairs in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Text content, for text-bearing elements
    pub text: Option<String>,
}

impl Element {
    /// Create a new element with the given local name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element (builder style)
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set text content (builder style)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Get a raw attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse an attribute as an integer; unparseable values read as absent
    pub fn int_attr(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(|v| v.trim().parse::<i64>().ok())
    }

    /// First child with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name, in document order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Depth-first descendants, in document order
    pub fn descendants(&self) -> impl Iterator<Item = &Element> {
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Concatenated text of this element and its descendants
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        if let Some(ref t) = self.text {
            out.push_str(t);
        }
        for child in &self.children {
            out.push_str(&child.inner_text());
        }
        out
    }
}

/// The document-structure collaborator interface.
///
/// Implementations expose the already-parsed parts of one open document.
/// Every part except the body is optional; loaders degrade to built-in
/// defaults when a part is absent.
pub trait DocumentSource {
    /// The document body, containing `p` and `tbl` blocks in document order
    fn body(&self) -> Option<&Element>;

    /// The style definitions part (`styles` root)
    fn styles_part(&self) -> Option<&Element>;

    /// The theme part (font scheme and color scheme)
    fn theme_part(&self) -> Option<&Element>;

    /// The numbering definitions part (`numbering` root)
    fn numbering_part(&self) -> Option<&Element>;

    /// The document settings part (`settings` root)
    fn settings_part(&self) -> Option<&Element>;
}

/// A `DocumentSource` over owned element trees.
///
/// Parsing collaborators fill this in; tests construct it directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemorySource {
    pub body: Option<Element>,
    pub styles: Option<Element>,
    pub theme: Option<Element>,
    pub numbering: Option<Element>,
    pub settings: Option<Element>,
}

impl DocumentSource for InMemorySource {
    fn body(&self) -> Option<&Element> {
        self.body.as_ref()
    }

    fn styles_part(&self) -> Option<&Element> {
        self.styles.as_ref()
    }

    fn theme_part(&self) -> Option<&Element> {
        self.theme.as_ref()
    }

    fn numbering_part(&self) -> Option<&Element> {
        self.numbering.as_ref()
    }

    fn settings_part(&self) -> Option<&Element> {
        self.settings.as_ref()
    }
}
