//! Abstract map document nodes.
//!
//! Map parsing never depends on a particular document format. Anything that
//! can present itself as a tree of named elements with string attributes,
//! optional text, ordered children and an optional source position can be
//! parsed by implementing [`Node`].
//!
//! [`Element`] is the in-crate implementation. It deserializes from JSON (or any
//! serde format) and has a small builder API for tests and tooling.
//!
//! # Example
//!
//! ```
//! use lattice::{first_attribute, Element, Node};
//!
//! let cores = Element::new("cores")
//!     .attr("leak", "7")
//!     .child(Element::new("core").attr("id", "red"));
//! let children = cores.children();
//! let core = children[0];
//!
//! // Inner element first, then its parent.
//! assert_eq!(first_attribute("leak", &[core, &cores]), Some("7"));
//! assert_eq!(first_attribute("id", &[core, &cores]), Some("red"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Line and column of a node in its source document (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Line number
    pub line: u32,
    /// Column number
    pub column: u32,
}

impl SourcePosition {
    /// Create a source position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A named element with string attributes and ordered children.
pub trait Node {
    /// Element name (e.g. `core`, `cuboid`).
    fn name(&self) -> &str;

    /// Value of an attribute on this element only.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Text content, if any.
    fn text(&self) -> Option<&str>;

    /// Child elements in document order.
    fn children(&self) -> Vec<&dyn Node>;

    /// Where this element starts in its source, when known.
    fn position(&self) -> Option<SourcePosition>;
}

/// Children of `node` with the given element name, in document order.
pub fn children_named<'a>(node: &'a dyn Node, name: &'a str) -> impl Iterator<Item = &'a dyn Node> {
    node.children().into_iter().filter(move |child| child.name() == name)
}

/// Resolve an attribute from the first node in `nodes` that carries it.
///
/// Nodes are ordered innermost first, so an attribute on `<cores>` applies to
/// every nested `<core>` unless the `<core>` overrides it.
#[must_use]
pub fn first_attribute<'a>(name: &str, nodes: &[&'a dyn Node]) -> Option<&'a str> {
    nodes.iter().find_map(|node| node.attribute(name))
}

/// Concrete document element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Element {
    /// Element name
    pub name: String,
    /// Attributes by name
    pub attributes: BTreeMap<String, String>,
    /// Text content
    pub text: Option<String>,
    /// Child elements in order
    pub children: Vec<Element>,
    /// Source position
    pub position: Option<SourcePosition>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set the source position.
    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.position = Some(SourcePosition::new(line, column));
        self
    }
}

impl Node for Element {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.children.iter().map(|c| c as &dyn Node).collect()
    }

    fn position(&self) -> Option<SourcePosition> {
        self.position
    }
}
