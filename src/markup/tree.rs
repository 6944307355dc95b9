use std::fmt;

use crate::foundation::error::RasterResult;
use crate::markup::attrs::Attributes;

/// Built-in tags, resolved once when an element is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Document root produced by the parser.
    Container,
    Img,
    Gradient,
    Mirror,
    Rotate,
    Scale,
    Tile,
    Composite,
    /// Any tag without a built-in handler. Evaluation passes through to its children.
    Other,
}

impl Tag {
    pub fn from_name(name: &str) -> Self {
        const BUILTINS: [(&str, Tag); 7] = [
            ("img", Tag::Img),
            ("gradient", Tag::Gradient),
            ("mirror", Tag::Mirror),
            ("rotate", Tag::Rotate),
            ("scale", Tag::Scale),
            ("tile", Tag::Tile),
            ("composite", Tag::Composite),
        ];
        BUILTINS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map_or(Tag::Other, |(_, t)| *t)
    }

    pub fn is_builtin(self) -> bool {
        !matches!(self, Tag::Container | Tag::Other)
    }
}

/// One node of a parsed document.
#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    /// Literal text between tags.
    Text(String),
    Element(Element),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

/// A markup element. Owns its children and its unparsed attribute span.
#[derive(Debug, PartialEq, Eq)]
pub struct Element {
    name: String,
    tag: Tag,
    raw_attrs: Option<String>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element; the name is lower-cased and resolved to a [`Tag`].
    pub fn new(name: &str, raw_attrs: Option<String>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            tag: Tag::from_name(name),
            raw_attrs: raw_attrs.filter(|s| !s.is_empty()),
            children: Vec::new(),
        }
    }

    /// Empty document root.
    pub fn container() -> Self {
        Self {
            name: String::new(),
            tag: Tag::Container,
            raw_attrs: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn raw_attrs(&self) -> Option<&str> {
        self.raw_attrs.as_deref()
    }

    /// Parse this element's attribute span.
    pub fn attributes(&self) -> RasterResult<Attributes> {
        Attributes::parse_opt(self.raw_attrs())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_owned()));
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(t) => f.write_str(t),
            Node::Element(e) => e.fmt(f),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag == Tag::Container {
            for child in &self.children {
                child.fmt(f)?;
            }
            return Ok(());
        }

        write!(f, "<{}", self.name)?;
        if let Ok(attrs) = self.attributes()
            && !attrs.is_empty()
        {
            write!(f, " {attrs}")?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for child in &self.children {
            child.fmt(f)?;
        }
        write!(f, "</{}>", self.name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/tree.rs"]
mod tests;
