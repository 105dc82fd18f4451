//! SVG document tree

use std::collections::HashMap;

use crate::error::ShrinkError;

/// A complete SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    /// XML declaration (e.g., `<?xml version="1.0" encoding="UTF-8"?>`)
    pub xml_declaration: Option<XmlDeclaration>,
    /// DOCTYPE declaration
    pub doctype: Option<String>,
    /// The root SVG element
    pub root: Element,
}

/// XML declaration attributes.
#[derive(Debug, Clone)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<bool>,
}

/// An SVG/XML element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name with optional prefix (e.g., "svg", "svg:rect")
    pub name: QName,
    /// Attributes in document order. Names are unique.
    pub attributes: Vec<Attribute>,
    /// Child nodes
    pub children: Vec<Node>,
    /// Whether the element was written as `<x/>` rather than `<x></x>`.
    /// Only observable when `children` is empty.
    pub self_closing: bool,
}

/// A qualified name (possibly with namespace prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (e.g., "svg", "xlink")
    pub prefix: Option<String>,
    /// Local name (e.g., "rect", "href")
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Parse a qualified name from a string like "prefix:local" or just "local".
    pub fn parse(s: &str) -> Self {
        if let Some((prefix, local)) = s.split_once(':') {
            Self::with_prefix(prefix, local)
        } else {
            Self::new(s)
        }
    }

    /// Check if this is a namespace declaration (xmlns or xmlns:prefix).
    pub fn is_xmlns(&self) -> bool {
        self.prefix.as_deref() == Some("xmlns") || (self.prefix.is_none() && self.local == "xmlns")
    }

    /// Compare against a name as written in markup. `xlink:href` and `href`
    /// are different names.
    pub fn matches(&self, name: &str) -> bool {
        match &self.prefix {
            Some(p) => name
                .split_once(':')
                .is_some_and(|(np, nl)| np == p && nl == self.local),
            None => name == self.local,
        }
    }

    /// Get the full name as a string.
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QName::parse(name),
            value: value.into(),
        }
    }
}

/// A node in the SVG tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element node
    Element(Element),
    /// A text node
    Text(String),
    /// A comment node
    Comment(String),
    /// A CDATA section
    CData(String),
    /// A processing instruction (e.g., `<?xml-stylesheet ... ?>`)
    ProcessingInstruction { target: String, content: Option<String> },
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: QName::parse(name),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Get an attribute value by its name as written (`href`, `xlink:href`).
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.matches(name))
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name.matches(name))
    }

    /// Set an attribute value, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.matches(name)) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|a| a.name.matches(name))?;
        Some(self.attributes.remove(pos).value)
    }

    /// Rename an attribute in place. Returns false if `from` is absent or
    /// `to` already exists.
    pub fn rename_attr(&mut self, from: &str, to: &str) -> bool {
        if self.has_attr(to) {
            return false;
        }
        match self.attributes.iter_mut().find(|a| a.name.matches(from)) {
            Some(attr) => {
                attr.name = QName::parse(to);
                true
            }
            None => false,
        }
    }

    /// Check if this element has a specific local name.
    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    /// Get all namespace declarations on this element.
    pub fn namespaces(&self) -> HashMap<Option<&str>, &str> {
        let mut ns = HashMap::new();
        for attr in &self.attributes {
            if attr.name.local == "xmlns" && attr.name.prefix.is_none() {
                ns.insert(None, attr.value.as_str());
            } else if attr.name.prefix.as_deref() == Some("xmlns") {
                ns.insert(Some(attr.name.local.as_str()), attr.value.as_str());
            }
        }
        ns
    }

    /// Iterate over child elements only (skip text, comments, etc.).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterate over child elements mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }
}

/// What [`Document::query`] selects.
#[derive(Debug, Clone, Copy)]
pub enum Pattern<'a> {
    /// Elements with this local name.
    Tag(&'a str),
    /// Elements carrying this attribute.
    Attribute(&'a str),
    /// Every element.
    Any,
}

impl Pattern<'_> {
    fn accepts(&self, elem: &Element) -> bool {
        match self {
            Pattern::Tag(name) => elem.is(name),
            Pattern::Attribute(name) => elem.has_attr(name),
            Pattern::Any => true,
        }
    }
}

/// Location of a node as child indices from the root element. The root
/// itself is the empty path.
pub type NodePath = Vec<usize>;

impl Document {
    /// Recursively visit all elements in the document.
    pub fn for_each_element(&self, mut f: impl FnMut(&Element)) {
        fn visit(elem: &Element, f: &mut impl FnMut(&Element)) {
            f(elem);
            for child in elem.child_elements() {
                visit(child, f);
            }
        }
        visit(&self.root, &mut f);
    }

    /// Recursively visit all elements mutably.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        fn visit(elem: &mut Element, f: &mut impl FnMut(&mut Element)) {
            f(elem);
            for child in elem.child_elements_mut() {
                visit(child, f);
            }
        }
        visit(&mut self.root, &mut f);
    }

    /// Collect the paths of all matching elements in pre-order.
    ///
    /// The result is a snapshot: mutating the tree afterwards does not change
    /// it, and paths after a removed or inserted node may go stale. Walk the
    /// list in reverse when removing.
    pub fn query(&self, pattern: Pattern<'_>) -> Vec<NodePath> {
        fn visit(elem: &Element, path: &mut NodePath, pattern: &Pattern<'_>, out: &mut Vec<NodePath>) {
            if pattern.accepts(elem) {
                out.push(path.clone());
            }
            for (i, child) in elem.children.iter().enumerate() {
                if let Node::Element(e) = child {
                    path.push(i);
                    visit(e, path, pattern, out);
                    path.pop();
                }
            }
        }

        let mut out = Vec::new();
        visit(&self.root, &mut Vec::new(), &pattern, &mut out);
        out
    }

    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        let mut elem = &self.root;
        for &i in path {
            elem = elem.children.get(i)?.as_element()?;
        }
        Some(elem)
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut elem = &mut self.root;
        for &i in path {
            elem = elem.children.get_mut(i)?.as_element_mut()?;
        }
        Some(elem)
    }

    /// Take a node out of the tree. The root cannot be detached.
    pub fn detach(&mut self, path: &[usize]) -> Option<Node> {
        let (&index, parent) = path.split_last()?;
        let parent = self.element_mut(parent)?;
        if index < parent.children.len() {
            Some(parent.children.remove(index))
        } else {
            None
        }
    }

    /// Remove a node, returning whether anything was removed.
    pub fn remove(&mut self, path: &[usize]) -> bool {
        self.detach(path).is_some()
    }

    /// Insert `node` as child number `index` of the element at `parent`.
    pub fn insert(&mut self, parent: &[usize], index: usize, node: Node) -> Result<(), ShrinkError> {
        let elem = self
            .element_mut(parent)
            .ok_or_else(|| ShrinkError::InvalidSvg(format!("No element at {:?}", parent)))?;
        if index > elem.children.len() {
            return Err(ShrinkError::InvalidSvg(format!(
                "Child index {} out of range for {:?}",
                index, parent
            )));
        }
        elem.children.insert(index, node);
        Ok(())
    }

    /// Serialize the document to markup.
    pub fn to_markup(&self) -> String {
        crate::serialize::serialize(self)
    }

    /// Replace the content of this document with freshly parsed markup.
    /// On error the document is left untouched.
    pub fn reparse(&mut self, markup: &str) -> Result<(), ShrinkError> {
        *self = crate::parse::parse_svg(markup)?;
        Ok(())
    }
}
