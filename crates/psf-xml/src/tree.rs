//! Arena-backed document tree.
//!
//! Every element lives in a single vector owned by [`Document`] and is
//! addressed through a copyable [`NodeId`]. Navigation never mutates the
//! document, so callers can hold any number of handles at once and there is
//! no shared cursor to restore after a read or write.

use std::fmt;

/// Handle of an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single attribute in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    attributes: Vec<Attribute>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: String::new(),
            parent,
            children: Vec::new(),
        }
    }
}

/// Hierarchical document with a single root element.
///
/// Removed elements stay in the arena but are unreachable from the root;
/// handles to them remain valid for reading.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Create a document consisting of an empty root element.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            elements: vec![Element::new(root_name.into(), None)],
        }
    }

    /// Handle of the root element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn element(&self, id: NodeId) -> &Element {
        &self.elements[id.0]
    }

    fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Tag name of an element.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.element(id).name
    }

    /// Parent of an element, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).parent
    }

    /// All children in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.element(id).children
    }

    /// Children with the given tag name, in document order.
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.element(id)
            .children
            .iter()
            .copied()
            .filter(move |child| self.name(*child) == name)
    }

    /// First child with the given tag name.
    #[must_use]
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children_named(id, name).next()
    }

    /// Text of the first child with the given tag name.
    #[must_use]
    pub fn child_text(&self, id: NodeId, name: &str) -> Option<&str> {
        self.child(id, name).map(|child| self.text(child))
    }

    /// Append a new child element and return its handle.
    pub fn append_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.push_element(name.into(), parent);
        self.element_mut(parent).children.push(id);
        id
    }

    /// Insert a new child element directly before `sibling`.
    ///
    /// Appends when `sibling` is not a child of `parent`.
    pub fn insert_child_before(
        &mut self,
        parent: NodeId,
        sibling: NodeId,
        name: impl Into<String>,
    ) -> NodeId {
        let id = self.push_element(name.into(), parent);
        let children = &mut self.element_mut(parent).children;
        match children.iter().position(|child| *child == sibling) {
            Some(position) => children.insert(position, id),
            None => children.push(id),
        }
        id
    }

    /// First child with the given name, created at the end if absent.
    pub fn child_or_append(&mut self, parent: NodeId, name: &str) -> NodeId {
        match self.child(parent, name) {
            Some(id) => id,
            None => self.append_child(parent, name),
        }
    }

    /// Detach a child from its parent. Returns false if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.element_mut(parent).children;
        match children.iter().position(|id| *id == child) {
            Some(position) => {
                children.remove(position);
                self.element_mut(child).parent = None;
                true
            }
            None => false,
        }
    }

    fn push_element(&mut self, name: String, parent: NodeId) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(Element::new(name, Some(parent)));
        id
    }

    /// Direct text content of an element.
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        &self.element(id).text
    }

    /// Text as it is written out and read back.
    ///
    /// Text of an element with children is trimmed, since the whitespace
    /// around child elements belongs to the layout.
    #[must_use]
    pub fn stored_text(&self, id: NodeId) -> &str {
        let element = self.element(id);
        if element.children.is_empty() {
            &element.text
        } else {
            element.text.trim()
        }
    }

    /// Replace the direct text content of an element.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.element_mut(id).text = text.into();
    }

    pub(crate) fn push_text(&mut self, id: NodeId, text: &str) {
        self.element_mut(id).text.push_str(text);
    }

    pub(crate) fn trim_text(&mut self, id: NodeId) {
        let element = self.element_mut(id);
        let trimmed = element.text.trim();
        if trimmed.len() != element.text.len() {
            element.text = trimmed.to_string();
        }
    }

    /// Attributes of an element in document order.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        &self.element(id).attributes
    }

    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Value of an attribute.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Value of an attribute parsed as an unsigned integer.
    ///
    /// Accepts decimal and `0x` prefixed hexadecimal. `None` when the
    /// attribute is missing, `Some(None)` when it does not parse.
    #[must_use]
    pub fn attribute_u32(&self, id: NodeId, name: &str) -> Option<Option<u32>> {
        self.attribute(id, name).map(parse_u32)
    }

    /// Set an attribute, overwriting in place or appending.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let attributes = &mut self.element_mut(id).attributes;
        match attributes.iter_mut().find(|attribute| attribute.name == name) {
            Some(attribute) => attribute.value = value,
            None => attributes.push(Attribute::new(name, value)),
        }
    }

    /// Set an attribute to the decimal form of an integer.
    pub fn set_attribute_u32(&mut self, id: NodeId, name: &str, value: u32) {
        self.set_attribute(id, name, value.to_string());
    }

    pub(crate) fn push_attribute(&mut self, id: NodeId, attribute: Attribute) {
        self.element_mut(id).attributes.push(attribute);
    }

    /// Slash-separated location of an element for diagnostics.
    ///
    /// Siblings with the same tag are disambiguated with a one-based index,
    /// e.g. `/root/nodes/node[2]/name`.
    #[must_use]
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let name = self.name(node);
            let parent = self.parent(node);
            let segment = match parent {
                Some(parent) => {
                    let same: Vec<NodeId> = self.children_named(parent, name).collect();
                    if same.len() > 1 {
                        let position = same.iter().position(|n| *n == node).unwrap_or(0);
                        format!("{name}[{}]", position + 1)
                    } else {
                        name.to_string()
                    }
                }
                None => name.to_string(),
            };
            segments.push(segment);
            current = parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }
}

/// Parse an unsigned integer in decimal or `0x` hexadecimal notation.
///
/// Signs are rejected.
#[must_use]
pub fn parse_u32(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
