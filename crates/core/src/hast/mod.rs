//! Element/text syntax tree consumed by the passes and the renderer.
//!
//! Nodes live in an arena owned by [`Tree`] and are addressed by [`NodeId`].
//! Ids are never reused, so a pass can key side tables by node identity and
//! still find the same node after other passes have re-parented or replaced
//! its siblings.

mod from_mdast;

pub use from_mdast::from_mdast;

/// Stable identity of a node inside one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Value stored in an element's property bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Plain string attribute.
    String(String),
    /// Boolean attribute (`disabled`, `checked`, ...).
    Bool(bool),
    /// Space-separated class names.
    ClassList(Vec<String>),
}

impl PropertyValue {
    /// Borrows the value as a string when it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Insertion-ordered property bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(Vec<(String, PropertyValue)>);

impl Properties {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a property.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether a property is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets a property, keeping the original position when it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Removes a property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    /// Class names, empty when there is no `className`.
    pub fn classes(&self) -> &[String] {
        match self.get("className") {
            Some(PropertyValue::ClassList(list)) => list,
            _ => &[],
        }
    }

    /// Whether `className` contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// Replaces the class list.
    pub fn set_classes(&mut self, classes: Vec<String>) {
        self.insert("className", PropertyValue::ClassList(classes));
    }

    /// Iterates properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name (`pre`, `code`, or an MDX component name such as `Note`).
    pub tag: String,
    /// Property bag.
    pub properties: Properties,
    /// Ordered children.
    pub children: Vec<NodeId>,
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Document root.
    Root {
        /// Top-level children.
        children: Vec<NodeId>,
    },
    /// Element node.
    Element(Element),
    /// Text node with its literal value.
    Text(String),
}

/// Arena-backed syntax tree.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Root {
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrows a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Borrows a node as an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.node(id) {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutably borrows a node as an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0] {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Borrows a node's value when it is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Node::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Whether `id` is an element with the given tag.
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|el| el.tag == tag)
    }

    /// Children of a root or element; empty for text.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Root { children } => children,
            Node::Element(el) => &el.children,
            Node::Text(_) => &[],
        }
    }

    fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.nodes[id.0] {
            Node::Root { children } => Some(children),
            Node::Element(el) => Some(&mut el.children),
            Node::Text(_) => None,
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Allocates a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>, properties: Properties) -> NodeId {
        self.push(Node::Element(Element {
            tag: tag.into(),
            properties,
            children: Vec::new(),
        }))
    }

    /// Allocates a detached text node.
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.push(Node::Text(value.into()))
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        properties: Properties,
    ) -> NodeId {
        let id = self.create_element(tag, properties);
        self.insert_child(parent, usize::MAX, id);
        id
    }

    /// Creates a text node and appends it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, value: impl Into<String>) -> NodeId {
        let id = self.create_text(value);
        self.insert_child(parent, usize::MAX, id);
        id
    }

    /// Inserts `child` at `index` (clamped to the end). Text parents are ignored.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if let Some(children) = self.children_mut(parent) {
            let index = index.min(children.len());
            children.insert(index, child);
        }
    }

    /// Replaces all children of `parent`. Previous children stay allocated but detached.
    pub fn replace_children(&mut self, parent: NodeId, new_children: Vec<NodeId>) {
        if let Some(children) = self.children_mut(parent) {
            *children = new_children;
        }
    }

    /// Attached nodes in document (pre-)order, root first.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Attached elements with the given tag, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| self.is_element(*id, tag))
            .collect()
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Node::Text(value) => out.push_str(value),
            _ => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
        }
    }
}

/// Builds a class-list property bag.
pub fn class_list<I, S>(classes: I) -> Properties
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut props = Properties::new();
    props.set_classes(classes.into_iter().map(Into::into).collect());
    props
}
