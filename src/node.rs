//! The projected tree: an arena [`Document`] and the [`Node`] handles into it.
//!
//! Nodes live in a flat vector addressed by [`NodeId`]. Parent and sibling
//! links are ids rather than references, so the document owns every node and
//! handles stay `Copy`. Ids are handed out in document order, which makes id
//! comparison a document-order comparison.

use std::fmt;
use std::hash::{Hash, Hasher};

pub type NodeId = usize;

/// The kind of a projected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The synthesized root, one per document.
    Document,
    Element,
    Text,
}

#[derive(Debug, Clone)]
struct NodeData {
    node_type: NodeType,
    name: String,
    value: String,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// An immutable tree built from one message.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    const ROOT: NodeId = 0;

    /// A document holding only its root, named after the source message.
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![NodeData {
                node_type: NodeType::Document,
                name: name.into(),
                value: String::new(),
                parent: None,
                first_child: None,
                last_child: None,
                prev_sibling: None,
                next_sibling: None,
            }],
        }
    }

    pub(crate) fn root_id(&self) -> NodeId {
        Self::ROOT
    }

    /// Appends a new last child under `parent` and returns its id.
    pub(crate) fn append(&mut self, parent: NodeId, node_type: NodeType, name: &str, value: String) -> NodeId {
        let id = self.nodes.len();
        let prev_sibling = self.nodes[parent].last_child;
        self.nodes.push(NodeData {
            node_type,
            name: name.to_string(),
            value,
            parent: Some(parent),
            first_child: None,
            last_child: None,
            prev_sibling,
            next_sibling: None,
        });
        match prev_sibling {
            Some(prev) => self.nodes[prev].next_sibling = Some(id),
            None => self.nodes[parent].first_child = Some(id),
        }
        self.nodes[parent].last_child = Some(id);
        id
    }

    pub(crate) fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.append(parent, NodeType::Element, name, String::new())
    }

    /// Appends an element holding a single text child.
    pub(crate) fn append_leaf(&mut self, parent: NodeId, name: &str, text: String) -> NodeId {
        let element = self.append_element(parent, name);
        self.append(element, NodeType::Text, "", text);
        element
    }

    pub fn root(&self) -> Node<'_> {
        self.node(Self::ROOT)
    }

    /// The root's direct children, for ordinal access.
    pub fn child_nodes(&self) -> Vec<Node<'_>> {
        self.root().children().collect()
    }

    /// The total number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The source message name.
    pub fn name(&self) -> &str {
        &self.nodes[Self::ROOT].name
    }

    pub fn output_xml(&self) -> String {
        self.root().output_xml()
    }

    /// # Panics
    /// If `id` is not a node of this document.
    pub(crate) fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id < self.nodes.len(), "node id {} out of range", id);
        Node { doc: self, id }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id]
    }
}

impl<'d> From<&'d Document> for Node<'d> {
    fn from(doc: &'d Document) -> Self {
        doc.root()
    }
}

/// A handle to one node of a [`Document`].
///
/// Equality is identity: two handles are equal iff they point at the same
/// position of the same document.
#[derive(Clone, Copy)]
pub struct Node<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl<'d> Node<'d> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    pub fn node_type(&self) -> NodeType {
        self.data().node_type
    }

    /// The field name for elements, the message name for the document, empty for text.
    pub fn name(&self) -> &'d str {
        &self.data().name
    }

    /// The text of a text node, or of an element whose only child is a text node.
    pub fn value(&self) -> Option<&'d str> {
        match self.node_type() {
            NodeType::Text => Some(&self.data().value),
            NodeType::Element => {
                let child = self.first_child()?;
                let leaf = child.node_type() == NodeType::Text && child.next_sibling().is_none();
                leaf.then(|| child.data().value.as_str())
            }
            NodeType::Document => None,
        }
    }

    /// The concatenation of every descendant text node in document order.
    pub fn inner_text(&self) -> String {
        if self.node_type() == NodeType::Text {
            return self.data().value.clone();
        }
        let mut text = String::new();
        for node in self.descendants() {
            if node.node_type() == NodeType::Text {
                text.push_str(&node.data().value);
            }
        }
        text
    }

    pub fn parent(&self) -> Option<Node<'d>> {
        self.link(self.data().parent)
    }

    pub fn first_child(&self) -> Option<Node<'d>> {
        self.link(self.data().first_child)
    }

    pub fn last_child(&self) -> Option<Node<'d>> {
        self.link(self.data().last_child)
    }

    pub fn next_sibling(&self) -> Option<Node<'d>> {
        self.link(self.data().next_sibling)
    }

    pub fn prev_sibling(&self) -> Option<Node<'d>> {
        self.link(self.data().prev_sibling)
    }

    pub fn children(&self) -> Children<'d> {
        Children {
            next: self.first_child(),
        }
    }

    /// Every node below this one, in document order.
    pub fn descendants(&self) -> Descendants<'d> {
        Descendants {
            root: *self,
            next: self.first_child(),
        }
    }

    /// The first direct child element named `name`.
    pub fn select_element(&self, name: &str) -> Option<Node<'d>> {
        self.children()
            .find(|child| child.node_type() == NodeType::Element && child.name() == name)
    }

    /// Serializes this node, see [`crate::xml::output_xml`].
    pub fn output_xml(&self) -> String {
        crate::xml::output_xml(*self)
    }

    fn data(&self) -> &'d NodeData {
        self.doc.data(self.id)
    }

    fn link(&self, id: Option<NodeId>) -> Option<Node<'d>> {
        id.map(|id| Node { doc: self.doc, id })
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.doc, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("type", &self.node_type())
            .field("name", &self.name())
            .finish()
    }
}

/// Iterator over the direct children of a node.
#[derive(Debug, Clone)]
pub struct Children<'d> {
    next: Option<Node<'d>>,
}

impl<'d> Iterator for Children<'d> {
    type Item = Node<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}

/// Preorder iterator over the subtree below a node.
#[derive(Debug, Clone)]
pub struct Descendants<'d> {
    root: Node<'d>,
    next: Option<Node<'d>>,
}

impl<'d> Iterator for Descendants<'d> {
    type Item = Node<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.first_child().or_else(|| {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    return None;
                }
                if let Some(sibling) = cursor.next_sibling() {
                    return Some(sibling);
                }
                cursor = cursor.parent()?;
            }
        });
        Some(current)
    }
}
