//! A cursor over a [`Document`] that the XPath engine walks.

use crate::node::{Document, Node, NodeId, NodeType};
use protoquery_xpath::navigator::{Navigator, NodeType as XPathNodeType};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A mutable position in a [`Document`], fixed to the root it was created at.
///
/// Many navigators may walk the same document at once. Moving one never
/// touches the document or any other navigator.
#[derive(Debug, Clone, Copy)]
pub struct NodeNavigator<'d> {
    doc: &'d Document,
    root: NodeId,
    current: NodeId,
}

/// A navigator positioned on the document root.
pub fn create_navigator(doc: &Document) -> NodeNavigator<'_> {
    NodeNavigator::new(doc.root())
}

impl<'d> NodeNavigator<'d> {
    /// A navigator whose root, and starting position, is `node`.
    pub fn new(node: Node<'d>) -> Self {
        Self {
            doc: node.document(),
            root: node.id(),
            current: node.id(),
        }
    }

    /// The node under the cursor.
    pub fn current(&self) -> Node<'d> {
        self.doc.node(self.current)
    }

    fn step(&mut self, target: Option<Node<'d>>) -> bool {
        match target {
            Some(node) => {
                self.current = node.id();
                true
            }
            None => false,
        }
    }
}

impl PartialEq for NodeNavigator<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.current == other.current
    }
}

impl Eq for NodeNavigator<'_> {}

impl Hash for NodeNavigator<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.doc, state);
        self.current.hash(state);
    }
}

impl PartialOrd for NodeNavigator<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeNavigator<'_> {
    // Ids are assigned in document order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.current.cmp(&other.current)
    }
}

impl Navigator for NodeNavigator<'_> {
    fn node_type(&self) -> XPathNodeType {
        match self.current().node_type() {
            NodeType::Document => XPathNodeType::Root,
            NodeType::Element => XPathNodeType::Element,
            NodeType::Text => XPathNodeType::Text,
        }
    }

    fn local_name(&self) -> &str {
        let node = self.current();
        match node.node_type() {
            NodeType::Element => node.name(),
            NodeType::Document | NodeType::Text => "",
        }
    }

    fn value(&self) -> String {
        self.current().inner_text()
    }

    fn move_to_root(&mut self) {
        self.current = self.root;
    }

    fn move_to_parent(&mut self) -> bool {
        let parent = self.current().parent();
        self.step(parent)
    }

    fn move_to_child(&mut self) -> bool {
        let child = self.current().first_child();
        self.step(child)
    }

    fn move_to_next(&mut self) -> bool {
        let next = self.current().next_sibling();
        self.step(next)
    }

    fn move_to_previous(&mut self) -> bool {
        let previous = self.current().prev_sibling();
        self.step(previous)
    }

    fn move_to(&mut self, other: &Self) -> bool {
        if !std::ptr::eq(self.doc, other.doc) {
            return false;
        }
        self.current = other.current;
        true
    }
}
