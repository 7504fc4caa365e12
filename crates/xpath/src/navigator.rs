//! Defines the cursor abstraction the evaluator walks trees with.
use std::fmt::Debug;
use std::hash::Hash;

/// The type of the node under a navigator, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Text,
}

/// A stateful cursor over a read-only tree.
///
/// The evaluator never sees nodes directly. It clones cursors to remember
/// positions, moves them along parent, child and sibling links, and compares
/// them to deduplicate node-sets. Implementations must therefore honour two
/// contracts on top of the movement methods:
///
/// - `Eq` and `Hash` are node *identity*: two cursors are equal iff they sit on
///   the same node of the same tree. Structurally identical nodes at different
///   positions are distinct.
/// - `Ord` is document order for cursors over the same tree.
///
/// Every `move_*` method that returns `bool` leaves the cursor untouched when
/// it returns `false`.
pub trait Navigator: Debug + Clone + Eq + Hash + Ord {
    /// The type of the node under the cursor.
    fn node_type(&self) -> NodeType;

    /// The local name of the node under the cursor. Empty for root and text nodes.
    fn local_name(&self) -> &str;

    /// The string value of the node, as defined by the XPath 1.0 `string()` function.
    /// - For a text node, this is its content.
    /// - For an element or the root, this is the concatenation of all descendant
    ///   text nodes in document order.
    fn value(&self) -> String;

    /// Moves to the root the navigator was created with. Always succeeds.
    fn move_to_root(&mut self);

    fn move_to_parent(&mut self) -> bool;

    /// Moves to the first child of the current node.
    fn move_to_child(&mut self) -> bool;

    fn move_to_next(&mut self) -> bool;

    fn move_to_previous(&mut self) -> bool;

    /// Moves to the position of `other`. Fails if `other` walks a different tree.
    fn move_to(&mut self, other: &Self) -> bool;

    fn is_same_node(&self, other: &Self) -> bool {
        self == other
    }

    /// An independent cursor at the same position.
    fn copy(&self) -> Self {
        self.clone()
    }
}

// Test utilities - publicly available for integration testing in downstream crates
pub mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::hash::Hasher;

    #[derive(Debug, Clone)]
    struct MockNodeData {
        node_type: NodeType,
        name: &'static str,
        value: &'static str,
        parent: Option<usize>,
        children: Vec<usize>,
    }

    /// An arena tree whose node ids are assigned in document order.
    #[derive(Debug, Default)]
    pub struct MockTree {
        nodes: Vec<MockNodeData>,
    }

    impl MockTree {
        fn push(&mut self, node_type: NodeType, name: &'static str, value: &'static str, parent: Option<usize>) -> usize {
            let id = self.nodes.len();
            self.nodes.push(MockNodeData {
                node_type,
                name,
                value,
                parent,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                self.nodes[parent].children.push(id);
            }
            id
        }

        fn element(&mut self, parent: usize, name: &'static str) -> usize {
            self.push(NodeType::Element, name, "", Some(parent))
        }

        fn leaf(&mut self, parent: usize, name: &'static str, text: &'static str) -> usize {
            let id = self.element(parent, name);
            self.push(NodeType::Text, "", text, Some(id));
            id
        }

        pub fn navigator(&self) -> MockNavigator<'_> {
            MockNavigator {
                tree: self,
                root: 0,
                current: 0,
            }
        }

        /// A navigator already positioned on node `id`.
        pub fn navigator_at(&self, id: usize) -> MockNavigator<'_> {
            MockNavigator {
                tree: self,
                root: 0,
                current: id,
            }
        }
    }

    /// A cursor into a [`MockTree`].
    #[derive(Debug, Clone, Copy)]
    pub struct MockNavigator<'a> {
        tree: &'a MockTree,
        root: usize,
        pub current: usize,
    }

    impl MockNavigator<'_> {
        fn sibling(&self, offset: isize) -> Option<usize> {
            let parent = self.tree.nodes[self.current].parent?;
            let siblings = &self.tree.nodes[parent].children;
            let index = siblings.iter().position(|&id| id == self.current)?;
            let target = index.checked_add_signed(offset)?;
            siblings.get(target).copied()
        }
    }

    impl PartialEq for MockNavigator<'_> {
        fn eq(&self, other: &Self) -> bool {
            std::ptr::eq(self.tree, other.tree) && self.current == other.current
        }
    }
    impl Eq for MockNavigator<'_> {}

    impl PartialOrd for MockNavigator<'_> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for MockNavigator<'_> {
        fn cmp(&self, other: &Self) -> Ordering {
            self.current.cmp(&other.current)
        }
    }

    impl Hash for MockNavigator<'_> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.current.hash(state);
        }
    }

    impl Navigator for MockNavigator<'_> {
        fn node_type(&self) -> NodeType {
            self.tree.nodes[self.current].node_type
        }

        fn local_name(&self) -> &str {
            self.tree.nodes[self.current].name
        }

        fn value(&self) -> String {
            let mut out = String::new();
            let mut stack = vec![self.current];
            while let Some(id) = stack.pop() {
                let node = &self.tree.nodes[id];
                if node.node_type == NodeType::Text {
                    out.push_str(node.value);
                }
                stack.extend(node.children.iter().rev());
            }
            out
        }

        fn move_to_root(&mut self) {
            self.current = self.root;
        }

        fn move_to_parent(&mut self) -> bool {
            match self.tree.nodes[self.current].parent {
                Some(parent) => {
                    self.current = parent;
                    true
                }
                None => false,
            }
        }

        fn move_to_child(&mut self) -> bool {
            match self.tree.nodes[self.current].children.first() {
                Some(&child) => {
                    self.current = child;
                    true
                }
                None => false,
            }
        }

        fn move_to_next(&mut self) -> bool {
            match self.sibling(1) {
                Some(next) => {
                    self.current = next;
                    true
                }
                None => false,
            }
        }

        fn move_to_previous(&mut self) -> bool {
            match self.sibling(-1) {
                Some(previous) => {
                    self.current = previous;
                    true
                }
                None => false,
            }
        }

        fn move_to(&mut self, other: &Self) -> bool {
            if !std::ptr::eq(self.tree, other.tree) {
                return false;
            }
            self.current = other.current;
            true
        }
    }

    /// Creates a small library catalogue for testing:
    /// ```text
    /// (root)                                      id 0
    ///   <library>                                 id 1
    ///     <book><title>Rust</title><year>2015</year></book>   ids 2-6
    ///     <book><title>Go</title><year>2009</year></book>     ids 7-11
    ///     <book><title>Zig</title></book>                     ids 12-14
    ///   </library>
    ///   <shelf/>                                  id 15
    /// ```
    pub fn create_test_tree() -> MockTree {
        let mut tree = MockTree::default();
        let root = tree.push(NodeType::Root, "", "", None);
        let library = tree.element(root, "library");

        let book = tree.element(library, "book");
        tree.leaf(book, "title", "Rust");
        tree.leaf(book, "year", "2015");

        let book = tree.element(library, "book");
        tree.leaf(book, "title", "Go");
        tree.leaf(book, "year", "2009");

        let book = tree.element(library, "book");
        tree.leaf(book, "title", "Zig");

        tree.element(root, "shelf");
        tree
    }

    #[test]
    fn test_mock_ids_follow_document_order() {
        let tree = create_test_tree();
        let mut nav = tree.navigator();
        let mut visited = vec![nav.current];
        // Preorder walk using only cursor moves.
        'walk: loop {
            if nav.move_to_child() {
                visited.push(nav.current);
                continue;
            }
            loop {
                if nav.move_to_next() {
                    visited.push(nav.current);
                    break;
                }
                if !nav.move_to_parent() {
                    break 'walk;
                }
            }
        }
        assert_eq!(visited, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_failed_moves_leave_cursor_in_place() {
        let tree = create_test_tree();
        let mut nav = tree.navigator_at(15);
        assert!(!nav.move_to_child());
        assert!(!nav.move_to_next());
        assert_eq!(nav.current, 15);
        assert!(nav.move_to_previous());
        assert_eq!(nav.current, 1);
        assert!(!nav.move_to_previous());
        assert_eq!(nav.current, 1);

        nav.move_to_root();
        assert!(!nav.move_to_parent());
        assert_eq!(nav.node_type(), NodeType::Root);
    }

    #[test]
    fn test_value_concatenates_descendant_text() {
        let tree = create_test_tree();
        assert_eq!(tree.navigator_at(2).value(), "Rust2015");
        assert_eq!(tree.navigator().value(), "Rust2015Go2009Zig");
        assert_eq!(tree.navigator_at(4).value(), "Rust");
    }

    #[test]
    fn test_move_to_rejects_other_trees() {
        let tree = create_test_tree();
        let other = create_test_tree();
        let mut nav = tree.navigator();
        assert!(!nav.move_to(&other.navigator_at(3)));
        assert_eq!(nav.current, 0);
        assert!(nav.move_to(&tree.navigator_at(3)));
        assert_eq!(nav.local_name(), "title");
    }
}
