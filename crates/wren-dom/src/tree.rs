//! Arena-based element tree.

use crate::element::ElementData;
use crate::selector::Selector;

/// A type-safe index into the element tree.
///
/// `NodeId` provides O(1) access to any node in the tree without
/// borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// One node in the tree: its payload plus parent/child relationships.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node payload.
    pub node_type: NodeType,
    /// The parent node, if attached.
    pub parent: Option<NodeId>,
    /// Child nodes, in document order.
    pub children: Vec<NodeId>,
}

/// Node payload.
///
/// The binding engine deals in elements only; text content lives on
/// [`ElementData::text`] rather than as separate text nodes.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document root; owns the top-level widget elements.
    Document,
    /// An element node.
    Element(ElementData),
}

/// Arena-based element tree with O(1) node access.
///
/// All nodes live in a contiguous vector, with [`NodeId`] indices for all
/// relationships. Detached nodes stay allocated; the tree is a per-page
/// arena whose lifetime matches the host page, so unreferenced nodes are
/// simply never visited again.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the document node.
    pub fn new() -> Self {
        DomTree {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root document node id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Allocate a detached element node and return its id.
    pub fn create_element(&mut self, tag_name: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Allocate a detached node and return its id.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// If the child is currently attached elsewhere it is detached first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach a node from its parent, leaving it allocated.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Replace `old` with `new` in `old`'s parent, detaching `old`.
    ///
    /// If `old` is detached this only ensures `new` is detached too.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        self.detach(new);
        if let Some(parent) = self.nodes[old.0].parent.take() {
            for slot in &mut self.nodes[parent.0].children {
                if *slot == old {
                    *slot = new;
                }
            }
            self.nodes[new.0].parent = Some(parent);
        }
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get element data if this node is an element.
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Document => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Document => None,
        })
    }

    /// Iterate the descendants of `scope` in depth-first document order,
    /// excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        stack.extend(self.children(scope).iter().rev().copied());
        Descendants { tree: self, stack }
    }

    /// Find the first descendant of `scope` matching the selector.
    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&id| selector.matches(self, id, scope))
    }

    /// Find every descendant of `scope` matching the selector.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&id| selector.matches(self, id, scope))
            .collect()
    }

    /// Find the first descendant of `scope` with the given element id.
    pub fn element_by_id(&self, scope: NodeId, element_id: &str) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&id| self.as_element(id).and_then(ElementData::id) == Some(element_id))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over the descendants of a node.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut dom = DomTree::new();
        let root = dom.create_element("div");
        let a = dom.create_element("span");
        let b = dom.create_element("span");
        dom.append_child(NodeId::ROOT, root);
        dom.append_child(root, a);
        dom.append_child(root, b);
        (dom, root, a, b)
    }

    #[test]
    fn append_sets_relationships() {
        let (dom, root, a, b) = sample_tree();
        assert_eq!(dom.children(root), &[a, b]);
        assert_eq!(dom.parent(a), Some(root));
    }

    #[test]
    fn detach_and_replace() {
        let (mut dom, root, a, b) = sample_tree();
        dom.detach(a);
        assert_eq!(dom.children(root), &[b]);
        assert_eq!(dom.parent(a), None);

        let c = dom.create_element("em");
        dom.replace(b, c);
        assert_eq!(dom.children(root), &[c]);
        assert_eq!(dom.parent(c), Some(root));
        assert_eq!(dom.parent(b), None);
    }

    #[test]
    fn descendants_are_depth_first() {
        let (mut dom, root, a, _b) = sample_tree();
        let nested = dom.create_element("em");
        dom.append_child(a, nested);
        let order: Vec<NodeId> = dom.descendants(root).collect();
        assert_eq!(order[0], a);
        assert_eq!(order[1], nested);
    }
}
