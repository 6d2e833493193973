//! Arena-backed generic syntax tree
//!
//! Every tree produced by a language front-end is stored as a flat node table.
//! Children are owned through their parent's child list; the parent link is an
//! index into the same table, so removing a subtree can never leave a dangling
//! reference behind. Removed slots are tombstoned rather than compacted, which
//! keeps every live [`NodeId`] stable for the lifetime of the tree.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::ops::{Index, IndexMut};

/// Identifier of a node inside one [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single node of a generic syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    /// Grammar type tag (e.g. `function_item`, `identifier`, `+`)
    pub kind: String,
    /// Literal token, present on leaves only
    pub token: Option<String>,
    /// Whether the grammar names this node (anonymous nodes are keywords and punctuation)
    pub named: bool,
    /// Field name under which the parent holds this node (e.g. `name`, `type`)
    pub field: Option<String>,
    /// First source line, 1-based
    pub start_line: usize,
    /// Last source line, 1-based
    pub end_line: usize,
    /// Declared type attached by type resolution
    pub resolved_type: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SyntaxNode {
    /// Create a detached node
    pub fn new(kind: impl Into<String>, named: bool) -> Self {
        Self {
            kind: kind.into(),
            token: None,
            named,
            field: None,
            start_line: 0,
            end_line: 0,
            resolved_type: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the literal token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the parent field name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the line span
    pub fn with_lines(mut self, start_line: usize, end_line: usize) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }

    /// Parent of this node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children of this node
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Generic syntax tree with exactly one root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    nodes: Vec<Option<SyntaxNode>>,
    root: NodeId,
}

impl SyntaxTree {
    /// Create a tree holding only `root`
    pub fn new(mut root: SyntaxNode) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    /// Root of the tree
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a live node
    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Look up a live node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SyntaxNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Append `node` as the last child of `parent`
    ///
    /// Returns `None` if `parent` is not a live node.
    pub fn add_child(&mut self, parent: NodeId, mut node: SyntaxNode) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(Some(node));
        self.get_mut(parent)?.children.push(id);
        Some(id)
    }

    /// Children of `id`, empty for removed nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(SyntaxNode::children).unwrap_or(&[])
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(SyntaxNode::parent)
    }

    /// Position of `id` among its siblings
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// First child of `id` held under `field`
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.get(*c).and_then(|n| n.field.as_deref()) == Some(field))
    }

    /// Replace the token of `id`
    pub fn set_token(&mut self, id: NodeId, token: impl Into<String>) {
        if let Some(node) = self.get_mut(id) {
            node.token = Some(token.into());
        }
    }

    /// Detach `id` from its parent and drop its whole subtree
    ///
    /// The root cannot be removed; returns whether anything was removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        for dead in self.pre_order_from(id) {
            self.nodes[dead.0] = None;
        }
        true
    }

    /// Drop every descendant of `id` and turn it into a leaf carrying `token`
    pub fn collapse_into_leaf(&mut self, id: NodeId, token: impl Into<String>) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child);
        }
        self.set_token(id, token);
    }

    /// Pre-order traversal from the root
    pub fn pre_order(&self) -> Vec<NodeId> {
        self.pre_order_from(self.root)
    }

    /// Pre-order traversal of the subtree rooted at `from`
    pub fn pre_order_from(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.contains(from) {
            return order;
        }
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Leaves of the subtree rooted at `from`, left to right
    pub fn leaves_from(&self, from: NodeId) -> Vec<NodeId> {
        self.pre_order_from(from)
            .into_iter()
            .filter(|id| self.children(*id).is_empty())
            .collect()
    }

    /// Leaves of the whole tree, left to right
    pub fn leaves(&self) -> Vec<NodeId> {
        self.leaves_from(self.root)
    }

    /// Number of nodes reachable from the root
    pub fn len(&self) -> usize {
        self.pre_order().len()
    }

    /// A tree always holds its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth of `id` below the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Source text of a subtree reconstructed from its leaf tokens
    ///
    /// Adjacent word tokens are separated by a single space; everything else is
    /// glued together, which is enough to render type expressions.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for leaf in self.leaves_from(id) {
            let Some(token) = self.get(leaf).and_then(|n| n.token.as_deref()) else {
                continue;
            };
            let needs_space = matches!(
                (out.chars().last(), token.chars().next()),
                (Some(a), Some(b)) if is_word_char(a) && is_word_char(b)
            );
            if needs_space {
                out.push(' ');
            }
            out.push_str(token);
        }
        out
    }

    /// Deep copy of the subtree rooted at `id` as an independent tree
    pub fn subtree(&self, id: NodeId) -> Option<SyntaxTree> {
        let root = self.get(id)?.clone();
        let mut copy = SyntaxTree::new(root);
        let mut stack = vec![(id, copy.root())];
        while let Some((source, target)) = stack.pop() {
            for child in self.children(source) {
                let Some(node) = self.get(*child) else {
                    continue;
                };
                let new_id = copy.add_child(target, node.clone())?;
                stack.push((*child, new_id));
            }
        }
        Some(copy)
    }

    /// Check the structural invariants of the tree
    ///
    /// Every reachable node is reached exactly once, every child points back at
    /// the node that lists it, and only the root lacks a parent.
    pub fn is_well_formed(&self) -> bool {
        let Some(root) = self.get(self.root) else {
            return false;
        };
        if root.parent.is_some() {
            return false;
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                return false;
            }
            for child in self.children(id) {
                match self.get(*child) {
                    Some(node) if node.parent == Some(id) => stack.push(*child),
                    _ => return false,
                }
            }
        }
        true
    }

    /// Indented dump of the tree, one node per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            let _ = write!(out, "{}{}", "  ".repeat(depth), node.kind);
            if let Some(token) = &node.token {
                let _ = write!(out, " : {token}");
            }
            if let Some(ty) = &node.resolved_type {
                let _ = write!(out, " [{ty}]");
            }
            out.push('\n');
            for child in self.children(id).iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Index<NodeId> for SyntaxTree {
    type Output = SyntaxNode;

    fn index(&self, id: NodeId) -> &SyntaxNode {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {} was removed from the tree", id.0),
        }
    }
}

impl IndexMut<NodeId> for SyntaxTree {
    fn index_mut(&mut self, id: NodeId) -> &mut SyntaxNode {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node {} was removed from the tree", id.0),
        }
    }
}
