//! Read-only traversal of a compiled [`Grammar`].
//!
//! The matcher never builds an automaton. Instead it asks the tree two
//! questions for every live state: which leaf comes next when one input
//! symbol is consumed ([`Grammar::next_leaf`]), and which leaves are
//! interchangeable with that one because optional or repeated constructs can
//! be skipped ([`Grammar::variant_set`]).

use std::collections::HashSet;

use super::ast::{Grammar, NodeId};

impl Grammar {
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Descend through first children until reaching a node without any.
    ///
    /// Compiled grammars have no empty groups, so the result always carries
    /// a terminal.
    pub fn leftmost_leaf(&self, id: NodeId) -> NodeId {
        let mut node = id;
        while let Some(&first) = self.node(node).children.first() {
            node = first;
        }
        node
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        let parent = self.node(node.parent?);
        parent.children.get(node.slot + 1).copied()
    }

    /// The last plain leaf among the direct children of `id`.
    ///
    /// For the root this is the mandatory final terminal of the grammar: a
    /// complete match must have reached it.
    pub fn last_leaf_under(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .rev()
            .copied()
            .find(|&child| self.node(child).is_plain_leaf())
    }

    /// True if `id` is the first plain leaf among its siblings.
    pub fn is_first_leaf(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if !node.is_plain_leaf() {
            return false;
        }
        let Some(parent) = node.parent else {
            return false;
        };
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).is_plain_leaf())
            == Some(id)
    }

    /// A variable node lets the matcher skip past the construct enclosing it.
    pub fn is_variable(&self, id: NodeId) -> bool {
        self.is_first_leaf(id) || !self.node(id).is_plain_leaf()
    }

    /// The leaf that follows `id` once it has consumed an input symbol.
    ///
    /// Returns `None` when the grammar is exhausted along this path.
    pub fn next_leaf(&self, id: NodeId) -> Option<NodeId> {
        if self.node(id).is_repeat() && self.node(id).children.is_empty() {
            return Some(id);
        }
        let mut node = id;
        while let Some(parent) = self.parent(node) {
            if let Some(sibling) = self.next_sibling(node) {
                return Some(self.leftmost_leaf(sibling));
            }
            if self.node(parent).is_repeat() {
                return Some(self.leftmost_leaf(parent));
            }
            node = parent;
        }
        None
    }

    /// The next leaf that may stand in for `id` at the same input position.
    ///
    /// Walks up from the construct enclosing `id` (its parent, or `id` itself
    /// for a quantified leaf). A variable node may skip to the leftmost leaf
    /// after that construct; the last child of a repeat may restart it.
    pub fn next_variant(&self, id: NodeId) -> Option<NodeId> {
        let quantified_leaf = {
            let node = self.node(id);
            node.children.is_empty() && node.quantifier().is_some()
        };
        let mut node = id;
        let mut scope = if quantified_leaf { id } else { self.parent(id)? };
        loop {
            let outer = self.parent(scope)?;
            let variable = self.is_variable(node);
            if variable && let Some(uncle) = self.next_sibling(scope) {
                return Some(self.leftmost_leaf(uncle));
            }
            let outer_node = self.node(outer);
            if outer_node.is_repeat() && outer_node.children.last() == Some(&scope) {
                return Some(self.leftmost_leaf(outer));
            }
            if !variable {
                return None;
            }
            node = scope;
            scope = outer;
        }
    }

    /// All leaves admissible at the input position where `id` is, without
    /// consuming it: `id` itself followed by its chain of variants.
    ///
    /// Leaves are returned in discovery order and deduplicated by pattern
    /// position. The walk stops at the first leaf seen twice.
    pub fn variant_set(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut variants = Vec::new();
        let mut current = Some(id);
        while let Some(leaf) = current {
            if !seen.insert(self.position(leaf)) {
                break;
            }
            variants.push(leaf);
            current = self.next_variant(leaf);
        }
        variants
    }
}
