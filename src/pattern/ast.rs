//! Arena tree for compiled metre grammars.
//!
//! A grammar like `(us)*(uS)(U)?` compiles to a root group whose children are
//! `*[u s]`, `u`, `S`, `?[U]`. Unquantified groups never survive compilation;
//! their children are spliced into the enclosing group.

use std::hash::{Hash, Hasher};

/// Index of a node in a [`Grammar`] arena.
///
/// Arena order is scan order, so comparing ids compares pattern positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// Whether a syllable carries stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stress {
    /// `u` or `U`.
    Unstressed,
    /// `s` or `S`.
    Stressed,
}

/// How strictly a terminal must agree with the input symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strength {
    /// Uppercase in the grammar; the input symbol must be identical.
    Strong,
    /// Lowercase in the grammar; the input symbol may differ in case.
    Weak,
}

/// A literal stress symbol in a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Terminal {
    pub stress: Stress,
    pub strength: Strength,
}

impl Terminal {
    pub fn from_char(ch: char) -> Option<Self> {
        let (stress, strength) = match ch {
            'u' => (Stress::Unstressed, Strength::Weak),
            's' => (Stress::Stressed, Strength::Weak),
            'U' => (Stress::Unstressed, Strength::Strong),
            'S' => (Stress::Stressed, Strength::Strong),
            _ => return None,
        };
        Some(Self { stress, strength })
    }

    /// The grammar symbol this terminal was compiled from.
    pub fn symbol(self) -> char {
        match (self.stress, self.strength) {
            (Stress::Unstressed, Strength::Weak) => 'u',
            (Stress::Stressed, Strength::Weak) => 's',
            (Stress::Unstressed, Strength::Strong) => 'U',
            (Stress::Stressed, Strength::Strong) => 'S',
        }
    }

    pub fn is_strong(self) -> bool {
        self.strength == Strength::Strong
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// `*`: zero or more repetitions.
    Repeat,
    /// `?`: zero or one occurrence.
    Optional,
    /// `w`: relabels like `?` and matches like `?`.
    Wildcard,
}

impl Quantifier {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '*' => Some(Self::Repeat),
            '?' => Some(Self::Optional),
            'w' => Some(Self::Wildcard),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Repeat => '*',
            Self::Optional => '?',
            Self::Wildcard => 'w',
        }
    }
}

/// What a quantified node was before its quantifier was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    Leaf(Terminal),
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Terminal),
    /// The synthetic root. Other unquantified groups are spliced away.
    Group,
    Quantified { quantifier: Quantifier, base: Base },
}

/// One grammar node.
///
/// Nodes compare and hash by pattern position only; two nodes with the same
/// position are the same node.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Scan position in the pattern string. `None` only for the root.
    pub position: Option<usize>,
    pub(crate) parent: Option<NodeId>,
    /// Index of this node in its parent's children.
    pub(crate) slot: usize,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// The terminal matched by this node, for leaves and quantified leaves.
    pub fn terminal(&self) -> Option<Terminal> {
        match self.kind {
            NodeKind::Leaf(t) => Some(t),
            NodeKind::Quantified {
                base: Base::Leaf(t),
                ..
            } => Some(t),
            _ => None,
        }
    }

    /// True for an unquantified leaf only.
    pub fn is_plain_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn quantifier(&self) -> Option<Quantifier> {
        match self.kind {
            NodeKind::Quantified { quantifier, .. } => Some(quantifier),
            _ => None,
        }
    }

    pub fn is_repeat(&self) -> bool {
        self.quantifier() == Some(Quantifier::Repeat)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

/// A compiled grammar: an immutable arena rooted at [`Grammar::ROOT`].
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) nodes: Vec<Node>,
}

impl Grammar {
    pub const ROOT: NodeId = NodeId(0);

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.node(id).position
    }

    pub fn terminal(&self, id: NodeId) -> Option<Terminal> {
        self.node(id).terminal()
    }

    /// All node ids in scan order, root first.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Render the tree back into grammar syntax, with redundant groups
    /// already removed: `(u)(s)*` renders as `u(s)*`.
    pub fn to_pattern(&self) -> String {
        let mut out = String::new();
        for &child in self.node(Self::ROOT).children() {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        match node.kind {
            NodeKind::Leaf(t) => out.push(t.symbol()),
            NodeKind::Group => {
                for &child in node.children() {
                    self.write_node(child, out);
                }
            }
            NodeKind::Quantified { quantifier, base } => {
                match base {
                    Base::Leaf(t) => out.push(t.symbol()),
                    Base::Group => {
                        out.push('(');
                        for &child in node.children() {
                            self.write_node(child, out);
                        }
                        out.push(')');
                    }
                }
                out.push(quantifier.symbol());
            }
        }
    }
}
