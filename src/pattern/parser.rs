//! Single-pass compiler from metre grammar strings to a [`Grammar`] arena.

use std::iter::Peekable;
use std::str::CharIndices;

use super::ast::*;

/// Errors that can occur while compiling a metre grammar.
///
/// Positions are character indices into the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    UnexpectedChar(usize, char),
    DanglingQuantifier(usize, char),
    UnmatchedClose(usize),
    UnclosedGroup(usize),
    EmptyGroup(usize),
    EmptyPattern,
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedChar(pos, c) => {
                write!(f, "Unexpected character {c:?} in grammar at {pos}")
            }
            Self::DanglingQuantifier(pos, c) => {
                write!(f, "Quantifier {c:?} at {pos} has nothing to quantify")
            }
            Self::UnmatchedClose(pos) => write!(f, "Unmatched ')' in grammar at {pos}"),
            Self::UnclosedGroup(pos) => write!(f, "Unclosed group '(' in grammar at {pos}"),
            Self::EmptyGroup(pos) => write!(f, "Empty group '()' in grammar at {pos}"),
            Self::EmptyPattern => write!(f, "Empty grammar"),
        }
    }
}

impl std::error::Error for GrammarError {}

/// Compile a grammar string such as `(us)*(uS)(U)?` into a [`Grammar`].
pub fn parse(pattern: &str) -> Result<Grammar, GrammarError> {
    let mut builder = Builder {
        chars: pattern.char_indices().peekable(),
        root: Vec::new(),
        open: Vec::new(),
    };
    let root = builder.build()?;
    Ok(flatten(root))
}

/// A node whose kind is final but which is not yet placed in the arena.
struct Draft {
    position: usize,
    kind: NodeKind,
    children: Vec<Draft>,
}

/// A group still waiting for its `)`.
struct Frame {
    position: usize,
    children: Vec<Draft>,
}

struct Builder<'a> {
    chars: Peekable<CharIndices<'a>>,
    root: Vec<Draft>,
    open: Vec<Frame>,
}

impl Builder<'_> {
    fn build(&mut self) -> Result<Vec<Draft>, GrammarError> {
        while let Some((pos, ch)) = self.chars.next() {
            match ch {
                '(' => self.open.push(Frame {
                    position: pos,
                    children: Vec::new(),
                }),
                ')' => self.close_group(pos)?,
                _ if Quantifier::from_char(ch).is_some() => {
                    return Err(GrammarError::DanglingQuantifier(pos, ch));
                }
                _ => {
                    let terminal =
                        Terminal::from_char(ch).ok_or(GrammarError::UnexpectedChar(pos, ch))?;
                    let kind = match self.take_quantifier() {
                        Some(quantifier) => NodeKind::Quantified {
                            quantifier,
                            base: Base::Leaf(terminal),
                        },
                        None => NodeKind::Leaf(terminal),
                    };
                    self.current().push(Draft {
                        position: pos,
                        kind,
                        children: Vec::new(),
                    });
                }
            }
        }

        if let Some(frame) = self.open.pop() {
            return Err(GrammarError::UnclosedGroup(frame.position));
        }
        if self.root.is_empty() {
            return Err(GrammarError::EmptyPattern);
        }
        Ok(std::mem::take(&mut self.root))
    }

    /// Close the innermost group. A quantified group stays a node of its own;
    /// any other group is spliced into its parent.
    fn close_group(&mut self, pos: usize) -> Result<(), GrammarError> {
        let frame = self.open.pop().ok_or(GrammarError::UnmatchedClose(pos))?;
        if frame.children.is_empty() {
            return Err(GrammarError::EmptyGroup(frame.position));
        }

        match self.take_quantifier() {
            Some(quantifier) => self.current().push(Draft {
                position: frame.position,
                kind: NodeKind::Quantified {
                    quantifier,
                    base: Base::Group,
                },
                children: frame.children,
            }),
            None => self.current().extend(frame.children),
        }
        Ok(())
    }

    /// Consume a run of quantifier suffixes. The last one wins, so `(us)*?`
    /// is an optional group.
    fn take_quantifier(&mut self) -> Option<Quantifier> {
        let mut quantifier = None;
        while let Some(q) = self.chars.peek().and_then(|&(_, ch)| Quantifier::from_char(ch)) {
            self.chars.next();
            quantifier = Some(q);
        }
        quantifier
    }

    /// Children of the innermost open group, or of the root.
    fn current(&mut self) -> &mut Vec<Draft> {
        match self.open.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }
}

/// Lay the drafts out in pre-order, which is also scan order.
fn flatten(children: Vec<Draft>) -> Grammar {
    let mut grammar = Grammar {
        nodes: vec![Node {
            kind: NodeKind::Group,
            position: None,
            parent: None,
            slot: 0,
            children: Vec::new(),
        }],
    };
    for (slot, draft) in children.into_iter().enumerate() {
        place(&mut grammar, draft, Grammar::ROOT, slot);
    }
    grammar
}

fn place(grammar: &mut Grammar, draft: Draft, parent: NodeId, slot: usize) {
    let id = NodeId(grammar.nodes.len());
    grammar.nodes.push(Node {
        kind: draft.kind,
        position: Some(draft.position),
        parent: Some(parent),
        slot,
        children: Vec::new(),
    });
    grammar.nodes[parent.0].children.push(id);
    for (slot, child) in draft.children.into_iter().enumerate() {
        place(grammar, child, id, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(s: &str) -> Grammar {
        parse(s).expect("parse should succeed")
    }
    fn parse_err(s: &str) -> GrammarError {
        parse(s).expect_err("parse should fail")
    }

    fn root_kinds(g: &Grammar) -> Vec<NodeKind> {
        g.node(Grammar::ROOT)
            .children()
            .iter()
            .map(|&id| g.node(id).kind)
            .collect()
    }

    fn leaf(ch: char) -> NodeKind {
        NodeKind::Leaf(Terminal::from_char(ch).unwrap())
    }

    // --- Literals ---

    #[test]
    fn test_flat_sequence() {
        let g = parse_ok("uSUs");
        assert_eq!(
            root_kinds(&g),
            vec![leaf('u'), leaf('S'), leaf('U'), leaf('s')]
        );
        let positions: Vec<_> = g.ids().map(|id| g.position(id)).collect();
        assert_eq!(positions, vec![None, Some(0), Some(1), Some(2), Some(3)]);
    }

    // --- Group normalization ---

    #[test]
    fn test_redundant_group_is_spliced() {
        let g = parse_ok("(uS)(U)?");
        let kinds = root_kinds(&g);
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[0], leaf('u'));
        assert_eq!(kinds[1], leaf('S'));
        assert!(matches!(
            kinds[2],
            NodeKind::Quantified {
                quantifier: Quantifier::Optional,
                base: Base::Group
            }
        ));
    }

    #[test]
    fn test_trailing_group_is_spliced() {
        let g = parse_ok("u(uS)");
        assert_eq!(root_kinds(&g), vec![leaf('u'), leaf('u'), leaf('S')]);
    }

    #[test]
    fn test_nested_groups() {
        let g = parse_ok("((su)(u)?)*");
        let root = g.node(Grammar::ROOT);
        assert_eq!(root.children().len(), 1);
        let outer = g.node(root.children()[0]);
        assert!(outer.is_repeat());
        assert_eq!(outer.position, Some(0));
        let inner: Vec<_> = outer.children().iter().map(|&id| g.node(id).kind).collect();
        assert_eq!(inner.len(), 3);
        assert_eq!(inner[0], leaf('s'));
        assert_eq!(inner[1], leaf('u'));
        assert!(matches!(
            inner[2],
            NodeKind::Quantified {
                quantifier: Quantifier::Optional,
                base: Base::Group
            }
        ));
    }

    #[test]
    fn test_spliced_children_are_reparented() {
        let g = parse_ok("((su)u)*");
        let group = g.node(Grammar::ROOT).children()[0];
        for (slot, &child) in g.node(group).children().iter().enumerate() {
            assert_eq!(g.node(child).parent(), Some(group));
            assert_eq!(g.node(child).slot, slot);
        }
    }

    // --- Quantifiers ---

    #[test]
    fn test_quantifier_keeps_position() {
        let g = parse_ok("u(su)*");
        let group = g.node(Grammar::ROOT).children()[1];
        assert_eq!(g.position(group), Some(1));
        assert!(g.node(group).is_repeat());
        assert_eq!(g.node(group).children().len(), 2);
    }

    #[test]
    fn test_quantified_leaf() {
        let g = parse_ok("uS?");
        let id = g.node(Grammar::ROOT).children()[1];
        let node = g.node(id);
        assert_eq!(node.quantifier(), Some(Quantifier::Optional));
        assert_eq!(node.terminal().map(Terminal::symbol), Some('S'));
        assert!(node.children().is_empty());
        assert!(!node.is_plain_leaf());
    }

    #[test]
    fn test_wildcard_relabels() {
        let g = parse_ok("(us)w");
        let id = g.node(Grammar::ROOT).children()[0];
        assert_eq!(g.node(id).quantifier(), Some(Quantifier::Wildcard));
    }

    #[test]
    fn test_to_pattern_drops_redundant_groups() {
        assert_eq!(parse_ok("(u)(s)*((uS))").to_pattern(), "u(s)*uS");
        assert_eq!(
            parse_ok("(u)?(u)?((su)(u)?)*(S)(U)?(U)?").to_pattern(),
            "(u)?(u)?(su(u)?)*S(U)?(U)?"
        );
    }

    // --- Errors ---

    #[test]
    fn test_leading_quantifier() {
        assert_eq!(parse_err("*u"), GrammarError::DanglingQuantifier(0, '*'));
    }

    #[test]
    fn test_quantifier_after_open() {
        assert_eq!(parse_err("(?u)"), GrammarError::DanglingQuantifier(1, '?'));
    }

    #[test]
    fn test_last_quantifier_wins() {
        let g = parse_ok("(us)*?S");
        let group = g.node(Grammar::ROOT).children()[0];
        assert_eq!(g.node(group).quantifier(), Some(Quantifier::Optional));
        assert_eq!(g.position(group), Some(0));
        assert_eq!(g.node(group).children().len(), 2);
        assert_eq!(g.position(g.node(Grammar::ROOT).children()[1]), Some(6));

        let g = parse_ok("u?*");
        let id = g.node(Grammar::ROOT).children()[0];
        assert_eq!(g.node(id).quantifier(), Some(Quantifier::Repeat));
        assert_eq!(g.to_pattern(), "u*");
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(parse_err("us)"), GrammarError::UnmatchedClose(2));
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(parse_err("u(s(u)"), GrammarError::UnclosedGroup(1));
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(parse_err("u()*"), GrammarError::EmptyGroup(1));
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(parse_err(""), GrammarError::EmptyPattern);
    }

    #[test]
    fn test_unexpected_char() {
        assert_eq!(parse_err("u x"), GrammarError::UnexpectedChar(1, ' '));
    }
}
