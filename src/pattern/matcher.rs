//! Bounded-error matcher: scan a stress string against a compiled [`Grammar`].
//!
//! The matcher keeps a generation of partial matches and advances all of them
//! one input symbol at a time. Each partial match offers the leaves returned
//! by [`Grammar::variant_set`] for its successor; every leaf becomes a new
//! partial match, scored against the input symbol. Paths whose error total
//! exceeds the error border are dropped.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::ast::{Grammar, NodeId};
use super::symbol::cost;

/// Error border used when the caller does not choose one.
pub const DEFAULT_ERROR_BORDER: usize = 8;

/// Knobs for a single matching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Maximum strong + weak errors a partial match may accumulate.
    pub error_border: usize,
    /// Write one `[TRACE]` line per input symbol to stderr.
    pub trace: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            error_border: DEFAULT_ERROR_BORDER,
            trace: false,
        }
    }
}

/// The best match of a stress string against a grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MatchOutcome {
    /// Grammar terminals chosen along the best path, one per consumed symbol.
    /// Empty when no path reached the end of the grammar.
    pub pattern: String,
    pub strong_errors: usize,
    pub weak_errors: usize,
    /// The input outlived every partial match; each unconsumed symbol was
    /// charged one strong and one weak error.
    pub truncated: bool,
}

impl MatchOutcome {
    /// The (strong, weak) pair callers rank outcomes by.
    pub fn errors(&self) -> (usize, usize) {
        (self.strong_errors, self.weak_errors)
    }

    pub fn total_errors(&self) -> usize {
        self.strong_errors + self.weak_errors
    }
}

/// One partial match. `node` is `None` only before the first symbol.
#[derive(Debug, Clone)]
struct State {
    node: Option<NodeId>,
    strong_errors: usize,
    weak_errors: usize,
    pattern: String,
}

impl State {
    fn start() -> Self {
        Self {
            node: None,
            strong_errors: 0,
            weak_errors: 0,
            pattern: String::new(),
        }
    }

    fn rank(&self) -> (usize, usize, &str) {
        (self.strong_errors, self.weak_errors, &self.pattern)
    }
}

/// Match `line` against `grammar` and return the best-scoring path.
pub fn find_best(grammar: &Grammar, line: &str, options: &MatchOptions) -> MatchOutcome {
    let symbols: Vec<char> = line.chars().collect();
    let mut states = vec![State::start()];

    for (i, &ch) in symbols.iter().enumerate() {
        let next = advance(grammar, &states, ch, options.error_border);
        if options.trace {
            eprintln!(
                "[TRACE] symbol {i} {ch:?}: {} -> {} states",
                states.len(),
                next.len()
            );
        }

        if next.is_empty() {
            let leftover = symbols.len() - i;
            let best = best_complete(grammar, states);
            return MatchOutcome {
                pattern: best.pattern,
                strong_errors: best.strong_errors + leftover,
                weak_errors: best.weak_errors + leftover,
                truncated: true,
            };
        }
        states = next;
    }

    let best = best_complete(grammar, states);
    MatchOutcome {
        pattern: best.pattern,
        strong_errors: best.strong_errors,
        weak_errors: best.weak_errors,
        truncated: false,
    }
}

/// Consume `ch` from every state and return the surviving successors.
///
/// Successors on the same leaf with the same error counts have the same
/// future, so only the one with the smallest pattern is kept.
fn advance(grammar: &Grammar, states: &[State], ch: char, error_border: usize) -> Vec<State> {
    let mut next: BTreeMap<(NodeId, usize, usize), String> = BTreeMap::new();

    for state in states {
        let successor = match state.node {
            None => Some(grammar.leftmost_leaf(Grammar::ROOT)),
            Some(node) => grammar.next_leaf(node),
        };
        let Some(successor) = successor else {
            continue;
        };

        for leaf in grammar.variant_set(successor) {
            let Some(terminal) = grammar.terminal(leaf) else {
                continue;
            };
            let step = cost(terminal, ch);
            let strong = state.strong_errors + step.strong;
            let weak = state.weak_errors + step.weak;
            if strong + weak > error_border {
                continue;
            }

            let mut pattern = String::with_capacity(state.pattern.len() + 1);
            pattern.push_str(&state.pattern);
            pattern.push(terminal.symbol());
            match next.entry((leaf, strong, weak)) {
                Entry::Vacant(slot) => {
                    slot.insert(pattern);
                }
                Entry::Occupied(mut slot) => {
                    if pattern < *slot.get() {
                        slot.insert(pattern);
                    }
                }
            }
        }
    }

    next.into_iter()
        .map(|((node, strong_errors, weak_errors), pattern)| State {
            node: Some(node),
            strong_errors,
            weak_errors,
            pattern,
        })
        .collect()
}

/// The lowest-ranked state that reached the grammar's mandatory final
/// terminal, or an empty zero-error state if none did.
fn best_complete(grammar: &Grammar, states: Vec<State>) -> State {
    let last = grammar
        .last_leaf_under(Grammar::ROOT)
        .and_then(|id| grammar.position(id));

    states
        .into_iter()
        .filter(|state| match last {
            None => true,
            Some(last) => state
                .node
                .and_then(|node| grammar.position(node))
                .is_some_and(|pos| pos >= last),
        })
        .min_by(|a, b| a.rank().cmp(&b.rank()))
        .unwrap_or_else(State::start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parser::parse;

    fn scan(pattern: &str, line: &str) -> (String, usize, usize, bool) {
        scan_with(pattern, line, DEFAULT_ERROR_BORDER)
    }

    fn scan_with(pattern: &str, line: &str, error_border: usize) -> (String, usize, usize, bool) {
        let grammar = parse(pattern).unwrap();
        let options = MatchOptions {
            error_border,
            trace: false,
        };
        let m = find_best(&grammar, line, &options);
        (m.pattern, m.strong_errors, m.weak_errors, m.truncated)
    }

    fn ok(pattern: &str, strong: usize, weak: usize) -> (String, usize, usize, bool) {
        (pattern.to_string(), strong, weak, false)
    }

    // --- Exact expansions ---

    #[test]
    fn literal_sequence_matches_itself() {
        assert_eq!(scan("uSuS", "uSuS"), ok("uSuS", 0, 0));
    }

    #[test]
    fn repeat_consumes_two_cycles() {
        assert_eq!(scan("(US)*", "USUS"), ok("USUS", 0, 0));
    }

    #[test]
    fn iambic_line() {
        assert_eq!(scan("(us)*(uS)(U)?(U)?", "uSuS"), ok("usuS", 0, 0));
    }

    #[test]
    fn trochaic_line_with_feminine_ending() {
        assert_eq!(scan("(su)*(S)(U)?(U)?", "SUSUSU"), ok("susuSU", 0, 0));
    }

    // --- Error accounting ---

    #[test]
    fn strong_mismatch_is_case_sensitive() {
        assert_eq!(scan("Us", "us"), ok("Us", 1, 0));
        assert_eq!(scan("US", "us"), ok("US", 2, 0));
    }

    #[test]
    fn weak_mismatch_ignores_case() {
        assert_eq!(scan("us", "US"), ok("us", 0, 0));
        assert_eq!(scan("us", "SU"), ok("us", 0, 2));
    }

    #[test]
    fn ties_prefer_smallest_pattern() {
        // Both "sS" and "uS" cost one weak error.
        assert_eq!(scan("(s)?(u)?S", "xS"), ok("sS", 0, 1));
    }

    #[test]
    fn wildcard_matches_like_optional() {
        let pairs = [
            ("(us)wS", "(us)?S"),
            ("u(su)wS(U)w", "u(su)?S(U)?"),
            ("uSw", "uS?"),
            ("uSwU", "uS?U"),
        ];
        let lines = ["", "S", "u", "uS", "usS", "uSU", "USUSU", "uU"];
        for (wildcard, optional) in pairs {
            for line in lines {
                assert_eq!(scan(wildcard, line), scan(optional, line), "{wildcard} on {line:?}");
            }
        }
        assert_eq!(scan("(us)wS", "S"), ok("S", 0, 0));
        assert_eq!(scan("(us)wS", "usS"), ok("usS", 0, 0));
    }

    #[test]
    fn stacked_quantifiers_use_the_last() {
        assert_eq!(scan("(us)*?S", "ususS"), scan("(us)?S", "ususS"));
        assert_eq!(scan("(us)*?S", "usS"), ok("usS", 0, 0));
    }

    // --- Incomplete and truncated matches ---

    #[test]
    fn input_longer_than_grammar_is_truncated() {
        assert_eq!(scan("U", "US"), ("U".to_string(), 1, 1, true));
        assert_eq!(scan("uS", "USUU"), ("uS".to_string(), 2, 2, true));
    }

    #[test]
    fn input_shorter_than_grammar_has_no_match() {
        assert_eq!(scan("US", "U"), ok("", 0, 0));
    }

    #[test]
    fn empty_input_has_no_match() {
        assert_eq!(scan("(us)*(uS)", ""), ok("", 0, 0));
    }

    #[test]
    fn error_border_prunes_paths() {
        assert_eq!(scan_with("US", "SU", 8), ok("US", 2, 0));
        // The only path is cut at the second symbol; the first never reached S.
        assert_eq!(scan_with("US", "SU", 1), ("".to_string(), 1, 1, true));
    }

    #[test]
    fn zero_border_requires_exact_match() {
        assert_eq!(scan_with("(us)*(uS)", "uSuS", 0), ok("usuS", 0, 0));
        assert_eq!(scan_with("uS", "SS", 0), ("".to_string(), 2, 2, true));
    }

    #[test]
    fn repeat_without_mandatory_leaf_accepts_partial_cycle() {
        assert_eq!(scan("(US)*", "USU"), ok("USU", 0, 0));
    }

    // --- Outcome helpers ---

    #[test]
    fn outcome_errors() {
        let m = MatchOutcome {
            pattern: "uS".to_string(),
            strong_errors: 2,
            weak_errors: 3,
            truncated: false,
        };
        assert_eq!(m.errors(), (2, 3));
        assert_eq!(m.total_errors(), 5);
    }
}
