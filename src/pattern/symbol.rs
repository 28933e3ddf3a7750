//! Scoring an input stress symbol against a grammar terminal.

use super::ast::{Strength, Terminal};

/// The cost of matching one input symbol against one terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cost {
    pub strong: usize,
    pub weak: usize,
}

impl Cost {
    pub fn total(self) -> usize {
        self.strong + self.weak
    }
}

/// Score `ch` against `terminal`.
///
/// A strong terminal must equal the input symbol exactly; a weak terminal only
/// up to case. A mismatch costs one error of the terminal's own strength.
pub fn cost(terminal: Terminal, ch: char) -> Cost {
    let symbol = terminal.symbol();
    match terminal.strength {
        Strength::Strong => Cost {
            strong: usize::from(symbol != ch),
            weak: 0,
        },
        Strength::Weak => Cost {
            strong: 0,
            weak: usize::from(!symbol.eq_ignore_ascii_case(&ch)),
        },
    }
}

/// True when `ch` marks a stressed syllable (`s` or `S`).
pub fn is_stressed(ch: char) -> bool {
    ch.eq_ignore_ascii_case(&'s')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(ch: char) -> Terminal {
        Terminal::from_char(ch).unwrap()
    }

    #[test]
    fn strong_terminal_is_case_sensitive() {
        assert_eq!(cost(t('S'), 'S'), Cost::default());
        assert_eq!(cost(t('S'), 's'), Cost { strong: 1, weak: 0 });
        assert_eq!(cost(t('U'), 'S'), Cost { strong: 1, weak: 0 });
    }

    #[test]
    fn weak_terminal_ignores_case() {
        assert_eq!(cost(t('s'), 'S'), Cost::default());
        assert_eq!(cost(t('s'), 's'), Cost::default());
        assert_eq!(cost(t('u'), 'S'), Cost { strong: 0, weak: 1 });
        assert_eq!(cost(t('u'), 's'), Cost { strong: 0, weak: 1 });
    }

    #[test]
    fn unknown_input_always_mismatches() {
        for terminal in ['u', 's', 'U', 'S'] {
            assert_eq!(cost(t(terminal), 'x').total(), 1, "terminal {terminal}");
        }
    }

    #[test]
    fn stressed_symbols() {
        assert!(is_stressed('s'));
        assert!(is_stressed('S'));
        assert!(!is_stressed('u'));
        assert!(!is_stressed('U'));
    }
}
