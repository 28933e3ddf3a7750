//! Metre grammar compiler and bounded-error matcher.
//!
//! A grammar describes the expected stress scheme of a verse line, one
//! symbol per syllable. Input lines use the same letters.
//!
//! # Grammar syntax
//!
//! | Token   | Meaning                                                  |
//! |---------|----------------------------------------------------------|
//! | `U`     | Unstressed syllable, strong: input must be exactly `U`   |
//! | `S`     | Stressed syllable, strong: input must be exactly `S`     |
//! | `u`     | Unstressed syllable, weak: input `u` or `U`              |
//! | `s`     | Stressed syllable, weak: input `s` or `S`                |
//! | `(…)`   | Grouping (removed unless quantified)                     |
//! | `X*`    | Zero or more                                             |
//! | `X?`    | Zero or one                                              |
//! | `Xw`    | Wildcard; currently matches like `?`                     |
//!
//! A strong mismatch counts as a strong error, a weak mismatch as a weak
//! error. A line matches when it reaches the last unquantified terminal at
//! the top level of the grammar.

pub mod ast;
pub mod matcher;
pub mod navigate;
pub mod parser;
pub mod symbol;

pub use ast::{Grammar, NodeId, Quantifier, Terminal};
pub use matcher::{DEFAULT_ERROR_BORDER, MatchOptions, MatchOutcome, find_best};
pub use parser::{GrammarError, parse};
