//! Scansion of verse lines against metre grammars.
//!
//! A line is a string with one stress symbol per syllable. A metre is a small
//! grammar over the same symbols. The matcher finds the expansion of the
//! grammar closest to the line, tolerating a bounded number of errors.
//!
//! # Example
//!
//! ```rust
//! use scansion::PatternAnalyzer;
//!
//! let iambic = PatternAnalyzer::new("(us)*(uS)(U)?(U)?", 8).unwrap();
//! let outcome = iambic.accept("USUSUSUSU");
//!
//! assert_eq!(outcome.pattern, "usususuSU");
//! assert_eq!(outcome.errors(), (0, 0));
//! assert!(!outcome.truncated);
//! ```

mod analyzer;
pub mod metre;
pub mod pattern;

pub use analyzer::{PatternAnalyzer, count_errors};
pub use metre::{
    ClassificationResult, ClassifierConfig, CorrectionKind, METRES, MetreClassifier, MetreScore,
    MetreTemplate, StressCorrection,
};
pub use pattern::{DEFAULT_ERROR_BORDER, GrammarError, MatchOutcome};
