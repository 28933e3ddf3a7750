use crate::pattern::{
    DEFAULT_ERROR_BORDER, Grammar, GrammarError, MatchOptions, MatchOutcome, find_best, parse,
};

/// A compiled metre grammar together with its error border.
///
/// The grammar is immutable once built, so one analyzer can scan any number
/// of lines, from any number of threads.
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    pattern: String,
    grammar: Grammar,
    options: MatchOptions,
}

impl PatternAnalyzer {
    pub fn new(pattern: &str, error_border: usize) -> Result<Self, GrammarError> {
        Ok(Self {
            pattern: pattern.to_string(),
            grammar: parse(pattern)?,
            options: MatchOptions {
                error_border,
                trace: false,
            },
        })
    }

    /// Enable or disable per-symbol tracing on stderr.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.options.trace = trace;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn error_border(&self) -> usize {
        self.options.error_border
    }

    /// Scan one stress string.
    pub fn accept(&self, line: &str) -> MatchOutcome {
        find_best(&self.grammar, line, &self.options)
    }

    /// Compile `pattern`, scan `line` once and drop the grammar.
    pub fn count_errors(
        pattern: &str,
        line: &str,
        error_border: usize,
    ) -> Result<MatchOutcome, GrammarError> {
        Ok(Self::new(pattern, error_border)?.accept(line))
    }
}

impl std::str::FromStr for PatternAnalyzer {
    type Err = GrammarError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Self::new(pattern, DEFAULT_ERROR_BORDER)
    }
}

/// Shorthand for [`PatternAnalyzer::count_errors`].
pub fn count_errors(
    pattern: &str,
    line: &str,
    error_border: usize,
) -> Result<MatchOutcome, GrammarError> {
    PatternAnalyzer::count_errors(pattern, line, error_border)
}
