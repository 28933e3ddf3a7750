//! Metre classification of whole poems.
//!
//! Every line of a poem is scanned against every template in a catalogue.
//! The template with the fewest accumulated (strong, weak) errors names the
//! metre, and its strong-position disagreements become stress corrections.

use itertools::Itertools;
use phf::{OrderedMap, phf_ordered_map};

use crate::analyzer::PatternAnalyzer;
use crate::pattern::symbol::is_stressed;
use crate::pattern::{GrammarError, MatchOutcome};

/// A named metre's grammar and the error border it is scanned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetreTemplate {
    pub pattern: &'static str,
    pub error_border: usize,
}

/// Built-in metre catalogue. Order matters: it breaks ties between metres.
pub static METRES: OrderedMap<&'static str, MetreTemplate> = phf_ordered_map! {
    "iambos" => MetreTemplate { pattern: "(us)*(uS)(U)?(U)?", error_border: 7 },
    "choreios" => MetreTemplate { pattern: "(su)*(S)(U)?(U)?", error_border: 7 },
    "daktylos" => MetreTemplate { pattern: "(suu)*(S)(U)?(U)?", error_border: 7 },
    "amphibrachys" => MetreTemplate { pattern: "(usu)*(uS)(U)?(U)?", error_border: 7 },
    "anapaistos" => MetreTemplate { pattern: "(uus)*(uuS)(U)?(U)?", error_border: 7 },
    "dolnik3" => MetreTemplate { pattern: "(u)?(u)?((su)(u)?)*(S)(U)?(U)?", error_border: 3 },
    "dolnik2" => MetreTemplate { pattern: "(u)?(u)?((s)(u)?)*(S)(U)?(U)?", error_border: 3 },
    "taktovik3" => MetreTemplate { pattern: "(u)?(u)?((su)(u)?(u)?)*(S)(U)?(U)?", error_border: 2 },
    "taktovik2" => MetreTemplate { pattern: "(u)?(u)?((s)(u)?(u)?)*(S)(U)?(U)?", error_border: 2 },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Longer lines are left out of the classification.
    pub max_line_syllables: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_line_syllables: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrectionKind {
    /// The metre puts a strong stress on an unstressed syllable.
    AddStress,
    /// The metre puts a strong non-stress on a stressed syllable.
    RemoveStress,
}

/// A proposed change to one syllable of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StressCorrection {
    pub line: usize,
    pub syllable: usize,
    pub kind: CorrectionKind,
}

/// How one line fared against one metre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScan {
    pub outcome: MatchOutcome,
    /// Errors charged to the metre. Equal to the outcome's errors unless
    /// the line could not be matched at all.
    pub strong_errors: usize,
    pub weak_errors: usize,
}

/// How a whole poem fared against one metre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetreScore {
    pub metre: &'static str,
    pub strong_errors: usize,
    pub weak_errors: usize,
    /// One entry per input line; `None` for skipped lines.
    pub lines: Vec<Option<LineScan>>,
    pub corrections: Vec<StressCorrection>,
}

impl MetreScore {
    pub fn errors(&self) -> (usize, usize) {
        (self.strong_errors, self.weak_errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Name of the best-fitting metre.
    pub metre: &'static str,
    /// Scores for every metre, in catalogue order.
    pub scores: Vec<MetreScore>,
}

impl ClassificationResult {
    pub fn score(&self, metre: &str) -> Option<&MetreScore> {
        self.scores.iter().find(|score| score.metre == metre)
    }

    pub fn best(&self) -> Option<&MetreScore> {
        self.score(self.metre)
    }
}

/// Scores poems against a catalogue of compiled metre templates.
#[derive(Debug, Clone)]
pub struct MetreClassifier {
    config: ClassifierConfig,
    analyzers: Vec<(&'static str, PatternAnalyzer)>,
}

impl MetreClassifier {
    /// A classifier over the built-in [`METRES`] catalogue.
    pub fn new(config: ClassifierConfig) -> Result<Self, GrammarError> {
        Self::with_templates(config, METRES.entries().map(|(&name, &t)| (name, t)))
    }

    /// A classifier over a custom catalogue, kept in iteration order.
    pub fn with_templates(
        config: ClassifierConfig,
        templates: impl IntoIterator<Item = (&'static str, MetreTemplate)>,
    ) -> Result<Self, GrammarError> {
        let analyzers = templates
            .into_iter()
            .map(|(name, template)| {
                Ok((
                    name,
                    PatternAnalyzer::new(template.pattern, template.error_border)?,
                ))
            })
            .collect::<Result<Vec<_>, GrammarError>>()?;
        Ok(Self { config, analyzers })
    }

    pub fn metres(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.analyzers.iter().map(|(name, _)| *name)
    }

    /// Score `lines` (one stress string per line) against every metre.
    pub fn classify<S: AsRef<str>>(&self, lines: &[S]) -> ClassificationResult {
        let scores: Vec<MetreScore> = self
            .analyzers
            .iter()
            .map(|(name, analyzer)| self.score_metre(name, analyzer, lines))
            .collect();
        let metre = scores
            .iter()
            .position_min_by_key(|score| score.errors())
            .map_or("", |best| scores[best].metre);
        ClassificationResult { metre, scores }
    }

    /// Classify `lines` and apply the winning metre's corrections to them.
    pub fn improve<S: AsRef<str>>(&self, lines: &[S]) -> (Vec<String>, ClassificationResult) {
        let result = self.classify(lines);
        let mut improved: Vec<Vec<char>> = lines
            .iter()
            .map(|line| line.as_ref().chars().collect())
            .collect();
        if let Some(best) = result.best() {
            for correction in &best.corrections {
                if let Some(ch) = improved
                    .get_mut(correction.line)
                    .and_then(|line| line.get_mut(correction.syllable))
                {
                    *ch = match correction.kind {
                        CorrectionKind::AddStress => 'S',
                        CorrectionKind::RemoveStress => 'U',
                    };
                }
            }
        }
        let improved = improved.into_iter().map(String::from_iter).collect();
        (improved, result)
    }

    fn score_metre<S: AsRef<str>>(
        &self,
        metre: &'static str,
        analyzer: &PatternAnalyzer,
        lines: &[S],
    ) -> MetreScore {
        let mut score = MetreScore {
            metre,
            strong_errors: 0,
            weak_errors: 0,
            lines: Vec::with_capacity(lines.len()),
            corrections: Vec::new(),
        };
        for (index, line) in lines.iter().enumerate() {
            let scan = self.scan_line(analyzer, index, line.as_ref(), &mut score.corrections);
            if let Some(scan) = &scan {
                score.strong_errors += scan.strong_errors;
                score.weak_errors += scan.weak_errors;
            }
            score.lines.push(scan);
        }
        score
    }

    fn scan_line(
        &self,
        analyzer: &PatternAnalyzer,
        index: usize,
        line: &str,
        corrections: &mut Vec<StressCorrection>,
    ) -> Option<LineScan> {
        let syllables = line.chars().count();
        if syllables == 0 || syllables > self.config.max_line_syllables {
            return None;
        }

        let outcome = analyzer.accept(line);
        if outcome.truncated || outcome.pattern.is_empty() {
            return Some(LineScan {
                outcome,
                strong_errors: syllables,
                weak_errors: syllables,
            });
        }

        corrections.extend(corrections_for(index, &outcome.pattern, line));
        Some(LineScan {
            strong_errors: outcome.strong_errors,
            weak_errors: outcome.weak_errors,
            outcome,
        })
    }
}

/// Strong positions of `pattern` whose stress disagrees with `line`.
pub fn corrections_for<'a>(
    line_index: usize,
    pattern: &'a str,
    line: &'a str,
) -> impl Iterator<Item = StressCorrection> + 'a {
    pattern
        .chars()
        .zip(line.chars())
        .enumerate()
        .filter_map(move |(syllable, (expected, actual))| {
            let kind = match expected {
                'S' if !is_stressed(actual) => CorrectionKind::AddStress,
                'U' if is_stressed(actual) => CorrectionKind::RemoveStress,
                _ => return None,
            };
            Some(StressCorrection {
                line: line_index,
                syllable,
                kind,
            })
        })
}
