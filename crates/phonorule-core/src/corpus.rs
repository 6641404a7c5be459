// Observed word paradigms: one literal surface form per tense per example,
// optionally with an explicit lemma. Read once before constraint assembly.

use crate::phoneme::Phoneme;

/// Malformed corpus, rejected before any solving starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus has no examples")]
    NoExamples,

    #[error("corpus declares zero tenses")]
    NoTenses,

    #[error("example {example} has {got} forms, expected {expected}")]
    FormCountMismatch {
        example: usize,
        got: usize,
        expected: usize,
    },
}

/// One example paradigm: an optional lemma literal and one observed surface
/// form per tense. A missing lemma is left latent for the search to solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub lemma: Option<Vec<Phoneme>>,
    pub forms: Vec<Vec<Phoneme>>,
}

/// The full observation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    pub tenses: usize,
    pub examples: Vec<Example>,
}

impl Corpus {
    /// Build a corpus, inferring the tense count from the first example.
    pub fn new(examples: Vec<Example>) -> Result<Self, CorpusError> {
        let tenses = examples.first().map(|e| e.forms.len()).unwrap_or(0);
        Corpus { tenses, examples }.validated()
    }

    /// Check shape invariants: at least one example, at least one tense,
    /// every example with exactly `tenses` forms.
    pub fn validated(self) -> Result<Self, CorpusError> {
        if self.examples.is_empty() {
            return Err(CorpusError::NoExamples);
        }
        if self.tenses == 0 {
            return Err(CorpusError::NoTenses);
        }
        for (i, example) in self.examples.iter().enumerate() {
            if example.forms.len() != self.tenses {
                return Err(CorpusError::FormCountMismatch {
                    example: i,
                    got: example.forms.len(),
                    expected: self.tenses,
                });
            }
        }
        Ok(self)
    }

    /// Global maximum observed length, the morpheme capacity for a search.
    /// Explicit lemma literals count as observations.
    pub fn max_form_len(&self) -> usize {
        self.examples
            .iter()
            .flat_map(|e| {
                e.forms
                    .iter()
                    .map(Vec::len)
                    .chain(e.lemma.iter().map(Vec::len))
            })
            .max()
            .unwrap_or(0)
    }
}
