// Error taxonomy for the induction layer.
//
// Configuration errors are fatal and surface before any solver call;
// NoHypothesis and Inconclusive are terminal search outcomes. An
// unsatisfiable cost bound is not an error, it just advances the loop.

use phonorule_core::{CatalogError, CorpusError};

#[derive(Debug, thiserror::Error)]
pub enum InduceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("literal of length {len} exceeds morpheme capacity {capacity}")]
    LiteralTooLong { len: usize, capacity: usize },

    #[error("morpheme capacity is zero; no final phoneme can exist")]
    EmptyMorpheme,

    #[error("maximum derivation depth must be at least 1")]
    ZeroDepth,

    #[error("search step must be positive and finite, got {step}")]
    InvalidStep { step: f64 },

    #[error("cost ceiling {ceiling} must be finite and at least the first bound {step}")]
    InvalidCeiling { ceiling: f64, step: f64 },

    #[error("no hypothesis found under the current grammar (cost ceiling {ceiling}); widen the grammar")]
    NoHypothesis { ceiling: f64 },

    #[error("solver budget exhausted at cost bound {bound}; result inconclusive")]
    Inconclusive { bound: f64 },
}
