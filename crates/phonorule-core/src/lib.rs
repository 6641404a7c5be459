//! Shared types for the phonorule morphological rule inducer.
//!
//! - [`phoneme`] -- Fixed phoneme alphabet and form parsing/formatting
//! - [`features`] -- Categorical feature domains (voicing, place, manner, sibilance)
//! - [`catalog`] -- Static feature member tables with startup validation
//! - [`corpus`] -- Observed word paradigms (one surface form per tense)

pub mod catalog;
pub mod corpus;
pub mod features;
pub mod phoneme;

pub use catalog::{CatalogError, FeatureCatalog};
pub use corpus::{Corpus, CorpusError, Example};
pub use features::{FeatureDomain, Manner, Place, Sibilance, Voicing};
pub use phoneme::{ALPHABET, Phoneme, PhonemeParseError, format_form, parse_form};
