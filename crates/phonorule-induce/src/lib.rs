//! Rule induction core: encodes word paradigms as finite-domain constraints
//! and searches for the cheapest rule hypothesis reproducing them exactly.
//!
//! - [`session`] -- Morpheme model over a constraint problem (literal
//!   equality, length-indexed concatenation, final-phoneme extraction)
//! - [`resolver`] -- Symbolic phonological-feature resolution
//! - [`grammar`] -- Guarded-conditional rule grammar with explicit
//!   alternative-selection variables and per-production costs
//! - [`search`] -- Constraint assembly and the increasing-cost-bound loop

pub mod error;
pub mod grammar;
pub mod resolver;
pub mod search;
pub mod session;

pub use error::InduceError;
pub use grammar::{Environment, GrammarConfig, Program};
pub use search::{ExampleSolution, Hypothesis, SearchConfig, induce};
pub use session::{Morpheme, Session, render_morpheme};
