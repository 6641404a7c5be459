//! Finite-domain constraint layer for phonorule.
//!
//! Declares variables over finite enumerations, bounded integers and
//! booleans, boolean constraints over them, and real-valued cost terms that
//! can be bounded from above. A [`Problem`] collects declarations and
//! assertions; a [`Solver`] answers one satisfiability query per problem.
//!
//! - [`term`] -- Variable ids and the expression AST
//! - [`problem`] -- Problem builder (fresh variables, assertions)
//! - [`model`] -- Satisfying assignment with term evaluation
//! - [`solve`] -- Reference propagate/decide/backtrack solver

pub mod model;
pub mod problem;
pub mod solve;
pub mod term;

pub use model::Model;
pub use problem::Problem;
pub use solve::{DfsSolver, SolverBudget};
pub use term::{Bool, BoolVar, Int, IntVar, Real, Sym, SymVar};

/// Result of one satisfiability query.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A concrete satisfying assignment was found.
    Sat(Model),
    /// No assignment satisfies the asserted constraints.
    Unsat,
    /// The query was abandoned before a verdict (budget exhausted).
    Unknown,
}

impl Outcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, Outcome::Sat(_))
    }

    pub fn model(self) -> Option<Model> {
        match self {
            Outcome::Sat(m) => Some(m),
            _ => None,
        }
    }
}

/// The satisfiability-solver seam: one blocking query per problem, with no
/// partial-result or cancellation contract. Sessions are independent; a
/// caller scanning cost bounds simply submits a fresh problem per bound.
pub trait Solver {
    fn check(&mut self, problem: &Problem) -> Outcome;
}
