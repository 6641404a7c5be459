// Hypothesis search: assemble the full constraint problem for a corpus and
// run the increasing-cost-bound loop. Each iteration asks one satisfiability
// question: "is there a rule hypothesis of total description cost at most
// B reproducing every observed form?" The first satisfiable bound yields a
// minimum-cost hypothesis up to the step granularity.

use std::fmt;

use phonorule_core::{Corpus, FeatureCatalog, Phoneme, format_form};
use phonorule_smt::{Bool, Outcome, Real, Solver};

use crate::error::InduceError;
use crate::grammar::{Environment, GrammarConfig, Program};
use crate::session::{Session, render_morpheme};

/// Cost-bound schedule for one induction run.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Bound at which the search gives up.
    pub ceiling: f64,
    /// Increment between consecutive bounds; the first bound equals it.
    pub step: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            ceiling: 200.0,
            step: 1.0,
        }
    }
}

/// Solved latent structure for one example.
#[derive(Debug, Clone)]
pub struct ExampleSolution {
    pub lemma: Vec<Phoneme>,
    pub stems: Vec<Vec<Phoneme>>,
    pub flags: Vec<bool>,
}

/// A satisfying hypothesis: one rendered program per tense plus the solved
/// per-example latents, found at `bound`.
#[derive(Debug, Clone)]
pub struct Hypothesis {
    pub bound: f64,
    pub programs: Vec<String>,
    pub examples: Vec<ExampleSolution>,
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "hypothesis at cost bound {}", self.bound)?;
        for (i, program) in self.programs.iter().enumerate() {
            writeln!(f, "  tense[{i}]: {program}")?;
        }
        for (i, example) in self.examples.iter().enumerate() {
            write!(f, "  example[{i}]: lemma={}", format_form(&example.lemma))?;
            for (j, stem) in example.stems.iter().enumerate() {
                write!(f, " stem[{j}]={}", format_form(stem))?;
            }
            for (j, flag) in example.flags.iter().enumerate() {
                write!(f, " flag[{j}]={}", if *flag { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fully assembled problem for one corpus: shared program structure per
/// tense, one environment per example, and the total description cost.
struct Assembly<'a> {
    session: Session<'a>,
    programs: Vec<Program>,
    environments: Vec<Environment>,
    cost: Real,
}

fn assemble<'a>(
    catalog: &'a FeatureCatalog,
    corpus: &Corpus,
    grammar: &GrammarConfig,
) -> Result<Assembly<'a>, InduceError> {
    let mut session = Session::new(catalog, corpus.max_form_len());
    let programs = (0..corpus.tenses)
        .map(|_| Program::declare(&mut session, grammar))
        .collect::<Result<Vec<_>, _>>()?;

    let mut environments = Vec::with_capacity(corpus.examples.len());
    let mut terms = Vec::new();
    for example in &corpus.examples {
        let mut env = Environment::declare(&mut session, grammar)?;
        if let Some(lemma) = &example.lemma {
            session.constrain_equal(&env.lemma, lemma)?;
        }
        for (program, form) in programs.iter().zip(&example.forms) {
            let out = program.evaluate(&mut session, &mut env);
            session.constrain_equal(&out, form)?;
        }
        terms.push(session.length_cost(&env.lemma));
        for stem in &env.stems {
            terms.push(session.length_cost(stem));
        }
        environments.push(env);
    }
    for program in &programs {
        terms.push(program.cost(&session));
    }
    // Each latent flag slot is one unit per example per tense.
    let flag_bits = (corpus.examples.len() * corpus.tenses * grammar.latent_flags) as f64;
    if flag_bits > 0.0 {
        terms.push(Real::Const(flag_bits));
    }

    Ok(Assembly {
        session,
        programs,
        environments,
        cost: Real::Sum(terms),
    })
}

/// Search for the cheapest hypothesis reproducing `corpus` under `grammar`.
///
/// Bounds increase from `step` by `step` up to the ceiling; the first
/// satisfiable bound wins. An exhausted solver budget is retried once at the
/// same bound before giving up as inconclusive. A schedule that cannot
/// advance or can never admit a bound is a configuration error.
pub fn induce<S: Solver>(
    solver: &mut S,
    catalog: &FeatureCatalog,
    corpus: &Corpus,
    grammar: &GrammarConfig,
    search: &SearchConfig,
) -> Result<Hypothesis, InduceError> {
    if !(search.step > 0.0 && search.step.is_finite()) {
        return Err(InduceError::InvalidStep { step: search.step });
    }
    if !search.ceiling.is_finite() || search.ceiling < search.step {
        return Err(InduceError::InvalidCeiling {
            ceiling: search.ceiling,
            step: search.step,
        });
    }
    let corpus = corpus.clone().validated()?;
    let mut bound = search.step;
    while bound <= search.ceiling + f64::EPSILON {
        let mut retried = false;
        loop {
            match solve_at(solver, catalog, &corpus, grammar, bound)? {
                BoundResult::Found(hypothesis) => return Ok(hypothesis),
                BoundResult::TooTight => break,
                BoundResult::Exhausted if !retried => retried = true,
                BoundResult::Exhausted => return Err(InduceError::Inconclusive { bound }),
            }
        }
        bound += search.step;
    }
    Err(InduceError::NoHypothesis {
        ceiling: search.ceiling,
    })
}

enum BoundResult {
    Found(Hypothesis),
    TooTight,
    Exhausted,
}

fn solve_at<S: Solver>(
    solver: &mut S,
    catalog: &FeatureCatalog,
    corpus: &Corpus,
    grammar: &GrammarConfig,
    bound: f64,
) -> Result<BoundResult, InduceError> {
    let mut assembly = assemble(catalog, corpus, grammar)?;
    let cost = assembly.cost.clone();
    assembly.session.problem.require(Bool::CostLe(cost, bound));
    match solver.check(&assembly.session.problem) {
        Outcome::Sat(model) => {
            let programs = assembly
                .programs
                .iter()
                .map(|p| p.render(&model))
                .collect();
            let examples = assembly
                .environments
                .iter()
                .map(|env| ExampleSolution {
                    lemma: render_morpheme(&model, &env.lemma),
                    stems: env
                        .stems
                        .iter()
                        .map(|s| render_morpheme(&model, s))
                        .collect(),
                    flags: env.flags.iter().map(|&f| model.bool_value(f)).collect(),
                })
                .collect();
            Ok(BoundResult::Found(Hypothesis {
                bound,
                programs,
                examples,
            }))
        }
        Outcome::Unsat => Ok(BoundResult::TooTight),
        Outcome::Unknown => Ok(BoundResult::Exhausted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonorule_core::{Example, parse_form};
    use phonorule_smt::DfsSolver;

    fn corpus(examples: &[(Option<&str>, &[&str])]) -> Corpus {
        Corpus::new(
            examples
                .iter()
                .map(|(lemma, forms)| Example {
                    lemma: lemma.map(|l| parse_form(l).unwrap()),
                    forms: forms.iter().map(|f| parse_form(f).unwrap()).collect(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn defaults_are_sane() {
        let config = SearchConfig::default();
        assert_eq!(config.ceiling, 200.0);
        assert_eq!(config.step, 1.0);
    }

    #[test]
    fn identity_tense_solves_at_a_small_bound() {
        let catalog = FeatureCatalog::new().unwrap();
        let corpus = corpus(&[(Some("kat"), &["kat"])]);
        let grammar = GrammarConfig {
            max_depth: 1,
            latent_stems: 0,
            latent_flags: 0,
        };
        let mut solver = DfsSolver::new();
        let hypothesis = induce(
            &mut solver,
            &catalog,
            &corpus,
            &grammar,
            &SearchConfig::default(),
        )
        .unwrap();
        assert_eq!(hypothesis.programs, vec!["lemma".to_string()]);
        // Fixed grammar cost 3 plus three phonemes of lemma.
        let expected = 3.0 + 3.0 * (phonorule_core::ALPHABET.len() as f64).ln();
        assert!(hypothesis.bound >= expected);
        assert!(hypothesis.bound < expected + 1.0 + f64::EPSILON);
    }

    #[test]
    fn degenerate_bound_schedules_are_rejected() {
        // A step of zero (or worse) would re-test the same bound forever;
        // it has to come back as an immediate configuration error.
        let catalog = FeatureCatalog::new().unwrap();
        let corpus = corpus(&[(Some("kat"), &["kat"])]);
        let grammar = GrammarConfig {
            max_depth: 1,
            latent_stems: 0,
            latent_flags: 0,
        };
        let mut solver = DfsSolver::new();
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let search = SearchConfig {
                ceiling: 200.0,
                step,
            };
            let err = induce(&mut solver, &catalog, &corpus, &grammar, &search).unwrap_err();
            assert!(matches!(err, InduceError::InvalidStep { .. }), "step {step}");
        }

        let search = SearchConfig {
            ceiling: 0.5,
            step: 1.0,
        };
        let err = induce(&mut solver, &catalog, &corpus, &grammar, &search).unwrap_err();
        assert!(matches!(err, InduceError::InvalidCeiling { .. }));

        let search = SearchConfig {
            ceiling: f64::INFINITY,
            step: 1.0,
        };
        let err = induce(&mut solver, &catalog, &corpus, &grammar, &search).unwrap_err();
        assert!(matches!(err, InduceError::InvalidCeiling { .. }));
    }

    #[test]
    fn ceiling_below_the_minimum_cost_finds_nothing() {
        let catalog = FeatureCatalog::new().unwrap();
        let corpus = corpus(&[(Some("kat"), &["kat"])]);
        let grammar = GrammarConfig {
            max_depth: 1,
            latent_stems: 0,
            latent_flags: 0,
        };
        // Minimum cost is 3 + 3 ln 38, just under 14.
        let search = SearchConfig {
            ceiling: 13.0,
            step: 1.0,
        };
        let mut solver = DfsSolver::new();
        let err = induce(&mut solver, &catalog, &corpus, &grammar, &search).unwrap_err();
        assert!(matches!(err, InduceError::NoHypothesis { .. }));
    }

    #[test]
    fn impossible_corpus_reports_no_hypothesis() {
        // A depth-1 grammar appends one shared suffix to the lemma; "su"
        // does not extend "kat", so no bound can ever be satisfiable.
        let catalog = FeatureCatalog::new().unwrap();
        let corpus = corpus(&[(Some("kat"), &["su"])]);
        let grammar = GrammarConfig {
            max_depth: 1,
            latent_stems: 0,
            latent_flags: 0,
        };
        let search = SearchConfig {
            ceiling: 12.0,
            step: 4.0,
        };
        let mut solver = DfsSolver::new();
        let err = induce(&mut solver, &catalog, &corpus, &grammar, &search).unwrap_err();
        assert!(matches!(err, InduceError::NoHypothesis { ceiling } if ceiling == 12.0));
    }
}
