// Rule grammar: guarded conditionals over stem-plus-suffix returns.
//
// Every grammar site with alternatives carries an explicit selection
// variable (a boolean or small enumeration) shared across examples within
// one tense; evaluating the same structure against each example's
// environment yields that example's symbolic output. Costs follow the
// selections: one unit per production instance reached by the derivation,
// plus the length-proportional cost of each literal string.

use phonorule_core::{FeatureDomain, format_form};
use phonorule_smt::{Bool, BoolVar, Model, Real, Sym, SymVar};

use crate::error::InduceError;
use crate::resolver;
use crate::session::{Morpheme, Session, render_morpheme};

/// Grammar dimensions for one search attempt.
#[derive(Debug, Clone, Copy)]
pub struct GrammarConfig {
    /// Maximum derivation depth of the conditional chain (at least 1; depth
    /// `d` allows `d - 1` guarded levels above the base return).
    pub max_depth: usize,
    /// Latent stem slots available per example.
    pub latent_stems: usize,
    /// Latent boolean flags available per example.
    pub latent_flags: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig {
            max_depth: 3,
            latent_stems: 0,
            latent_flags: 0,
        }
    }
}

/// Per-example runtime environment: the lemma, its derived final phoneme,
/// and the configured latent structure. Feature resolutions of the final
/// phoneme are built on first use and shared by every guard testing them.
pub struct Environment {
    pub lemma: Morpheme,
    pub stems: Vec<Morpheme>,
    pub flags: Vec<BoolVar>,
    pub last: SymVar,
    resolved: [Option<SymVar>; 4],
}

impl Environment {
    pub fn declare(session: &mut Session<'_>, config: &GrammarConfig) -> Result<Self, InduceError> {
        let lemma = session.new_morpheme();
        let stems = (0..config.latent_stems)
            .map(|_| session.new_morpheme())
            .collect();
        let flags = (0..config.latent_flags)
            .map(|_| session.problem.fresh_bool())
            .collect();
        let last = session.last_phoneme(&lemma)?;
        Ok(Environment {
            lemma,
            stems,
            flags,
            last,
            resolved: [None; 4],
        })
    }

    /// Resolved feature value of the final phoneme, built once per domain.
    fn resolved(&mut self, session: &mut Session<'_>, domain: FeatureDomain) -> SymVar {
        let slot = FeatureDomain::ALL
            .iter()
            .position(|d| *d == domain)
            .unwrap_or(0);
        if let Some(v) = self.resolved[slot] {
            return v;
        }
        let v = resolver::resolve(session, self.last, domain);
        self.resolved[slot] = Some(v);
        v
    }
}

/// One per-feature guard: wildcard (elided, always true) or bound to a
/// chosen literal value of the domain.
pub struct FeatureGuard {
    pub domain: FeatureDomain,
    pub bound: BoolVar,
    /// Chosen literal; the domain's fallback value is not a legal literal.
    pub value: SymVar,
}

impl FeatureGuard {
    fn declare(session: &mut Session<'_>, domain: FeatureDomain) -> Self {
        let bound = session.problem.fresh_bool();
        let value = session.problem.fresh_sym(domain.cardinality());
        if domain.has_none_value() {
            session
                .problem
                .require(Bool::sym_eq(value, Sym::Const(0)).negated());
        }
        FeatureGuard {
            domain,
            bound,
            value,
        }
    }

    fn condition(&self, session: &mut Session<'_>, env: &mut Environment) -> Bool {
        let resolved = env.resolved(session, self.domain);
        Bool::Or(vec![
            Bool::Var(self.bound).negated(),
            Bool::sym_eq(resolved, self.value),
        ])
    }

    fn cost(&self) -> Real {
        // One unit for the guard production, one more for the literal when
        // bound rather than wildcard.
        Real::Sum(vec![
            Real::Const(1.0),
            Real::gated(Bool::Var(self.bound), Real::Const(1.0)),
        ])
    }

    fn render(&self, model: &Model) -> Option<&'static str> {
        if model.bool_value(self.bound) {
            Some(self.domain.value_label(model.sym_value(self.value)))
        } else {
            None
        }
    }
}

/// Guard alternative referencing one latent flag directly.
pub struct FlagGuard {
    pub active: BoolVar,
    pub index: SymVar,
}

/// Combined guard: the conjunction of the four per-feature guards, or (when
/// flags are configured) a bare flag reference.
pub struct Guard {
    pub features: Vec<FeatureGuard>,
    pub flag: Option<FlagGuard>,
}

impl Guard {
    fn declare(session: &mut Session<'_>, config: &GrammarConfig) -> Self {
        let features = FeatureDomain::ALL
            .iter()
            .map(|&d| FeatureGuard::declare(session, d))
            .collect();
        let flag = if config.latent_flags > 0 {
            Some(FlagGuard {
                active: session.problem.fresh_bool(),
                index: session.problem.fresh_sym(config.latent_flags as u32),
            })
        } else {
            None
        };
        Guard { features, flag }
    }

    fn condition(&self, session: &mut Session<'_>, env: &mut Environment) -> Bool {
        let natural_class = Bool::And(
            self.features
                .iter()
                .map(|f| f.condition(session, env))
                .collect(),
        );
        match &self.flag {
            None => natural_class,
            Some(flag) => {
                let flag_holds = Bool::Or(
                    env.flags
                        .iter()
                        .enumerate()
                        .map(|(i, &f)| {
                            Bool::And(vec![
                                Bool::sym_eq(flag.index, Sym::Const(i as u32)),
                                Bool::Var(f),
                            ])
                        })
                        .collect(),
                );
                Bool::Or(vec![
                    Bool::And(vec![Bool::Var(flag.active), flag_holds]),
                    Bool::And(vec![Bool::Var(flag.active).negated(), natural_class]),
                ])
            }
        }
    }

    fn cost(&self) -> Real {
        let natural_class = Real::Sum(
            std::iter::once(Real::Const(1.0))
                .chain(self.features.iter().map(FeatureGuard::cost))
                .collect(),
        );
        match &self.flag {
            None => natural_class,
            Some(flag) => Real::Sum(vec![
                Real::gated(Bool::Var(flag.active), Real::Const(2.0)),
                Real::gated(Bool::Var(flag.active).negated(), natural_class),
            ]),
        }
    }

    fn render(&self, model: &Model) -> String {
        if let Some(flag) = &self.flag {
            if model.bool_value(flag.active) {
                return format!("flag[{}]", model.sym_value(flag.index));
            }
        }
        let mut txt = String::from("[");
        for feature in &self.features {
            if let Some(label) = feature.render(model) {
                txt.push(' ');
                txt.push_str(label);
            }
        }
        txt.push_str(" ]");
        txt
    }
}

/// Reference to the lemma or to one of the latent stem slots.
pub enum StemRef {
    Lemma,
    Chosen(SymVar),
}

impl StemRef {
    fn declare(session: &mut Session<'_>, config: &GrammarConfig) -> Self {
        if config.latent_stems == 0 {
            StemRef::Lemma
        } else {
            StemRef::Chosen(session.problem.fresh_sym(config.latent_stems as u32 + 1))
        }
    }

    fn evaluate(&self, session: &mut Session<'_>, env: &Environment) -> Morpheme {
        match self {
            StemRef::Lemma => env.lemma.clone(),
            StemRef::Chosen(choice) => {
                let out = session.new_morpheme();
                session.equate_when(Bool::sym_eq(*choice, Sym::Const(0)), &out, &env.lemma);
                for (i, stem) in env.stems.iter().enumerate() {
                    session.equate_when(
                        Bool::sym_eq(*choice, Sym::Const(i as u32 + 1)),
                        &out,
                        stem,
                    );
                }
                out
            }
        }
    }

    fn render(&self, model: &Model) -> String {
        match self {
            StemRef::Lemma => "lemma".to_string(),
            StemRef::Chosen(choice) => match model.sym_value(*choice) {
                0 => "lemma".to_string(),
                i => format!("stem[{}]", i - 1),
            },
        }
    }
}

/// Return production: a stem reference concatenated with a literal string.
pub struct ReturnRule {
    pub stem: StemRef,
    pub suffix: Morpheme,
}

impl ReturnRule {
    fn declare(session: &mut Session<'_>, config: &GrammarConfig) -> Self {
        ReturnRule {
            stem: StemRef::declare(session, config),
            suffix: session.new_morpheme(),
        }
    }

    fn evaluate(&self, session: &mut Session<'_>, env: &Environment) -> Morpheme {
        let stem = self.stem.evaluate(session, env);
        session.concatenate(&stem, &self.suffix)
    }

    fn cost(&self, session: &Session<'_>) -> Real {
        // Return production + stem reference + the literal string's
        // per-phoneme bit cost.
        Real::Sum(vec![
            Real::Const(2.0),
            session.length_cost(&self.suffix),
        ])
    }

    fn render(&self, model: &Model) -> String {
        let stem = self.stem.render(model);
        let suffix = render_morpheme(model, &self.suffix);
        if suffix.is_empty() {
            stem
        } else {
            format!("(append {} {})", stem, format_form(&suffix))
        }
    }
}

/// One optional guarded level of the conditional chain.
pub struct IfLevel {
    /// Whether this level is an `(if guard return rest)` node rather than
    /// the chain's terminating bare return.
    pub active: BoolVar,
    pub guard: Guard,
    pub ret: ReturnRule,
}

/// Candidate program for one tense: a bounded conditional chain.
///
/// `CONDITIONAL -> (GUARD RETURN CONDITIONAL) | RETURN`, unrolled to the
/// configured maximum depth. Each level either tests its guard (returning
/// its own value on success, deferring to the rest of the chain otherwise)
/// or terminates the chain with its return.
pub struct Program {
    pub levels: Vec<IfLevel>,
    pub base: ReturnRule,
}

impl Program {
    pub fn declare(session: &mut Session<'_>, config: &GrammarConfig) -> Result<Self, InduceError> {
        if config.max_depth == 0 {
            return Err(InduceError::ZeroDepth);
        }
        let levels = (0..config.max_depth - 1)
            .map(|_| IfLevel {
                active: session.problem.fresh_bool(),
                guard: Guard::declare(session, config),
                ret: ReturnRule::declare(session, config),
            })
            .collect();
        Ok(Program {
            levels,
            base: ReturnRule::declare(session, config),
        })
    }

    /// Evaluate the program against one example's environment, yielding the
    /// morpheme the program produces for it.
    pub fn evaluate(&self, session: &mut Session<'_>, env: &mut Environment) -> Morpheme {
        let mut rest = self.base.evaluate(session, env);
        for level in self.levels.iter().rev() {
            let value = level.ret.evaluate(session, env);
            let cond = level.guard.condition(session, env);
            let out = session.new_morpheme();
            // Inactive level or satisfied guard: this level's own return.
            let takes_own = Bool::Or(vec![Bool::Var(level.active).negated(), cond.clone()]);
            session.equate_when(takes_own, &out, &value);
            session.equate_when(
                Bool::And(vec![Bool::Var(level.active), cond.negated()]),
                &out,
                &rest,
            );
            rest = out;
        }
        rest
    }

    /// Selection-dependent total cost of the derivation.
    pub fn cost(&self, session: &Session<'_>) -> Real {
        let mut cost = Real::Sum(vec![Real::Const(1.0), self.base.cost(session)]);
        for level in self.levels.iter().rev() {
            cost = Real::Sum(vec![
                Real::Const(1.0),
                level.ret.cost(session),
                Real::gated(
                    Bool::Var(level.active),
                    Real::Sum(vec![level.guard.cost(), cost]),
                ),
            ]);
        }
        cost
    }

    /// Render the solved program in rule notation.
    pub fn render(&self, model: &Model) -> String {
        let mut txt = self.base.render(model);
        for level in self.levels.iter().rev() {
            if model.bool_value(level.active) {
                txt = format!(
                    "(if {} {} {})",
                    level.guard.render(model),
                    level.ret.render(model),
                    txt
                );
            } else {
                txt = level.ret.render(model);
            }
        }
        txt
    }
}
