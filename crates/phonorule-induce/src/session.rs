// Morpheme model: bounded symbolic phoneme sequences over one constraint
// problem. A session owns the problem under construction together with the
// feature catalog and the shared slot capacity; morphemes are declared once,
// constrained declaratively, and live until the query is answered.

use phonorule_core::{ALPHABET, FeatureCatalog, Phoneme};
use phonorule_smt::{Bool, Int, IntVar, Model, Problem, Real, Sym, SymVar};

use crate::error::InduceError;

/// Bounded symbolic phoneme sequence: an explicit length variable plus one
/// enumeration variable per slot. Slots at or beyond the solved length are
/// don't-care and are never read back.
#[derive(Debug, Clone)]
pub struct Morpheme {
    pub len: IntVar,
    pub slots: Vec<SymVar>,
}

/// One constraint-building session: the problem, the validated catalog and
/// the fixed slot capacity every morpheme shares.
pub struct Session<'a> {
    pub problem: Problem,
    catalog: &'a FeatureCatalog,
    capacity: usize,
}

impl<'a> Session<'a> {
    pub fn new(catalog: &'a FeatureCatalog, capacity: usize) -> Self {
        Session {
            problem: Problem::new(),
            catalog,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn catalog(&self) -> &'a FeatureCatalog {
        self.catalog
    }

    /// Information-theoretic cost of one solved phoneme.
    pub fn phoneme_cost(&self) -> f64 {
        (ALPHABET.len() as f64).ln()
    }

    /// Length-proportional cost term for a morpheme.
    pub fn length_cost(&self, m: &Morpheme) -> Real {
        Real::Scaled(self.phoneme_cost(), Int::Var(m.len))
    }

    /// Declare a fresh morpheme: `capacity` phoneme variables and a length
    /// constrained to `0..=capacity`.
    pub fn new_morpheme(&mut self) -> Morpheme {
        let len = self.problem.fresh_int(0, self.capacity as i64);
        let slots = (0..self.capacity)
            .map(|_| self.problem.fresh_sym(ALPHABET.len() as u32))
            .collect();
        Morpheme { len, slots }
    }

    /// Assert that a morpheme equals a literal phoneme sequence. A literal
    /// longer than the capacity is a configuration error, rejected before
    /// any solving happens.
    pub fn constrain_equal(
        &mut self,
        m: &Morpheme,
        literal: &[Phoneme],
    ) -> Result<(), InduceError> {
        if literal.len() > self.capacity {
            return Err(InduceError::LiteralTooLong {
                len: literal.len(),
                capacity: self.capacity,
            });
        }
        self.problem
            .require(Bool::int_eq(m.len, Int::Const(literal.len() as i64)));
        for (slot, phoneme) in m.slots.iter().zip(literal) {
            self.problem
                .require(Bool::sym_eq(*slot, Sym::Const(phoneme.index() as u32)));
        }
        Ok(())
    }

    /// Concatenate two morphemes into a fresh one.
    ///
    /// `p.len` is itself solver-determined, so every possible boundary
    /// position is enumerated and guarded: exactly one guard fires per
    /// concrete assignment. An overlong combined length is infeasible, not
    /// an error.
    pub fn concatenate(&mut self, p: &Morpheme, q: &Morpheme) -> Morpheme {
        let r = self.new_morpheme();
        self.problem.require(Bool::int_eq(
            r.len,
            Int::Var(p.len).plus(Int::Var(q.len)),
        ));
        for j in 0..self.capacity {
            // Prefix: while p extends past j, r copies p.
            self.problem.require(
                Bool::int_gt(Int::Var(p.len), j as i64)
                    .implies(Bool::sym_eq(r.slots[j], p.slots[j])),
            );
            // Boundary at j: r copies q shifted by j.
            let shifted: Vec<Bool> = (0..self.capacity - j)
                .map(|i| {
                    Bool::int_gt(Int::Var(q.len), i as i64)
                        .implies(Bool::sym_eq(r.slots[i + j], q.slots[i]))
                })
                .collect();
            self.problem.require(
                Bool::int_eq(p.len, Int::Const(j as i64)).implies(Bool::And(shifted)),
            );
        }
        r
    }

    /// Variable equal to the final phoneme of `m`, requiring `m` non-empty.
    /// One guard per possible length pins the result.
    pub fn last_phoneme(&mut self, m: &Morpheme) -> Result<SymVar, InduceError> {
        if self.capacity == 0 {
            return Err(InduceError::EmptyMorpheme);
        }
        self.problem.require(Bool::int_gt(Int::Var(m.len), 0));
        let ending = self.problem.fresh_sym(ALPHABET.len() as u32);
        for j in 1..=self.capacity {
            self.problem.require(
                Bool::int_eq(m.len, Int::Const(j as i64))
                    .implies(Bool::sym_eq(ending, m.slots[j - 1])),
            );
        }
        Ok(ending)
    }

    /// Assert `a == b` whenever `cond` holds (length and live slots).
    pub fn equate_when(&mut self, cond: Bool, a: &Morpheme, b: &Morpheme) {
        self.problem
            .require(cond.clone().implies(Bool::int_eq(a.len, b.len)));
        for j in 0..self.capacity {
            self.problem.require(
                Bool::And(vec![cond.clone(), Bool::int_gt(Int::Var(a.len), j as i64)])
                    .implies(Bool::sym_eq(a.slots[j], b.slots[j])),
            );
        }
    }
}

/// Read a morpheme's surface form out of a satisfying model: the solved
/// length, then exactly that many slots.
pub fn render_morpheme(model: &Model, m: &Morpheme) -> Vec<Phoneme> {
    let len = model.int_value(m.len).max(0) as usize;
    m.slots
        .iter()
        .take(len)
        .filter_map(|&slot| Phoneme::from_index(model.sym_value(slot) as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonorule_core::{format_form, parse_form};
    use phonorule_smt::{DfsSolver, Outcome, Solver};

    fn catalog() -> FeatureCatalog {
        FeatureCatalog::new().unwrap()
    }

    fn solve(session: Session<'_>) -> Outcome {
        DfsSolver::new().check(&session.problem)
    }

    #[test]
    fn literal_round_trip() {
        let catalog = catalog();
        for literal in ["", "k", "kat", "kats", "glad"] {
            let phonemes = parse_form(literal).unwrap();
            let mut s = Session::new(&catalog, 4);
            let m = s.new_morpheme();
            s.constrain_equal(&m, &phonemes).unwrap();
            let model = solve(s).model().unwrap();
            assert_eq!(format_form(&render_morpheme(&model, &m)), literal);
        }
    }

    #[test]
    fn over_length_literal_rejected_pre_solve() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 2);
        let m = s.new_morpheme();
        let err = s
            .constrain_equal(&m, &parse_form("kat").unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            InduceError::LiteralTooLong {
                len: 3,
                capacity: 2
            }
        ));
    }

    #[test]
    fn concatenation_with_empty_suffix() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 4);
        let p = s.new_morpheme();
        let q = s.new_morpheme();
        s.constrain_equal(&p, &parse_form("ab").unwrap()).unwrap();
        s.constrain_equal(&q, &[]).unwrap();
        let r = s.concatenate(&p, &q);
        let model = solve(s).model().unwrap();
        assert_eq!(format_form(&render_morpheme(&model, &r)), "ab");
    }

    #[test]
    fn concatenation_ab_c_is_abc() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 4);
        let p = s.new_morpheme();
        let q = s.new_morpheme();
        s.constrain_equal(&p, &parse_form("a b").unwrap()).unwrap();
        s.constrain_equal(&q, &parse_form("s").unwrap()).unwrap();
        let r = s.concatenate(&p, &q);
        let model = solve(s).model().unwrap();
        let surface = render_morpheme(&model, &r);
        assert_eq!(format_form(&surface), "abs");
        assert_eq!(model.int_value(r.len), 3);
    }

    #[test]
    fn concatenation_with_free_suffix() {
        // The suffix is left latent; constraining the result determines it.
        let catalog = catalog();
        let mut s = Session::new(&catalog, 4);
        let p = s.new_morpheme();
        let q = s.new_morpheme();
        s.constrain_equal(&p, &parse_form("kat").unwrap()).unwrap();
        let r = s.concatenate(&p, &q);
        s.constrain_equal(&r, &parse_form("kats").unwrap()).unwrap();
        let model = solve(s).model().unwrap();
        assert_eq!(format_form(&render_morpheme(&model, &q)), "s");
    }

    #[test]
    fn overlong_concatenation_is_infeasible() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 3);
        let p = s.new_morpheme();
        let q = s.new_morpheme();
        s.constrain_equal(&p, &parse_form("ka").unwrap()).unwrap();
        s.constrain_equal(&q, &parse_form("ts").unwrap()).unwrap();
        let _ = s.concatenate(&p, &q);
        assert!(matches!(solve(s), Outcome::Unsat));
    }

    #[test]
    fn capacity_invariant_holds_in_models() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 3);
        let m = s.new_morpheme();
        let _ = s.last_phoneme(&m).unwrap();
        let model = solve(s).model().unwrap();
        let len = model.int_value(m.len);
        assert!((1..=3).contains(&len));
    }

    #[test]
    fn last_phoneme_tracks_length() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 4);
        let m = s.new_morpheme();
        s.constrain_equal(&m, &parse_form("kat").unwrap()).unwrap();
        let last = s.last_phoneme(&m).unwrap();
        let model = solve(s).model().unwrap();
        let p = Phoneme::from_index(model.sym_value(last) as usize).unwrap();
        assert_eq!(p.symbol(), "t");
    }

    #[test]
    fn zero_capacity_has_no_final_phoneme() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 0);
        let m = s.new_morpheme();
        assert!(matches!(
            s.last_phoneme(&m),
            Err(InduceError::EmptyMorpheme)
        ));
    }

    #[test]
    fn equate_when_is_conditional() {
        let catalog = catalog();
        let mut s = Session::new(&catalog, 3);
        let cond = s.problem.fresh_bool();
        let a = s.new_morpheme();
        let b = s.new_morpheme();
        s.constrain_equal(&a, &parse_form("ka").unwrap()).unwrap();
        s.constrain_equal(&b, &parse_form("tu").unwrap()).unwrap();
        s.equate_when(Bool::Var(cond), &a, &b);
        let model = solve(s).model().unwrap();
        assert!(!model.bool_value(cond));
    }
}
