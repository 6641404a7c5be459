// Satisfying assignment: one concrete value per declared variable, with
// total evaluation of all term sorts against it.

use crate::term::{Bool, BoolVar, Int, IntVar, Real, Sym, SymVar};

/// A concrete model returned by a successful solver query. Valid only for
/// the problem it was produced from.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) bools: Vec<bool>,
    pub(crate) ints: Vec<i64>,
    pub(crate) syms: Vec<u32>,
}

impl Model {
    pub fn bool_value(&self, v: BoolVar) -> bool {
        self.bools[v.0 as usize]
    }

    pub fn int_value(&self, v: IntVar) -> i64 {
        self.ints[v.0 as usize]
    }

    pub fn sym_value(&self, v: SymVar) -> u32 {
        self.syms[v.0 as usize]
    }

    pub fn eval_int(&self, term: &Int) -> i64 {
        match term {
            Int::Const(c) => *c,
            Int::Var(v) => self.int_value(*v),
            Int::Add(a, b) => self.eval_int(a) + self.eval_int(b),
        }
    }

    pub fn eval_sym(&self, term: &Sym) -> u32 {
        match term {
            Sym::Const(c) => *c,
            Sym::Var(v) => self.sym_value(*v),
            Sym::Ite(cond, then, otherwise) => {
                if self.eval_bool(cond) {
                    self.eval_sym(then)
                } else {
                    self.eval_sym(otherwise)
                }
            }
        }
    }

    pub fn eval_real(&self, term: &Real) -> f64 {
        match term {
            Real::Const(c) => *c,
            Real::Scaled(k, t) => k * self.eval_int(t) as f64,
            Real::Gated(cond, value) => {
                if self.eval_bool(cond) {
                    self.eval_real(value)
                } else {
                    0.0
                }
            }
            Real::Sum(terms) => terms.iter().map(|t| self.eval_real(t)).sum(),
        }
    }

    pub fn eval_bool(&self, term: &Bool) -> bool {
        match term {
            Bool::Const(c) => *c,
            Bool::Var(v) => self.bool_value(*v),
            Bool::Not(t) => !self.eval_bool(t),
            Bool::And(ts) => ts.iter().all(|t| self.eval_bool(t)),
            Bool::Or(ts) => ts.iter().any(|t| self.eval_bool(t)),
            Bool::Implies(a, b) => !self.eval_bool(a) || self.eval_bool(b),
            Bool::IntEq(a, b) => self.eval_int(a) == self.eval_int(b),
            Bool::IntLe(a, b) => self.eval_int(a) <= self.eval_int(b),
            Bool::SymEq(a, b) => self.eval_sym(a) == self.eval_sym(b),
            Bool::CostLe(r, bound) => self.eval_real(r) <= bound + crate::solve::COST_EPSILON,
        }
    }
}
