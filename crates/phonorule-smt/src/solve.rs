// Reference finite-domain solver: propagate / decide / backtrack.
//
// State per variable: booleans and enumerations hold an optional value,
// integers hold a shrinking interval. Every narrowing is recorded on a trail
// so a failed decision can be undone exactly. Propagation is occurrence
// driven: narrowing a variable re-queues only the assertions mentioning it.
//
// The solver answers Unknown instead of blocking forever: a node budget and
// an optional wall-clock deadline bound every query.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use hashbrown::HashSet;

use crate::model::Model;
use crate::problem::Problem;
use crate::term::{Bool, Int, Real, Sym};
use crate::{Outcome, Solver};

/// Slack for comparisons against real-valued cost bounds.
pub const COST_EPSILON: f64 = 1e-9;

/// Resource limits for one query.
#[derive(Debug, Clone, Copy)]
pub struct SolverBudget {
    /// Maximum search-tree nodes before answering Unknown.
    pub max_nodes: u64,
    /// Optional wall-clock limit for the whole query.
    pub max_time: Option<Duration>,
}

impl Default for SolverBudget {
    fn default() -> Self {
        SolverBudget {
            max_nodes: 500_000,
            max_time: None,
        }
    }
}

/// Depth-first reference solver.
#[derive(Debug, Default)]
pub struct DfsSolver {
    pub budget: SolverBudget,
}

impl DfsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget: SolverBudget) -> Self {
        DfsSolver { budget }
    }
}

impl Solver for DfsSolver {
    fn check(&mut self, problem: &Problem) -> Outcome {
        Search::new(problem, self.budget).run()
    }
}

// ---------------------------------------------------------------------------
// Search state
// ---------------------------------------------------------------------------

struct Conflict;
type Prop = Result<bool, Conflict>;

#[derive(Debug, Clone, Copy)]
enum VarRef {
    B(u32),
    I(u32),
    S(u32),
}

enum Undo {
    Bool(u32),
    Sym(u32),
    Int(u32, i64, i64),
}

enum SearchEnd {
    Sat(Model),
    Unsat,
    Budget,
}

struct Search<'a> {
    problem: &'a Problem,
    bools: Vec<Option<bool>>,
    ints: Vec<(i64, i64)>,
    syms: Vec<Option<u32>>,
    trail: Vec<Undo>,
    touched: Vec<VarRef>,
    // Occurrence lists: variable -> asserted constraints mentioning it.
    bool_occs: Vec<Vec<u32>>,
    int_occs: Vec<Vec<u32>>,
    sym_occs: Vec<Vec<u32>>,
    queue: VecDeque<u32>,
    queued: HashSet<u32>,
    nodes: u64,
    budget: SolverBudget,
    deadline: Option<Instant>,
}

impl<'a> Search<'a> {
    fn new(problem: &'a Problem, budget: SolverBudget) -> Self {
        let mut search = Search {
            problem,
            bools: vec![None; problem.bool_count() as usize],
            ints: (0..problem.int_count())
                .map(|i| problem.int_range(crate::term::IntVar(i as u32)))
                .collect(),
            syms: vec![None; problem.sym_count()],
            trail: Vec::new(),
            touched: Vec::new(),
            bool_occs: vec![Vec::new(); problem.bool_count() as usize],
            int_occs: vec![Vec::new(); problem.int_count()],
            sym_occs: vec![Vec::new(); problem.sym_count()],
            queue: VecDeque::new(),
            queued: HashSet::new(),
            nodes: 0,
            deadline: budget.max_time.map(|t| Instant::now() + t),
            budget,
        };
        for (idx, assert) in problem.asserts().iter().enumerate() {
            search.index_bool(assert, idx as u32);
        }
        search
    }

    fn run(&mut self) -> Outcome {
        if self.ints.iter().any(|&(lo, hi)| lo > hi) {
            return Outcome::Unsat;
        }
        for idx in 0..self.problem.asserts().len() as u32 {
            self.enqueue(idx);
        }
        if self.propagate().is_err() {
            return Outcome::Unsat;
        }
        match self.dfs() {
            SearchEnd::Sat(model) => Outcome::Sat(model),
            SearchEnd::Unsat => Outcome::Unsat,
            SearchEnd::Budget => Outcome::Unknown,
        }
    }

    // -----------------------------------------------------------------------
    // Occurrence indexing
    // -----------------------------------------------------------------------

    fn index_bool(&mut self, t: &Bool, idx: u32) {
        match t {
            Bool::Const(_) => {}
            Bool::Var(v) => self.bool_occs[v.0 as usize].push(idx),
            Bool::Not(x) => self.index_bool(x, idx),
            Bool::And(xs) | Bool::Or(xs) => {
                for x in xs {
                    self.index_bool(x, idx);
                }
            }
            Bool::Implies(a, b) => {
                self.index_bool(a, idx);
                self.index_bool(b, idx);
            }
            Bool::IntEq(a, b) | Bool::IntLe(a, b) => {
                self.index_int(a, idx);
                self.index_int(b, idx);
            }
            Bool::SymEq(a, b) => {
                self.index_sym(a, idx);
                self.index_sym(b, idx);
            }
            Bool::CostLe(r, _) => self.index_real(r, idx),
        }
    }

    fn index_int(&mut self, t: &Int, idx: u32) {
        match t {
            Int::Const(_) => {}
            Int::Var(v) => self.int_occs[v.0 as usize].push(idx),
            Int::Add(a, b) => {
                self.index_int(a, idx);
                self.index_int(b, idx);
            }
        }
    }

    fn index_sym(&mut self, t: &Sym, idx: u32) {
        match t {
            Sym::Const(_) => {}
            Sym::Var(v) => self.sym_occs[v.0 as usize].push(idx),
            Sym::Ite(c, a, b) => {
                self.index_bool(c, idx);
                self.index_sym(a, idx);
                self.index_sym(b, idx);
            }
        }
    }

    fn index_real(&mut self, t: &Real, idx: u32) {
        match t {
            Real::Const(_) => {}
            Real::Scaled(_, i) => self.index_int(i, idx),
            Real::Gated(c, r) => {
                self.index_bool(c, idx);
                self.index_real(r, idx);
            }
            Real::Sum(xs) => {
                for x in xs {
                    self.index_real(x, idx);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Partial evaluation
    // -----------------------------------------------------------------------

    fn int_bounds(&self, t: &Int) -> (i64, i64) {
        match t {
            Int::Const(c) => (*c, *c),
            Int::Var(v) => self.ints[v.0 as usize],
            Int::Add(a, b) => {
                let (alo, ahi) = self.int_bounds(a);
                let (blo, bhi) = self.int_bounds(b);
                (alo.saturating_add(blo), ahi.saturating_add(bhi))
            }
        }
    }

    fn sym_resolve(&self, t: &Sym) -> Option<u32> {
        match t {
            Sym::Const(c) => Some(*c),
            Sym::Var(v) => self.syms[v.0 as usize],
            Sym::Ite(c, a, b) => match self.eval_bool(c) {
                Some(true) => self.sym_resolve(a),
                Some(false) => self.sym_resolve(b),
                None => {
                    let ra = self.sym_resolve(a);
                    if ra.is_some() && ra == self.sym_resolve(b) {
                        ra
                    } else {
                        None
                    }
                }
            },
        }
    }

    fn real_bounds(&self, t: &Real) -> (f64, f64) {
        match t {
            Real::Const(c) => (*c, *c),
            Real::Scaled(k, i) => {
                let (lo, hi) = self.int_bounds(i);
                let (a, b) = (*k * lo as f64, *k * hi as f64);
                if a <= b { (a, b) } else { (b, a) }
            }
            Real::Gated(c, r) => match self.eval_bool(c) {
                Some(true) => self.real_bounds(r),
                Some(false) => (0.0, 0.0),
                None => {
                    let (lo, hi) = self.real_bounds(r);
                    (lo.min(0.0), hi.max(0.0))
                }
            },
            Real::Sum(xs) => xs.iter().fold((0.0, 0.0), |(lo, hi), x| {
                let (xlo, xhi) = self.real_bounds(x);
                (lo + xlo, hi + xhi)
            }),
        }
    }

    fn eval_bool(&self, t: &Bool) -> Option<bool> {
        match t {
            Bool::Const(c) => Some(*c),
            Bool::Var(v) => self.bools[v.0 as usize],
            Bool::Not(x) => self.eval_bool(x).map(|b| !b),
            Bool::And(xs) => {
                let mut all_true = true;
                for x in xs {
                    match self.eval_bool(x) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => all_true = false,
                    }
                }
                if all_true { Some(true) } else { None }
            }
            Bool::Or(xs) => {
                let mut all_false = true;
                for x in xs {
                    match self.eval_bool(x) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => all_false = false,
                    }
                }
                if all_false { Some(false) } else { None }
            }
            Bool::Implies(a, b) => match (self.eval_bool(a), self.eval_bool(b)) {
                (Some(false), _) | (_, Some(true)) => Some(true),
                (Some(true), Some(false)) => Some(false),
                _ => None,
            },
            Bool::IntEq(a, b) => {
                let (alo, ahi) = self.int_bounds(a);
                let (blo, bhi) = self.int_bounds(b);
                if alo == ahi && blo == bhi {
                    Some(alo == blo)
                } else if ahi < blo || bhi < alo {
                    Some(false)
                } else {
                    None
                }
            }
            Bool::IntLe(a, b) => {
                let (alo, ahi) = self.int_bounds(a);
                let (blo, bhi) = self.int_bounds(b);
                if ahi <= blo {
                    Some(true)
                } else if alo > bhi {
                    Some(false)
                } else {
                    None
                }
            }
            Bool::SymEq(a, b) => match (self.sym_resolve(a), self.sym_resolve(b)) {
                (Some(x), Some(y)) => Some(x == y),
                _ => None,
            },
            Bool::CostLe(r, bound) => {
                let (lo, hi) = self.real_bounds(r);
                if lo > bound + COST_EPSILON {
                    Some(false)
                } else if hi <= bound + COST_EPSILON {
                    Some(true)
                } else {
                    None
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Narrowing primitives (trail recorded)
    // -----------------------------------------------------------------------

    fn assign_bool(&mut self, v: u32, value: bool) -> Prop {
        match self.bools[v as usize] {
            Some(x) if x == value => Ok(false),
            Some(_) => Err(Conflict),
            None => {
                self.bools[v as usize] = Some(value);
                self.trail.push(Undo::Bool(v));
                self.touched.push(VarRef::B(v));
                Ok(true)
            }
        }
    }

    fn assign_sym(&mut self, v: u32, value: u32) -> Prop {
        if value >= self.problem.sym_domain(crate::term::SymVar(v)) {
            return Err(Conflict);
        }
        match self.syms[v as usize] {
            Some(x) if x == value => Ok(false),
            Some(_) => Err(Conflict),
            None => {
                self.syms[v as usize] = Some(value);
                self.trail.push(Undo::Sym(v));
                self.touched.push(VarRef::S(v));
                Ok(true)
            }
        }
    }

    fn narrow_int(&mut self, v: u32, lo: i64, hi: i64) -> Prop {
        let (clo, chi) = self.ints[v as usize];
        let nlo = clo.max(lo);
        let nhi = chi.min(hi);
        if nlo > nhi {
            return Err(Conflict);
        }
        if (nlo, nhi) == (clo, chi) {
            return Ok(false);
        }
        self.trail.push(Undo::Int(v, clo, chi));
        self.ints[v as usize] = (nlo, nhi);
        self.touched.push(VarRef::I(v));
        Ok(true)
    }

    fn tighten_int(&mut self, t: &Int, lo: i64, hi: i64) -> Prop {
        match t {
            Int::Const(c) => {
                if *c < lo || *c > hi {
                    Err(Conflict)
                } else {
                    Ok(false)
                }
            }
            Int::Var(v) => self.narrow_int(v.0, lo, hi),
            Int::Add(a, b) => {
                let (alo, ahi) = self.int_bounds(a);
                let (blo, bhi) = self.int_bounds(b);
                let c1 = self.tighten_int(a, lo.saturating_sub(bhi), hi.saturating_sub(blo))?;
                let c2 = self.tighten_int(b, lo.saturating_sub(ahi), hi.saturating_sub(alo))?;
                Ok(c1 || c2)
            }
        }
    }

    /// Pin an enumeration term to a concrete value, drilling through
    /// decided conditionals and deciding a conditional when its two
    /// branches resolve to distinct values.
    fn pin_sym(&mut self, t: &Sym, value: u32) -> Prop {
        match t {
            Sym::Const(c) => {
                if *c == value {
                    Ok(false)
                } else {
                    Err(Conflict)
                }
            }
            Sym::Var(v) => self.assign_sym(v.0, value),
            Sym::Ite(c, a, b) => match self.eval_bool(c) {
                Some(true) => self.pin_sym(a, value),
                Some(false) => self.pin_sym(b, value),
                None => match (self.sym_resolve(a), self.sym_resolve(b)) {
                    (Some(x), Some(y)) if x != y => {
                        if value == x {
                            self.assert_true(c)
                        } else if value == y {
                            self.assert_false(c)
                        } else {
                            Err(Conflict)
                        }
                    }
                    _ => Ok(false),
                },
            },
        }
    }

    /// Deduce from `term <= bound`: cap positive scaled integers, switch off
    /// gated contributions that no longer fit, distribute slack over sums.
    fn tighten_cost(&mut self, t: &Real, bound: f64) -> Prop {
        match t {
            Real::Const(c) => {
                if *c > bound + COST_EPSILON {
                    Err(Conflict)
                } else {
                    Ok(false)
                }
            }
            Real::Scaled(k, i) => {
                if *k > COST_EPSILON {
                    let hi = ((bound + COST_EPSILON) / k).floor() as i64;
                    self.tighten_int(i, i64::MIN, hi)
                } else if *k < -COST_EPSILON {
                    let lo = ((bound - COST_EPSILON) / k).ceil() as i64;
                    self.tighten_int(i, lo, i64::MAX)
                } else {
                    Ok(false)
                }
            }
            Real::Gated(c, r) => match self.eval_bool(c) {
                Some(true) => self.tighten_cost(r, bound),
                Some(false) => Ok(false),
                None => {
                    let (rlo, _) = self.real_bounds(r);
                    if rlo > bound + COST_EPSILON {
                        self.assert_false(c)
                    } else {
                        Ok(false)
                    }
                }
            },
            Real::Sum(xs) => {
                let lows: Vec<f64> = xs.iter().map(|x| self.real_bounds(x).0).collect();
                let total_lo: f64 = lows.iter().sum();
                let mut changed = false;
                for (x, lo) in xs.iter().zip(&lows) {
                    changed |= self.tighten_cost(x, bound - (total_lo - lo))?;
                }
                Ok(changed)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Constraint propagation
    // -----------------------------------------------------------------------

    fn assert_true(&mut self, t: &Bool) -> Prop {
        match t {
            Bool::Const(true) => Ok(false),
            Bool::Const(false) => Err(Conflict),
            Bool::Var(v) => self.assign_bool(v.0, true),
            Bool::Not(x) => self.assert_false(x),
            Bool::And(xs) => {
                let mut changed = false;
                for x in xs {
                    changed |= self.assert_true(x)?;
                }
                Ok(changed)
            }
            Bool::Or(xs) => {
                let mut unknown = None;
                let mut unknowns = 0;
                for x in xs {
                    match self.eval_bool(x) {
                        Some(true) => return Ok(false),
                        Some(false) => {}
                        None => {
                            unknowns += 1;
                            unknown = Some(x);
                        }
                    }
                }
                match (unknowns, unknown) {
                    (0, _) => Err(Conflict),
                    (1, Some(x)) => self.assert_true(x),
                    _ => Ok(false),
                }
            }
            Bool::Implies(a, b) => match self.eval_bool(a) {
                Some(true) => self.assert_true(b),
                Some(false) => Ok(false),
                None => match self.eval_bool(b) {
                    Some(false) => self.assert_false(a),
                    _ => Ok(false),
                },
            },
            Bool::IntEq(a, b) => {
                let (alo, ahi) = self.int_bounds(a);
                let (blo, bhi) = self.int_bounds(b);
                let lo = alo.max(blo);
                let hi = ahi.min(bhi);
                if lo > hi {
                    return Err(Conflict);
                }
                let c1 = self.tighten_int(a, lo, hi)?;
                let c2 = self.tighten_int(b, lo, hi)?;
                Ok(c1 || c2)
            }
            Bool::IntLe(a, b) => {
                let (alo, _) = self.int_bounds(a);
                let (_, bhi) = self.int_bounds(b);
                let c1 = self.tighten_int(a, i64::MIN, bhi)?;
                let c2 = self.tighten_int(b, alo, i64::MAX)?;
                Ok(c1 || c2)
            }
            Bool::SymEq(a, b) => match (self.sym_resolve(a), self.sym_resolve(b)) {
                (Some(x), Some(y)) => {
                    if x == y {
                        Ok(false)
                    } else {
                        Err(Conflict)
                    }
                }
                (Some(x), None) => self.pin_sym(b, x),
                (None, Some(y)) => self.pin_sym(a, y),
                (None, None) => Ok(false),
            },
            Bool::CostLe(r, bound) => {
                let (lo, hi) = self.real_bounds(r);
                if lo > bound + COST_EPSILON {
                    Err(Conflict)
                } else if hi <= bound + COST_EPSILON {
                    Ok(false)
                } else {
                    self.tighten_cost(r, *bound)
                }
            }
        }
    }

    fn assert_false(&mut self, t: &Bool) -> Prop {
        match t {
            Bool::Const(false) => Ok(false),
            Bool::Const(true) => Err(Conflict),
            Bool::Var(v) => self.assign_bool(v.0, false),
            Bool::Not(x) => self.assert_true(x),
            Bool::Or(xs) => {
                let mut changed = false;
                for x in xs {
                    changed |= self.assert_false(x)?;
                }
                Ok(changed)
            }
            Bool::And(xs) => {
                let mut unknown = None;
                let mut unknowns = 0;
                for x in xs {
                    match self.eval_bool(x) {
                        Some(false) => return Ok(false),
                        Some(true) => {}
                        None => {
                            unknowns += 1;
                            unknown = Some(x);
                        }
                    }
                }
                match (unknowns, unknown) {
                    (0, _) => Err(Conflict),
                    (1, Some(x)) => self.assert_false(x),
                    _ => Ok(false),
                }
            }
            Bool::Implies(a, b) => {
                let c1 = self.assert_true(a)?;
                let c2 = self.assert_false(b)?;
                Ok(c1 || c2)
            }
            Bool::IntEq(a, b) => match self.eval_bool(t) {
                Some(true) => Err(Conflict),
                Some(false) => Ok(false),
                None => {
                    let (alo, ahi) = self.int_bounds(a);
                    let (blo, bhi) = self.int_bounds(b);
                    let mut changed = false;
                    if alo == ahi {
                        changed |= self.trim_endpoint(b, alo)?;
                    }
                    if blo == bhi {
                        changed |= self.trim_endpoint(a, blo)?;
                    }
                    Ok(changed)
                }
            },
            Bool::IntLe(a, b) => {
                // a > b
                let (_, ahi) = self.int_bounds(a);
                let (blo, _) = self.int_bounds(b);
                let c1 = self.tighten_int(a, blo.saturating_add(1), i64::MAX)?;
                let c2 = self.tighten_int(b, i64::MIN, ahi.saturating_sub(1))?;
                Ok(c1 || c2)
            }
            Bool::SymEq(a, b) => match (self.sym_resolve(a), self.sym_resolve(b)) {
                (Some(x), Some(y)) => {
                    if x == y {
                        Err(Conflict)
                    } else {
                        Ok(false)
                    }
                }
                _ => Ok(false),
            },
            Bool::CostLe(r, bound) => {
                let (_, hi) = self.real_bounds(r);
                if hi <= bound + COST_EPSILON {
                    Err(Conflict)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Exclude a single value from an integer variable when it sits on an
    /// interval endpoint; interior exclusions wait for the endpoints to
    /// close in.
    fn trim_endpoint(&mut self, t: &Int, value: i64) -> Prop {
        if let Int::Var(v) = t {
            let (lo, hi) = self.ints[v.0 as usize];
            if lo == value {
                return self.narrow_int(v.0, value + 1, hi);
            }
            if hi == value {
                return self.narrow_int(v.0, lo, value - 1);
            }
        }
        Ok(false)
    }

    fn enqueue(&mut self, idx: u32) {
        if self.queued.insert(idx) {
            self.queue.push_back(idx);
        }
    }

    fn flush_touched(&mut self) {
        while let Some(var) = self.touched.pop() {
            let occs = match var {
                VarRef::B(v) => std::mem::take(&mut self.bool_occs[v as usize]),
                VarRef::I(v) => std::mem::take(&mut self.int_occs[v as usize]),
                VarRef::S(v) => std::mem::take(&mut self.sym_occs[v as usize]),
            };
            for &idx in &occs {
                self.enqueue(idx);
            }
            match var {
                VarRef::B(v) => self.bool_occs[v as usize] = occs,
                VarRef::I(v) => self.int_occs[v as usize] = occs,
                VarRef::S(v) => self.sym_occs[v as usize] = occs,
            }
        }
    }

    fn propagate(&mut self) -> Result<(), Conflict> {
        while let Some(idx) = self.queue.pop_front() {
            self.queued.remove(&idx);
            let assert = &self.problem.asserts()[idx as usize];
            if self.assert_true(assert).is_err() {
                self.queue.clear();
                self.queued.clear();
                self.touched.clear();
                return Err(Conflict);
            }
            self.flush_touched();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Decision search
    // -----------------------------------------------------------------------

    fn dfs(&mut self) -> SearchEnd {
        self.nodes += 1;
        if self.nodes > self.budget.max_nodes {
            return SearchEnd::Budget;
        }
        if self.nodes % 1024 == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() > deadline {
                    return SearchEnd::Budget;
                }
            }
        }

        let mut best: Option<(u8, u32)> = None;
        let mut open = false;
        for assert in self.problem.asserts() {
            match self.eval_bool(assert) {
                Some(true) => {}
                Some(false) => return SearchEnd::Unsat,
                None => {
                    open = true;
                    self.scan_bool(assert, &mut best);
                }
            }
        }
        if !open {
            return SearchEnd::Sat(self.extract_model());
        }
        let Some((rank, id)) = best else {
            // An open assertion with every variable decided cannot happen;
            // answer conservatively if it ever does.
            return SearchEnd::Budget;
        };

        let values: Vec<Value> = match rank {
            0 => {
                let (lo, hi) = self.ints[id as usize];
                (lo..=hi).map(Value::Int).collect()
            }
            1 => vec![Value::Bool(false), Value::Bool(true)],
            _ => (0..self.problem.sym_domain(crate::term::SymVar(id)))
                .map(Value::Sym)
                .collect(),
        };

        for value in values {
            let mark = self.trail.len();
            let assigned = match value {
                Value::Int(v) => self.narrow_int(id, v, v),
                Value::Bool(v) => self.assign_bool(id, v),
                Value::Sym(v) => self.assign_sym(id, v),
            };
            if assigned.is_ok() {
                self.flush_touched();
                if self.propagate().is_ok() {
                    match self.dfs() {
                        SearchEnd::Unsat => {}
                        end => return end,
                    }
                }
            }
            self.rollback(mark);
        }
        SearchEnd::Unsat
    }

    fn rollback(&mut self, mark: usize) {
        while self.trail.len() > mark {
            match self.trail.pop() {
                Some(Undo::Bool(v)) => self.bools[v as usize] = None,
                Some(Undo::Sym(v)) => self.syms[v as usize] = None,
                Some(Undo::Int(v, lo, hi)) => self.ints[v as usize] = (lo, hi),
                None => break,
            }
        }
        self.touched.clear();
    }

    fn extract_model(&self) -> Model {
        Model {
            bools: self.bools.iter().map(|b| b.unwrap_or(false)).collect(),
            ints: self.ints.iter().map(|&(lo, _)| lo).collect(),
            syms: self.syms.iter().map(|s| s.unwrap_or(0)).collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Branch variable choice: integers first (lengths drive everything),
    // then booleans (selections), then enumerations; creation order within
    // a sort.
    // -----------------------------------------------------------------------

    fn note(&self, rank: u8, id: u32, best: &mut Option<(u8, u32)>) {
        let undecided = match rank {
            0 => {
                let (lo, hi) = self.ints[id as usize];
                lo < hi
            }
            1 => self.bools[id as usize].is_none(),
            _ => self.syms[id as usize].is_none(),
        };
        if undecided && best.map(|b| (rank, id) < b).unwrap_or(true) {
            *best = Some((rank, id));
        }
    }

    fn scan_bool(&self, t: &Bool, best: &mut Option<(u8, u32)>) {
        match t {
            Bool::Const(_) => {}
            Bool::Var(v) => self.note(1, v.0, best),
            Bool::Not(x) => self.scan_bool(x, best),
            Bool::And(xs) | Bool::Or(xs) => {
                for x in xs {
                    self.scan_bool(x, best);
                }
            }
            Bool::Implies(a, b) => {
                self.scan_bool(a, best);
                self.scan_bool(b, best);
            }
            Bool::IntEq(a, b) | Bool::IntLe(a, b) => {
                self.scan_int(a, best);
                self.scan_int(b, best);
            }
            Bool::SymEq(a, b) => {
                self.scan_sym(a, best);
                self.scan_sym(b, best);
            }
            Bool::CostLe(r, _) => self.scan_real(r, best),
        }
    }

    fn scan_int(&self, t: &Int, best: &mut Option<(u8, u32)>) {
        match t {
            Int::Const(_) => {}
            Int::Var(v) => self.note(0, v.0, best),
            Int::Add(a, b) => {
                self.scan_int(a, best);
                self.scan_int(b, best);
            }
        }
    }

    fn scan_sym(&self, t: &Sym, best: &mut Option<(u8, u32)>) {
        match t {
            Sym::Const(_) => {}
            Sym::Var(v) => self.note(2, v.0, best),
            Sym::Ite(c, a, b) => {
                self.scan_bool(c, best);
                self.scan_sym(a, best);
                self.scan_sym(b, best);
            }
        }
    }

    fn scan_real(&self, t: &Real, best: &mut Option<(u8, u32)>) {
        match t {
            Real::Const(_) => {}
            Real::Scaled(_, i) => self.scan_int(i, best),
            Real::Gated(c, r) => {
                self.scan_bool(c, best);
                self.scan_real(r, best);
            }
            Real::Sum(xs) => {
                for x in xs {
                    self.scan_real(x, best);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Value {
    Bool(bool),
    Int(i64),
    Sym(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Bool, Int, IntVar, Real, Sym};

    fn solve(problem: &Problem) -> Outcome {
        DfsSolver::new().check(problem)
    }

    #[test]
    fn trivial_sat_and_unsat() {
        let mut p = Problem::new();
        let b = p.fresh_bool();
        p.require(Bool::Var(b));
        let m = solve(&p).model().unwrap();
        assert!(m.bool_value(b));

        let mut p = Problem::new();
        let b = p.fresh_bool();
        p.require(Bool::Var(b));
        p.require(Bool::Var(b).negated());
        assert!(matches!(solve(&p), Outcome::Unsat));
    }

    #[test]
    fn integer_addition_propagates() {
        let mut p = Problem::new();
        let a = p.fresh_int(0, 9);
        let b = p.fresh_int(0, 9);
        p.require(Bool::int_eq(Int::Var(a).plus(Int::Var(b)), Int::Const(5)));
        p.require(Bool::int_eq(a, Int::Const(2)));
        let m = solve(&p).model().unwrap();
        assert_eq!(m.int_value(a), 2);
        assert_eq!(m.int_value(b), 3);
    }

    #[test]
    fn inverted_range_is_unsat() {
        let mut p = Problem::new();
        let a = p.fresh_int(3, 1);
        p.require(Bool::int_eq(a, a));
        assert!(matches!(solve(&p), Outcome::Unsat));
    }

    #[test]
    fn sym_equalities_chain() {
        let mut p = Problem::new();
        let a = p.fresh_sym(38);
        let b = p.fresh_sym(38);
        p.require(Bool::sym_eq(a, Sym::Const(17)));
        p.require(Bool::sym_eq(b, a));
        let m = solve(&p).model().unwrap();
        assert_eq!(m.sym_value(b), 17);
    }

    #[test]
    fn ite_decides_its_condition() {
        let mut p = Problem::new();
        let cond = p.fresh_bool();
        let out = p.fresh_sym(4);
        let ite = Sym::ite(Bool::Var(cond), Sym::Const(2), Sym::Const(3));
        p.require(Bool::sym_eq(out, ite));
        p.require(Bool::sym_eq(out, Sym::Const(3)));
        let m = solve(&p).model().unwrap();
        assert!(!m.bool_value(cond));
    }

    #[test]
    fn guarded_implication() {
        let mut p = Problem::new();
        let len = p.fresh_int(0, 4);
        let slot = p.fresh_sym(38);
        p.require(Bool::int_gt(Int::Var(len), 2).implies(Bool::sym_eq(slot, Sym::Const(5))));
        p.require(Bool::int_eq(len, Int::Const(3)));
        let m = solve(&p).model().unwrap();
        assert_eq!(m.sym_value(slot), 5);
    }

    #[test]
    fn cost_bound_caps_lengths() {
        let mut p = Problem::new();
        let n = p.fresh_int(0, 9);
        p.require(Bool::int_gt(Int::Var(n), 1));
        p.require(Bool::CostLe(Real::Scaled(2.0, Int::Var(n)), 5.0));
        let m = solve(&p).model().unwrap();
        assert_eq!(m.int_value(n), 2);

        let mut p = Problem::new();
        let n = p.fresh_int(0, 9);
        p.require(Bool::int_gt(Int::Var(n), 3));
        p.require(Bool::CostLe(Real::Scaled(2.0, Int::Var(n)), 5.0));
        assert!(matches!(solve(&p), Outcome::Unsat));
    }

    #[test]
    fn gated_cost_disables_expensive_branch() {
        let mut p = Problem::new();
        let flag = p.fresh_bool();
        p.require(Bool::CostLe(
            Real::gated(Bool::Var(flag), Real::Const(10.0)),
            5.0,
        ));
        let m = solve(&p).model().unwrap();
        assert!(!m.bool_value(flag));
    }

    #[test]
    fn exhausted_budget_reports_unknown() {
        let mut p = Problem::new();
        let a = p.fresh_sym(10);
        let b = p.fresh_sym(10);
        p.require(Bool::sym_eq(a, b));
        let mut solver = DfsSolver::with_budget(SolverBudget {
            max_nodes: 0,
            max_time: None,
        });
        assert!(matches!(solver.check(&p), Outcome::Unknown));
    }

    #[test]
    fn model_respects_declared_ranges() {
        let mut p = Problem::new();
        let n = p.fresh_int(2, 6);
        let s = p.fresh_sym(3);
        p.require(Bool::int_eq(n, n));
        p.require(Bool::sym_eq(s, s));
        let m = solve(&p).model().unwrap();
        assert!((2..=6).contains(&m.int_value(n)));
        assert!(m.sym_value(s) < 3);
    }
}
