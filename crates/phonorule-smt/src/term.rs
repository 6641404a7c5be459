// Variable ids and the constraint expression AST.
//
// Three variable sorts exist: booleans, bounded integers and finite
// enumerations ("sym" variables, used for phonemes, feature values and
// alternative selections). Real-valued terms appear only in cost bounds and
// are always functions of the other sorts, never free variables.

/// Boolean variable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolVar(pub u32);

/// Bounded integer variable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntVar(pub u32);

/// Finite-enumeration variable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymVar(pub u32);

/// Integer terms.
#[derive(Debug, Clone)]
pub enum Int {
    Const(i64),
    Var(IntVar),
    Add(Box<Int>, Box<Int>),
}

impl Int {
    pub fn plus(self, other: Int) -> Int {
        Int::Add(Box::new(self), Box::new(other))
    }
}

impl From<IntVar> for Int {
    fn from(v: IntVar) -> Self {
        Int::Var(v)
    }
}

/// Enumeration terms. `Ite` makes table-driven resolution expressible as a
/// nested conditional.
#[derive(Debug, Clone)]
pub enum Sym {
    Const(u32),
    Var(SymVar),
    Ite(Box<Bool>, Box<Sym>, Box<Sym>),
}

impl Sym {
    pub fn ite(cond: Bool, then: Sym, otherwise: Sym) -> Sym {
        Sym::Ite(Box::new(cond), Box::new(then), Box::new(otherwise))
    }
}

impl From<SymVar> for Sym {
    fn from(v: SymVar) -> Self {
        Sym::Var(v)
    }
}

/// Real-valued cost terms. `Gated` contributes its inner value only when the
/// condition holds, which lets derivation costs follow alternative selection.
#[derive(Debug, Clone)]
pub enum Real {
    Const(f64),
    /// `coefficient * int_term`.
    Scaled(f64, Int),
    Gated(Box<Bool>, Box<Real>),
    Sum(Vec<Real>),
}

impl Real {
    pub fn gated(cond: Bool, value: Real) -> Real {
        Real::Gated(Box::new(cond), Box::new(value))
    }
}

/// Boolean constraints.
#[derive(Debug, Clone)]
pub enum Bool {
    Const(bool),
    Var(BoolVar),
    Not(Box<Bool>),
    And(Vec<Bool>),
    Or(Vec<Bool>),
    Implies(Box<Bool>, Box<Bool>),
    IntEq(Int, Int),
    IntLe(Int, Int),
    SymEq(Sym, Sym),
    /// Upper bound on a cost term: `real <= bound`.
    CostLe(Real, f64),
}

impl Bool {
    pub fn negated(self) -> Bool {
        Bool::Not(Box::new(self))
    }

    pub fn implies(self, conclusion: Bool) -> Bool {
        Bool::Implies(Box::new(self), Box::new(conclusion))
    }

    /// `lhs > k` over integer terms.
    pub fn int_gt(lhs: Int, k: i64) -> Bool {
        Bool::IntLe(Int::Const(k + 1), lhs)
    }

    pub fn int_eq(lhs: impl Into<Int>, rhs: impl Into<Int>) -> Bool {
        Bool::IntEq(lhs.into(), rhs.into())
    }

    pub fn sym_eq(lhs: impl Into<Sym>, rhs: impl Into<Sym>) -> Bool {
        Bool::SymEq(lhs.into(), rhs.into())
    }
}

impl From<BoolVar> for Bool {
    fn from(v: BoolVar) -> Self {
        Bool::Var(v)
    }
}
