// Problem builder: variable declarations plus asserted constraints.

use crate::term::{Bool, BoolVar, IntVar, SymVar};

/// One satisfiability query under construction. All declarations for a
/// search attempt are issued before the single solver call.
#[derive(Debug, Default)]
pub struct Problem {
    bool_count: u32,
    int_ranges: Vec<(i64, i64)>,
    sym_domains: Vec<u32>,
    asserts: Vec<Bool>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_bool(&mut self) -> BoolVar {
        let v = BoolVar(self.bool_count);
        self.bool_count += 1;
        v
    }

    /// Fresh integer constrained to `lo..=hi`. An inverted range is an
    /// immediately infeasible declaration, kept as-is so the solver reports
    /// unsat rather than panicking.
    pub fn fresh_int(&mut self, lo: i64, hi: i64) -> IntVar {
        self.int_ranges.push((lo, hi));
        IntVar(self.int_ranges.len() as u32 - 1)
    }

    /// Fresh enumeration variable over values `0..domain`.
    pub fn fresh_sym(&mut self, domain: u32) -> SymVar {
        self.sym_domains.push(domain);
        SymVar(self.sym_domains.len() as u32 - 1)
    }

    pub fn require(&mut self, constraint: Bool) {
        self.asserts.push(constraint);
    }

    pub fn bool_count(&self) -> u32 {
        self.bool_count
    }

    pub fn int_range(&self, v: IntVar) -> (i64, i64) {
        self.int_ranges[v.0 as usize]
    }

    pub fn int_count(&self) -> usize {
        self.int_ranges.len()
    }

    pub fn sym_domain(&self, v: SymVar) -> u32 {
        self.sym_domains[v.0 as usize]
    }

    pub fn sym_count(&self) -> usize {
        self.sym_domains.len()
    }

    pub fn asserts(&self) -> &[Bool] {
        &self.asserts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_variables_are_numbered() {
        let mut p = Problem::new();
        assert_eq!(p.fresh_bool(), BoolVar(0));
        assert_eq!(p.fresh_bool(), BoolVar(1));
        let i = p.fresh_int(0, 9);
        assert_eq!(p.int_range(i), (0, 9));
        let s = p.fresh_sym(38);
        assert_eq!(p.sym_domain(s), 38);
        assert_eq!(p.bool_count(), 2);
        assert_eq!(p.int_count(), 1);
        assert_eq!(p.sym_count(), 1);
    }

    #[test]
    fn asserts_accumulate() {
        let mut p = Problem::new();
        let b = p.fresh_bool();
        p.require(Bool::Var(b));
        p.require(Bool::Const(true));
        assert_eq!(p.asserts().len(), 2);
    }
}
