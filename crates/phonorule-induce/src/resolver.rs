// Symbolic feature resolution: a nested conditional over the catalog's
// member tables, one override entry per guard, the domain's declared
// default innermost. For Place/Manner/Sibilance the default is the "none"
// value; for Voicing it is the declared Unvoiced default, with the voiced
// member set as the single guarded override.

use phonorule_core::FeatureDomain;
use phonorule_smt::{Bool, Sym, SymVar};

use crate::session::Session;

/// Variable equal to the feature value of `phoneme` in `domain`.
pub fn resolve(session: &mut Session<'_>, phoneme: SymVar, domain: FeatureDomain) -> SymVar {
    let default = session.catalog().default_index(domain);
    let mut expr = Sym::Const(default);
    for entry in session.catalog().overrides(domain) {
        let membership = Bool::Or(
            entry
                .members
                .iter()
                .map(|p| Bool::sym_eq(phoneme, Sym::Const(p.index() as u32)))
                .collect(),
        );
        expr = Sym::ite(membership, Sym::Const(entry.value), expr);
    }
    let value = session.problem.fresh_sym(domain.cardinality());
    session.problem.require(Bool::sym_eq(value, expr));
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonorule_core::{ALPHABET, FeatureCatalog, Phoneme};
    use phonorule_smt::{DfsSolver, Solver};

    fn resolve_concrete(symbol: &str, domain: FeatureDomain) -> u32 {
        let catalog = FeatureCatalog::new().unwrap();
        let mut s = Session::new(&catalog, 1);
        let p = s.problem.fresh_sym(ALPHABET.len() as u32);
        let phoneme = Phoneme::from_symbol(symbol).unwrap();
        s.problem
            .require(Bool::sym_eq(p, Sym::Const(phoneme.index() as u32)));
        let value = resolve(&mut s, p, domain);
        let model = DfsSolver::new().check(&s.problem).model().unwrap();
        model.sym_value(value)
    }

    #[test]
    fn symbolic_resolution_matches_concrete_lookup() {
        let catalog = FeatureCatalog::new().unwrap();
        for symbol in ["p", "i", "s", "k", "w", "ae", "N"] {
            let phoneme = Phoneme::from_symbol(symbol).unwrap();
            for domain in FeatureDomain::ALL {
                assert_eq!(
                    resolve_concrete(symbol, domain),
                    catalog.value_index(domain, phoneme),
                    "{symbol} {domain:?}"
                );
            }
        }
    }

    #[test]
    fn place_none_only_for_unlisted_phonemes() {
        use phonorule_core::Place;
        assert_eq!(
            resolve_concrete("i", FeatureDomain::Place),
            Place::NoPlace.index()
        );
        assert_eq!(
            resolve_concrete("p", FeatureDomain::Place),
            Place::Labial.index()
        );
    }

    #[test]
    fn voicing_is_total() {
        use phonorule_core::Voicing;
        assert_eq!(
            resolve_concrete("a", FeatureDomain::Voicing),
            Voicing::Voiced.index()
        );
        assert_eq!(
            resolve_concrete("t", FeatureDomain::Voicing),
            Voicing::Unvoiced.index()
        );
    }
}
