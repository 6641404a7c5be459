// Static feature member tables and their validated runtime form.
//
// The tables are authored once as symbol lists. `FeatureCatalog::new`
// parses them, checks the totality invariants and builds lookup maps;
// violations are configuration errors surfaced at startup.

use hashbrown::HashMap;

use crate::features::{FeatureDomain, Manner, Place, Sibilance, Voicing};
use crate::phoneme::{ALPHABET, Phoneme, PhonemeParseError};

// ---------------------------------------------------------------------------
// Authored member tables
// ---------------------------------------------------------------------------

const VOICED_MEMBERS: &str = "b m v D R d n z Z j l g N i I e E ae @ 2 A a 5 0 o U u";
const UNVOICED_MEMBERS: &str = "p f T t r s S w P h k";

const LABIAL_MEMBERS: &str = "p b f v m w";
const CORONAL_MEMBERS: &str = "r t d T D s z S Z n l";
const DORSAL_MEMBERS: &str = "k g h j N";

const STOP_MEMBERS: &str = "p b t d k g";
const FRICATIVE_MEMBERS: &str = "f v T D s z Z S h";
const NASAL_MEMBERS: &str = "m n N";
const LIQUID_MEMBERS: &str = "l r";
const GLIDE_MEMBERS: &str = "j w";

const SIBILANT_MEMBERS: &str = "s z S Z";

/// Configuration error in the feature tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown symbol in feature table: {0}")]
    UnknownSymbol(#[from] PhonemeParseError),

    #[error("phoneme {phoneme} appears in more than one {domain:?} entry")]
    OverlappingEntries {
        domain: FeatureDomain,
        phoneme: String,
    },

    #[error("phoneme {phoneme} is missing from the voicing partition")]
    VoicingGap { phoneme: String },
}

/// One guarded table entry: the value realized by a set of phonemes.
#[derive(Debug, Clone)]
pub struct FeatureEntry {
    /// Domain value index (never the domain's fallback value).
    pub value: u32,
    pub members: Vec<Phoneme>,
}

/// Validated, immutable feature tables.
///
/// Place/Manner/Sibilance lookups fall back to the domain's "none" value for
/// phonemes absent from every entry; voicing is total by partition.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    lookup: [HashMap<Phoneme, u32>; 4],
    overrides: [Vec<FeatureEntry>; 4],
}

fn parse_members(members: &str) -> Result<Vec<Phoneme>, CatalogError> {
    members
        .split_whitespace()
        .map(|s| Phoneme::from_symbol(s).map_err(CatalogError::from))
        .collect()
}

fn domain_slot(domain: FeatureDomain) -> usize {
    match domain {
        FeatureDomain::Voicing => 0,
        FeatureDomain::Place => 1,
        FeatureDomain::Manner => 2,
        FeatureDomain::Sibilance => 3,
    }
}

impl FeatureCatalog {
    /// Parse and validate the authored tables.
    pub fn new() -> Result<Self, CatalogError> {
        let tables: [(FeatureDomain, Vec<(u32, &str)>); 4] = [
            (
                FeatureDomain::Voicing,
                // Unvoiced is the declared structural default; only the
                // voiced entry becomes a guarded override.
                vec![(Voicing::Voiced.index(), VOICED_MEMBERS)],
            ),
            (
                FeatureDomain::Place,
                vec![
                    (Place::Labial.index(), LABIAL_MEMBERS),
                    (Place::Coronal.index(), CORONAL_MEMBERS),
                    (Place::Dorsal.index(), DORSAL_MEMBERS),
                ],
            ),
            (
                FeatureDomain::Manner,
                vec![
                    (Manner::Stop.index(), STOP_MEMBERS),
                    (Manner::Fricative.index(), FRICATIVE_MEMBERS),
                    (Manner::Nasal.index(), NASAL_MEMBERS),
                    (Manner::Liquid.index(), LIQUID_MEMBERS),
                    (Manner::Glide.index(), GLIDE_MEMBERS),
                ],
            ),
            (
                FeatureDomain::Sibilance,
                vec![(Sibilance::Sibilant.index(), SIBILANT_MEMBERS)],
            ),
        ];

        let mut lookup: [HashMap<Phoneme, u32>; 4] = Default::default();
        let mut overrides: [Vec<FeatureEntry>; 4] = Default::default();

        for (domain, entries) in tables {
            let slot = domain_slot(domain);
            for (value, members) in entries {
                let members = parse_members(members)?;
                for &p in &members {
                    if lookup[slot].insert(p, value).is_some() {
                        return Err(CatalogError::OverlappingEntries {
                            domain,
                            phoneme: p.symbol().to_string(),
                        });
                    }
                }
                overrides[slot].push(FeatureEntry { value, members });
            }
        }

        // Voicing must partition the alphabet: the unvoiced default entry
        // has to cover exactly the phonemes the voiced entry does not.
        let unvoiced = parse_members(UNVOICED_MEMBERS)?;
        let voicing = &mut lookup[domain_slot(FeatureDomain::Voicing)];
        for &p in &unvoiced {
            if voicing.insert(p, Voicing::Unvoiced.index()).is_some() {
                return Err(CatalogError::OverlappingEntries {
                    domain: FeatureDomain::Voicing,
                    phoneme: p.symbol().to_string(),
                });
            }
        }
        for i in 0..ALPHABET.len() {
            match Phoneme::from_index(i) {
                Some(p) if voicing.contains_key(&p) => {}
                _ => {
                    return Err(CatalogError::VoicingGap {
                        phoneme: ALPHABET[i].to_string(),
                    });
                }
            }
        }

        Ok(FeatureCatalog { lookup, overrides })
    }

    /// Value index of `phoneme` in `domain`, with the domain fallback.
    pub fn value_index(&self, domain: FeatureDomain, phoneme: Phoneme) -> u32 {
        self.lookup[domain_slot(domain)]
            .get(&phoneme)
            .copied()
            .unwrap_or_else(|| self.default_index(domain))
    }

    /// The structural default value of `domain`: the "none" value for
    /// Place/Manner/Sibilance, the declared `Unvoiced` default for Voicing.
    pub fn default_index(&self, domain: FeatureDomain) -> u32 {
        match domain {
            FeatureDomain::Voicing => Voicing::Unvoiced.index(),
            _ => 0,
        }
    }

    /// Guarded override entries of `domain`, in authored order.
    pub fn overrides(&self, domain: FeatureDomain) -> &[FeatureEntry] {
        &self.overrides[domain_slot(domain)]
    }

    pub fn voicing_of(&self, phoneme: Phoneme) -> Voicing {
        Voicing::from_index(self.value_index(FeatureDomain::Voicing, phoneme))
    }

    pub fn place_of(&self, phoneme: Phoneme) -> Place {
        Place::from_index(self.value_index(FeatureDomain::Place, phoneme))
    }

    pub fn manner_of(&self, phoneme: Phoneme) -> Manner {
        Manner::from_index(self.value_index(FeatureDomain::Manner, phoneme))
    }

    pub fn sibilance_of(&self, phoneme: Phoneme) -> Sibilance {
        Sibilance::from_index(self.value_index(FeatureDomain::Sibilance, phoneme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FeatureCatalog {
        FeatureCatalog::new().unwrap()
    }

    fn p(symbol: &str) -> Phoneme {
        Phoneme::from_symbol(symbol).unwrap()
    }

    #[test]
    fn tables_validate() {
        assert!(FeatureCatalog::new().is_ok());
    }

    #[test]
    fn place_falls_back_to_none() {
        let c = catalog();
        assert_eq!(c.place_of(p("i")), Place::NoPlace);
        assert_eq!(c.place_of(p("p")), Place::Labial);
        assert_eq!(c.place_of(p("s")), Place::Coronal);
        assert_eq!(c.place_of(p("k")), Place::Dorsal);
    }

    #[test]
    fn manner_and_sibilance_lookups() {
        let c = catalog();
        assert_eq!(c.manner_of(p("t")), Manner::Stop);
        assert_eq!(c.manner_of(p("z")), Manner::Fricative);
        assert_eq!(c.manner_of(p("a")), Manner::NoManner);
        assert_eq!(c.sibilance_of(p("S")), Sibilance::Sibilant);
        assert_eq!(c.sibilance_of(p("t")), Sibilance::NoSibilant);
    }

    #[test]
    fn voicing_partitions_the_alphabet() {
        let c = catalog();
        let mut voiced = 0;
        let mut unvoiced = 0;
        for i in 0..ALPHABET.len() {
            match c.voicing_of(Phoneme::from_index(i).unwrap()) {
                Voicing::Voiced => voiced += 1,
                Voicing::Unvoiced => unvoiced += 1,
            }
        }
        assert_eq!(voiced + unvoiced, ALPHABET.len());
        assert_eq!(unvoiced, 11);
    }

    #[test]
    fn vowels_are_voiced() {
        let c = catalog();
        for sym in ["i", "e", "a", "o", "u", "ae"] {
            assert_eq!(c.voicing_of(p(sym)), Voicing::Voiced, "{sym}");
        }
    }

    #[test]
    fn overrides_never_carry_the_fallback_value() {
        let c = catalog();
        for domain in FeatureDomain::ALL {
            for entry in c.overrides(domain) {
                assert_ne!(entry.value, c.default_index(domain));
            }
        }
    }
}
