// Categorical feature domains.
//
// Place, Manner and Sibilance each carry a designated "none" fallback value
// at discriminant 0; Voicing has no fallback and must partition the
// alphabet. Discriminants double as solver enumeration values.

/// The four phonological feature domains a guard may test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureDomain {
    Voicing,
    Place,
    Manner,
    Sibilance,
}

impl FeatureDomain {
    /// All domains, in guard rendering order.
    pub const ALL: [FeatureDomain; 4] = [
        FeatureDomain::Voicing,
        FeatureDomain::Place,
        FeatureDomain::Manner,
        FeatureDomain::Sibilance,
    ];

    /// Number of values in this domain.
    pub fn cardinality(self) -> u32 {
        match self {
            FeatureDomain::Voicing => 2,
            FeatureDomain::Place => 4,
            FeatureDomain::Manner => 6,
            FeatureDomain::Sibilance => 2,
        }
    }

    /// Whether discriminant 0 is the domain's "none" fallback value.
    pub fn has_none_value(self) -> bool {
        !matches!(self, FeatureDomain::Voicing)
    }

    /// Display label for a value of this domain.
    pub fn value_label(self, value: u32) -> &'static str {
        match self {
            FeatureDomain::Voicing => Voicing::from_index(value).label(),
            FeatureDomain::Place => Place::from_index(value).label(),
            FeatureDomain::Manner => Manner::from_index(value).label(),
            FeatureDomain::Sibilance => Sibilance::from_index(value).label(),
        }
    }
}

/// Voicing: two values covering the whole alphabet between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voicing {
    Voiced,
    Unvoiced,
}

impl Voicing {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(value: u32) -> Self {
        match value {
            0 => Voicing::Voiced,
            _ => Voicing::Unvoiced,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Voicing::Voiced => "VOICED",
            Voicing::Unvoiced => "UNVOICED",
        }
    }
}

/// Place of articulation, `NoPlace` for phonemes in no place class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Place {
    NoPlace,
    Labial,
    Coronal,
    Dorsal,
}

impl Place {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(value: u32) -> Self {
        match value {
            1 => Place::Labial,
            2 => Place::Coronal,
            3 => Place::Dorsal,
            _ => Place::NoPlace,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Place::NoPlace => "NoPlace",
            Place::Labial => "LABIAL",
            Place::Coronal => "CORONAL",
            Place::Dorsal => "DORSAL",
        }
    }
}

/// Manner of articulation, `NoManner` for phonemes in no manner class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manner {
    NoManner,
    Stop,
    Fricative,
    Nasal,
    Liquid,
    Glide,
}

impl Manner {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(value: u32) -> Self {
        match value {
            1 => Manner::Stop,
            2 => Manner::Fricative,
            3 => Manner::Nasal,
            4 => Manner::Liquid,
            5 => Manner::Glide,
            _ => Manner::NoManner,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Manner::NoManner => "NoManner",
            Manner::Stop => "STOP",
            Manner::Fricative => "FRICATIVE",
            Manner::Nasal => "NASAL",
            Manner::Liquid => "LIQUID",
            Manner::Glide => "GLIDE",
        }
    }
}

/// Sibilance: either sibilant or the `NoSibilant` fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sibilance {
    NoSibilant,
    Sibilant,
}

impl Sibilance {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(value: u32) -> Self {
        match value {
            1 => Sibilance::Sibilant,
            _ => Sibilance::NoSibilant,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sibilance::NoSibilant => "NoSibilant",
            Sibilance::Sibilant => "SIBILANT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_round_trip() {
        for v in 0..FeatureDomain::Place.cardinality() {
            assert_eq!(Place::from_index(v).index(), v);
        }
        for v in 0..FeatureDomain::Manner.cardinality() {
            assert_eq!(Manner::from_index(v).index(), v);
        }
        assert_eq!(Voicing::from_index(0), Voicing::Voiced);
        assert_eq!(Voicing::from_index(1), Voicing::Unvoiced);
        assert_eq!(Sibilance::from_index(1), Sibilance::Sibilant);
    }

    #[test]
    fn none_values_sit_at_zero() {
        assert_eq!(Place::NoPlace.index(), 0);
        assert_eq!(Manner::NoManner.index(), 0);
        assert_eq!(Sibilance::NoSibilant.index(), 0);
        assert!(!FeatureDomain::Voicing.has_none_value());
        assert!(FeatureDomain::Place.has_none_value());
    }

    #[test]
    fn labels() {
        assert_eq!(FeatureDomain::Voicing.value_label(1), "UNVOICED");
        assert_eq!(FeatureDomain::Manner.value_label(2), "FRICATIVE");
        assert_eq!(FeatureDomain::Sibilance.value_label(1), "SIBILANT");
    }
}
