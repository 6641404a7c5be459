// Phoneme alphabet: symbol-to-index and index-to-symbol mapping.
//
// The alphabet is a fixed inventory of 38 broad-transcription symbols
// (consonants, vowels and the diphthong-like "ae"). A phoneme is identity
// only; all phonological knowledge lives in the feature catalog.

use std::fmt;

/// The fixed phoneme inventory. Index order is load-bearing: solver
/// enumeration variables range over `0..ALPHABET.len()` with these meanings.
pub const ALPHABET: &[&str] = &[
    "p", "b", "m", "f", "v", "T", "D", "R", "t", "d", "n", "r", "s", "z", "l", "S", "Z", "j", "k",
    "w", "g", "N", "P", "h", "i", "I", "e", "E", "ae", "@", "2", "A", "a", "5", "0", "o", "U", "u",
];

/// Error for unknown phoneme symbols in input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phoneme symbol: {symbol:?}")]
pub struct PhonemeParseError {
    pub symbol: String,
}

/// One atomic speech-sound symbol from [`ALPHABET`], stored as its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Phoneme(u8);

impl Phoneme {
    /// Look up a phoneme by its symbol string.
    pub fn from_symbol(symbol: &str) -> Result<Self, PhonemeParseError> {
        ALPHABET
            .iter()
            .position(|s| *s == symbol)
            .map(|i| Phoneme(i as u8))
            .ok_or_else(|| PhonemeParseError {
                symbol: symbol.to_string(),
            })
    }

    /// Phoneme for an alphabet index, or `None` when out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < ALPHABET.len() {
            Some(Phoneme(index as u8))
        } else {
            None
        }
    }

    /// Alphabet index of this phoneme.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Symbol string of this phoneme.
    pub fn symbol(self) -> &'static str {
        ALPHABET[self.0 as usize]
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Parse a surface form into phonemes.
///
/// Two input conventions are accepted:
/// - space-separated symbol tokens (`"k a t"`, `"w i S ae"`), the only way
///   to spell multi-character symbols;
/// - a spaceless string read one character per phoneme (`"kat"`).
pub fn parse_form(text: &str) -> Result<Vec<Phoneme>, PhonemeParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if text.contains(' ') {
        text.split_whitespace().map(Phoneme::from_symbol).collect()
    } else {
        text.chars()
            .map(|c| Phoneme::from_symbol(&c.to_string()))
            .collect()
    }
}

/// Format phonemes back into a surface form. Uses the compact spelling when
/// every symbol is a single character, space-separated tokens otherwise.
pub fn format_form(phonemes: &[Phoneme]) -> String {
    let compact = phonemes.iter().all(|p| p.symbol().len() == 1);
    let sep = if compact { "" } else { " " };
    phonemes
        .iter()
        .map(|p| p.symbol())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_38_distinct_symbols() {
        assert_eq!(ALPHABET.len(), 38);
        for (i, s) in ALPHABET.iter().enumerate() {
            assert_eq!(ALPHABET.iter().position(|t| t == s), Some(i));
        }
    }

    #[test]
    fn symbol_round_trip() {
        for (i, s) in ALPHABET.iter().enumerate() {
            let p = Phoneme::from_symbol(s).unwrap();
            assert_eq!(p.index(), i);
            assert_eq!(p.symbol(), *s);
        }
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let err = Phoneme::from_symbol("x").unwrap_err();
        assert_eq!(err.symbol, "x");
    }

    #[test]
    fn from_index_bounds() {
        assert!(Phoneme::from_index(0).is_some());
        assert!(Phoneme::from_index(ALPHABET.len() - 1).is_some());
        assert!(Phoneme::from_index(ALPHABET.len()).is_none());
    }

    #[test]
    fn parse_compact_and_spaced() {
        let compact = parse_form("kat").unwrap();
        let spaced = parse_form("k a t").unwrap();
        assert_eq!(compact, spaced);
        assert_eq!(format_form(&compact), "kat");
    }

    #[test]
    fn parse_multi_char_symbol() {
        let form = parse_form("k ae t").unwrap();
        assert_eq!(form.len(), 3);
        assert_eq!(form[1].symbol(), "ae");
        assert_eq!(format_form(&form), "k ae t");
    }

    #[test]
    fn empty_form() {
        assert_eq!(parse_form("").unwrap(), Vec::new());
        assert_eq!(format_form(&[]), "");
    }
}
