//! String collation for sort keys.
//!
//! The order compiler never compares strings byte-wise on its own; it asks a
//! [`Collation`]. The default, [`FoldedCollation`], ignores case and
//! diacritics so that `"élan"`, `"Elan"` and `"elan"` sort together.

use std::cmp::Ordering;
use std::fmt::Debug;

use deunicode::deunicode_char;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strategy for comparing two strings in a sort.
pub trait Collation: Debug + Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Case- and diacritic-insensitive collation.
///
/// Both sides are decomposed (NFD), stripped of combining marks and
/// lowercased, so letters with marks sort with their base letter. Latin
/// letters that have no decomposition (`ß`, `ø`, `ł`) are spelled out in
/// ASCII with `deunicode`. Letters of other scripts are kept as they are and
/// compare by code point, so distinct letters never fold together.
/// Strings equal after folding compare `Equal`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldedCollation;

impl FoldedCollation {
    /// Returns the folded form used as the comparison key.
    pub fn key(s: &str) -> String {
        let mut key = String::with_capacity(s.len());
        for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
            match deunicode_char(c).filter(|_| is_extended_latin(c)) {
                Some(ascii) => key.extend(ascii.chars().map(|a| a.to_ascii_lowercase())),
                None => key.extend(c.to_lowercase()),
            }
        }
        key
    }
}

/// Latin-1 Supplement through Latin Extended-B, and Latin Extended Additional.
fn is_extended_latin(c: char) -> bool {
    matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

impl Collation for FoldedCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        FoldedCollation::key(a).cmp(&FoldedCollation::key(b))
    }
}

/// Byte-wise (code point) collation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalCollation;

impl Collation for OrdinalCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folded_ignores_case() {
        let c = FoldedCollation;
        assert_eq!(c.compare("apple", "APPLE"), Ordering::Equal);
        assert_eq!(c.compare("apple", "Banana"), Ordering::Less);
        assert_eq!(c.compare("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn folded_ignores_diacritics() {
        let c = FoldedCollation;
        assert_eq!(c.compare("élan", "Elan"), Ordering::Equal);
        assert_eq!(c.compare("Ångström", "angstrom"), Ordering::Equal);
        assert_eq!(c.compare("über", "uber"), Ordering::Equal);
        // "é" sorts with "e", before "f"
        assert_eq!(c.compare("étude", "fable"), Ordering::Less);
    }

    #[test]
    fn folded_spells_out_undecomposable_latin() {
        assert_eq!(FoldedCollation::key("Straße"), "strasse");
        assert_eq!(FoldedCollation::key("Łódź"), "lodz");
        assert_eq!(FoldedCollation::key("Ørsted"), "orsted");
    }

    #[test]
    fn folded_keeps_distinct_letters_of_other_scripts() {
        let c = FoldedCollation;
        assert_ne!(c.compare("سبر", "صبر"), Ordering::Equal);
        assert_eq!(c.compare("جان", "چای"), Ordering::Less);
        assert_eq!(FoldedCollation::key("جان"), "جان");
        assert_eq!(c.compare("Ωμέγα", "ωμεγα"), Ordering::Equal);
        // Harakat are combining marks
        assert_eq!(c.compare("كَتَبَ", "كتب"), Ordering::Equal);
    }

    #[test]
    fn ordinal_is_byte_order() {
        let c = OrdinalCollation;
        assert_eq!(c.compare("Zebra", "apple"), Ordering::Less);
        assert_eq!(c.compare("élan", "fable"), Ordering::Greater);
    }
}
