//! Spanish-aware ordering of district names.
//!
//! Lima district names carry accents (`Jesús María`, `Breña`) and are not
//! consistently capitalized across exports. Names are compared on a folded
//! key first so `Breña` sorts between `Barranco` and `Chorrillos`, and the
//! raw strings break ties so the ordering stays total.

use std::cmp::Ordering;

/// Folds a character to its base letter for collation.
const fn fold(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Builds the collation key of a name: lowercase with accents folded.
#[must_use]
pub fn collation_key(name: &str) -> String {
    name.trim().chars().flat_map(char::to_lowercase).map(fold).collect()
}

/// Compares two names under the collation order.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert_eq!(collation_key("Jesús María"), "jesus maria");
        assert_eq!(collation_key("BREÑA"), "brena");
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut names = vec!["Chorrillos", "Breña", "Barranco", "ate", "Jesús María", "Lince"];
        names.sort_by(|a, b| compare(a, b));
        assert_eq!(
            names,
            vec!["ate", "Barranco", "Breña", "Chorrillos", "Jesús María", "Lince"]
        );
    }

    #[test]
    fn equal_keys_fall_back_to_raw_order() {
        assert_eq!(compare("Surco", "Surco"), Ordering::Equal);
        assert_ne!(compare("Jesus Maria", "Jesús María"), Ordering::Equal);
    }
}
