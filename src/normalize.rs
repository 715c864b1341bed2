use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold a word to the form compared against the player's guess:
/// lower case, diacritics removed ("Rivière" -> "riviere").
pub fn normalize(s: &str) -> String {
    // lower-case first: some upper-case letters lower to a base + combining mark
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
