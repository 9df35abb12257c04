//! Name normalization for duplicate comparison

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Anything outside the letter (L*) and decimal digit (Nd) categories
    static ref NON_LETTER_DIGIT: Regex = Regex::new(r"[^\p{L}\p{Nd}]+").unwrap();
}

/// Normalize a name for comparison
///
/// - Composes to NFC so combining accents stay attached to their letter
/// - Converts to lowercase (Unicode-aware)
/// - Replaces every non letter/digit with a space
/// - Collapses whitespace and trims
///
/// Total: any input, including the empty string, yields a string.
pub fn normalize(name: &str) -> String {
    let lowered: String = name.nfc().flat_map(char::to_lowercase).collect();
    let replaced = NON_LETTER_DIGIT.replace_all(&lowered, " ");

    collapse_whitespace(&replaced)
}

/// Split a name into its normalized tokens
pub fn tokenize(name: &str) -> Vec<String> {
    normalize(name)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Re-join tokens with single spaces.
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reverse the token order of an already-normalized name.
pub(crate) fn reverse_tokens(normalized: &str) -> String {
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.reverse();
    join_tokens(&tokens)
}

/// Collapse whitespace runs into a single space, dropping leading/trailing space
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for word in s.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }

    result
}
