//! Text normalization into comparable word tokens.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Maximal runs of Unicode letters, digits, marks and underscore.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is a valid regex"));

/// Lowercases `text` and returns its distinct word tokens.
///
/// Frequency is ignored. No stopword removal or stemming is applied, and
/// non-Latin scripts (Hangul, Kana, Cyrillic, ...) tokenize like Latin text.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|token| token.as_str().to_string())
        .collect()
}
