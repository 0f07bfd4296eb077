//! Sentence Validation
//!
//! Checks that a generated sentence actually contains every target word.
//! Generation services paraphrase, inflect, and drop diacritics, so matching
//! runs four strategies in order of leniency:
//!
//! 1. exact case-insensitive match at a token boundary
//! 2. the same match after stripping diacritics ("está" matches "esta")
//! 3. plain substring containment
//! 4. fuzzy stem match on the first ~70% of characters, tolerating inflection
//!
//! A word fails only when all four strategies miss.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters that delimit tokens for boundary matching
fn is_token_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '"' | '\'' | '(' | ')' | '[' | ']')
}

/// Strip diacritics: NFD-decompose, then drop combining marks
///
/// "não" → "nao", "está" → "esta"
pub(crate) fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Whether `needle` occurs in `haystack` delimited by token boundaries
///
/// Both inputs must already be lowercased. Multi-word needles match as a
/// whole phrase.
fn contains_at_token_boundary(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();

        let boundary_before = begin == 0
            || haystack[..begin].chars().next_back().is_some_and(is_token_boundary);
        let boundary_after =
            end == haystack.len() || haystack[end..].chars().next().is_some_and(is_token_boundary);

        if boundary_before && boundary_after {
            return true;
        }
        // Advance past this occurrence on a char boundary
        start = begin + needle.chars().next().map_or(1, |c| c.len_utf8());
        if start >= haystack.len() {
            break;
        }
    }
    false
}

/// Stem prefix: first `max(3, 70%)` characters
fn stem_of(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let stem_len = ((chars.len() as f64 * 0.7).floor() as usize).max(3).min(chars.len());
    chars[..stem_len].iter().collect()
}

/// Whether one target word appears in the sentence under any strategy
fn sentence_contains_word(sentence_lower: &str, sentence_stripped: &str, word: &str) -> bool {
    let word_lower = word.to_lowercase();
    let word_stripped = strip_diacritics(&word_lower);

    // Strategy 1: exact token-boundary match
    if contains_at_token_boundary(sentence_lower, &word_lower) {
        return true;
    }

    // Strategy 2: token-boundary match without diacritics
    if contains_at_token_boundary(sentence_stripped, &word_stripped) {
        return true;
    }

    // Strategy 3: plain substring containment
    if sentence_lower.contains(&word_lower) || sentence_stripped.contains(&word_stripped) {
        return true;
    }

    // Strategy 4: fuzzy stem match for inflected forms
    let stem = stem_of(&word_lower);
    let stem_stripped = stem_of(&word_stripped);
    sentence_lower.contains(&stem) || sentence_stripped.contains(&stem_stripped)
}

/// Validate that a sentence contains all target words
///
/// Vacuously true for an empty target list.
pub fn sentence_contains_words<S: AsRef<str>>(sentence: &str, target_words: &[S]) -> bool {
    let sentence_lower = sentence.to_lowercase();
    let sentence_stripped = strip_diacritics(&sentence_lower);

    target_words
        .iter()
        .all(|word| sentence_contains_word(&sentence_lower, &sentence_stripped, word.as_ref()))
}
