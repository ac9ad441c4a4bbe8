//! Text preprocessing — claim cleaning, keyword extraction, tokenization.
//!
//! Cleaning keeps ASCII letters and the Tamil Unicode block so that both
//! English and Tamil claims survive normalization.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Default number of keywords used to build search queries.
pub const DEFAULT_KEYWORD_LIMIT: usize = 6;

/// English stopwords (alphabetic entries of the NLTK English list).
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"http\S+").unwrap())
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z\x{0B80}-\x{0BFF}\s]").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// A word is a run of letters, combining marks and digits. Marks must stay
/// inside the word: Tamil vowel signs and the virama are `\p{M}`.
fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{M}\p{N}]+").unwrap())
}

fn alphabetic_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\p{L}[\p{L}\p{M}]*$").unwrap())
}

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOPWORDS.iter().copied().collect())
}

/// Whether `word` (already lowercase) is an English stopword.
pub fn is_stopword(word: &str) -> bool {
    stopwords().contains(word)
}

/// Normalize a claim: lowercase, strip URLs, drop everything except
/// English/Tamil letters and whitespace, collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let no_urls = url_re().replace_all(&lower, "");
    let letters_only = disallowed_re().replace_all(&no_urls, "");
    whitespace_re()
        .replace_all(&letters_only, " ")
        .trim()
        .to_string()
}

/// Split into lowercase word tokens.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    word_re().find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// Extract up to `limit` search keywords: alphabetic, non-stopword tokens in
/// order of appearance.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    words(text)
        .filter(|w| alphabetic_word_re().is_match(w))
        .filter(|w| !is_stopword(w))
        .take(limit)
        .collect()
}

/// Tokens used by the classifier: cleaned words without stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    clean_text(text)
        .split(' ')
        .filter(|w| !w.is_empty() && !is_stopword(w))
        .map(String::from)
        .collect()
}
