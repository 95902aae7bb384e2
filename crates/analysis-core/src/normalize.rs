//! Text normalization.
//!
//! # Steps
//!
//! 1. **Lowercase** the whole input.
//! 2. **URLs** starting with a scheme (`http://`, `https://`, `ftp://`) or
//!    `www.` are removed up to the next whitespace.
//! 3. **Mentions and hashtags** (`@name`, `#tag`) are removed as one
//!    contiguous word-character run.
//! 4. **Non-letters**: anything outside `[a-z]` and whitespace is dropped.
//! 5. **Whitespace** runs collapse to a single space; the ends are trimmed.
//!
//! The output alphabet is `[a-z ]`, so a second pass changes nothing.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

const URL_PATTERN: &str = r"(?:(?:https?|ftp)://|www\.)\S+";
const TAG_PATTERN: &str = r"[@#]\w+";
const NON_LETTER_PATTERN: &str = r"[^a-z\s]+";
const WHITESPACE_PATTERN: &str = r"\s+";

/// Text that has been through [`normalize`].
///
/// Contains only lowercase ASCII letters separated by single spaces, with
/// no leading or trailing space. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|w| !w.is_empty())
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compiled cleaning patterns.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    url: Regex,
    tag: Regex,
    non_letter: Regex,
    whitespace: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            url: Regex::new(URL_PATTERN).expect("URL pattern compiles"),
            tag: Regex::new(TAG_PATTERN).expect("tag pattern compiles"),
            non_letter: Regex::new(NON_LETTER_PATTERN).expect("letter pattern compiles"),
            whitespace: Regex::new(WHITESPACE_PATTERN).expect("whitespace pattern compiles"),
        }
    }

    /// Clean one piece of text. Never fails.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let lower = raw.to_lowercase();
        let no_urls = self.url.replace_all(&lower, "");
        let no_tags = self.tag.replace_all(&no_urls, "");
        let letters = self.non_letter.replace_all(&no_tags, "");
        let collapsed = self.whitespace.replace_all(&letters, " ");
        NormalizedText(collapsed.trim().to_string())
    }
}

/// Normalize with a process-wide [`TextNormalizer`].
pub fn normalize(raw: &str) -> NormalizedText {
    static NORMALIZER: OnceLock<TextNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(TextNormalizer::new).normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_end_to_end_example() {
        assert_eq!(
            normalize("I LOVE this! http://x.co @bob #great").as_str(),
            "i love this"
        );
    }

    #[test]
    fn test_urls_removed() {
        assert_eq!(
            normalize("see https://example.com/a?b=c and www.test.org/x now").as_str(),
            "see and now"
        );
        assert_eq!(normalize("ftp://files.example.com").as_str(), "");
    }

    #[test]
    fn test_mentions_and_hashtags_removed() {
        assert_eq!(normalize("@alice thanks #blessed_day!").as_str(), "thanks");
        assert_eq!(normalize("a#b c").as_str(), "a c");
    }

    #[test]
    fn test_digits_and_punctuation_dropped() {
        assert_eq!(normalize("5 stars!!! 10/10").as_str(), "stars");
        assert_eq!(normalize("don't").as_str(), "dont");
    }

    #[test]
    fn test_non_ascii_letters_dropped() {
        assert_eq!(normalize("Café très BIEN").as_str(), "caf trs bien");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize("  a \t\n b   c  ").as_str(), "a b c");
        assert_eq!(normalize("   ").as_str(), "");
        assert_eq!(normalize("").as_str(), "");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(normalize("one two  three").word_count(), 3);
        assert_eq!(normalize("!!!").word_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_idempotent(input in any::<String>()) {
            let once = normalize(&input);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_output_alphabet(input in any::<String>()) {
            let out = normalize(&input);
            let s = out.as_str();
            prop_assert!(s.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
            prop_assert!(!s.starts_with(' '));
            prop_assert!(!s.ends_with(' '));
            prop_assert!(!s.contains("  "));
        }

        #[test]
        fn prop_urlish_input_idempotent(
            input in r"(https?://|www\.|@|#)?[A-Za-z0-9 .:/@#!?,]{0,40}"
        ) {
            let once = normalize(&input);
            prop_assert_eq!(normalize(once.as_str()), once);
        }
    }
}
