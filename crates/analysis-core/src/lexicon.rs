//! Lexicon-based polarity scoring.
//!
//! Each known word carries a polarity in `[-1, 1]`. A negation flips and
//! halves the next sentiment word within a short window; an intensifier
//! scales the word right after it. The text's polarity is the mean over
//! matched words, clamped to `[-1, 1]`, or `0.0` when nothing matched.

use std::collections::HashMap;

use crate::normalize::normalize;
use crate::scorer::PolarityScorer;

/// How many words a negation reaches forward.
const NEGATION_WINDOW: usize = 3;

/// Factor applied to a negated word's polarity.
const NEGATION_FACTOR: f64 = -0.5;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("charming", 0.5),
    ("clean", 0.37),
    ("comfortable", 0.4),
    ("cool", 0.35),
    ("delicious", 1.0),
    ("delightful", 0.9),
    ("easy", 0.43),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("fine", 0.42),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("incredible", 0.9),
    ("like", 0.2),
    ("liked", 0.3),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("pleasant", 0.73),
    ("pleased", 0.5),
    ("positive", 0.23),
    ("recommend", 0.4),
    ("reliable", 0.5),
    ("satisfied", 0.5),
    ("smooth", 0.4),
    ("superb", 1.0),
    ("thanks", 0.2),
    ("useful", 0.3),
    ("well", 0.2),
    ("wonderful", 1.0),
    ("worth", 0.3),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("angry", -0.5),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("dirty", -0.6),
    ("disgusting", -1.0),
    ("dislike", -0.5),
    ("expensive", -0.5),
    ("fail", -0.5),
    ("failed", -0.5),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("poor", -0.4),
    ("problem", -0.3),
    ("rude", -0.3),
    ("sad", -0.5),
    ("slow", -0.3),
    ("sorry", -0.5),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("unhappy", -0.6),
    ("upset", -0.5),
    ("useless", -0.5),
    ("waste", -0.6),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nothing", "nobody", "cannot", "cant",
    "dont", "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "wont", "wouldnt",
    "shouldnt", "couldnt", "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("really", 1.2),
    ("so", 1.2),
    ("super", 1.3),
    ("too", 1.1),
    ("totally", 1.3),
    ("very", 1.3),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("fairly", 0.8),
    ("somewhat", 0.7),
    ("slightly", 0.5),
    ("little", 0.6),
];

/// Result of scoring one text.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconMatch {
    /// Mean polarity in `[-1, 1]`.
    pub polarity: f64,
    /// Matched words with their adjusted polarity.
    pub matched_words: Vec<(String, f64)>,
}

/// Word-polarity lexicon with negation and intensifier handling.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    negations: Vec<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Lexicon with the built-in general-purpose vocabulary.
    pub fn new() -> Self {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|&(w, s)| (w.to_string(), s))
            .collect();
        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|&(w, m)| (w.to_string(), m))
            .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Add or replace a word, clamping its polarity into `[-1, 1]`.
    pub fn with_word(mut self, word: &str, polarity: f64) -> Self {
        self.words
            .insert(normalize(word).into_string(), polarity.clamp(-1.0, 1.0));
        self
    }

    pub fn word_polarity(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Score a text, reporting which words contributed.
    pub fn analyze(&self, text: &str) -> LexiconMatch {
        let normalized = normalize(text);
        let mut matched_words = Vec::new();

        let mut negation_left = 0usize;
        let mut intensifier = 1.0;

        for word in normalized.words() {
            if self.is_negation(word) {
                negation_left = NEGATION_WINDOW;
                continue;
            }

            if let Some(&mult) = self.intensifiers.get(word) {
                intensifier = mult;
                continue;
            }

            match self.words.get(word) {
                Some(&base) => {
                    let mut score = base * intensifier;
                    if negation_left > 0 {
                        score *= NEGATION_FACTOR;
                        negation_left = 0;
                    }
                    matched_words.push((word.to_string(), score.clamp(-1.0, 1.0)));
                }
                None => {
                    negation_left = negation_left.saturating_sub(1);
                }
            }
            intensifier = 1.0;
        }

        let polarity = if matched_words.is_empty() {
            0.0
        } else {
            let sum: f64 = matched_words.iter().map(|(_, s)| s).sum();
            (sum / matched_words.len() as f64).clamp(-1.0, 1.0)
        };

        LexiconMatch {
            polarity,
            matched_words,
        }
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        self.analyze(text).polarity
    }
}
