//! Word statistics over cleaned text.

use crate::normalize::NormalizedText;

/// Summary of word counts across a batch of normalized texts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WordStats {
    pub rows: usize,
    pub total_words: usize,
    pub max_words: usize,
    pub empty_rows: usize,
}

impl WordStats {
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a NormalizedText>) -> Self {
        texts.into_iter().fold(Self::default(), |mut stats, text| {
            let words = text.word_count();
            stats.rows += 1;
            stats.total_words += words;
            stats.max_words = stats.max_words.max(words);
            if words == 0 {
                stats.empty_rows += 1;
            }
            stats
        })
    }

    /// Mean words per row; `0.0` for an empty batch.
    pub fn average_words(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.total_words as f64 / self.rows as f64
        }
    }
}
