//! Raw text records.

use serde::{Deserialize, Serialize};

/// A single piece of user-supplied text.
///
/// A record has no identity beyond its position in the input batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Zero-based position in the originating batch.
    pub position: usize,

    /// The text exactly as supplied.
    pub text: String,
}

impl TextRecord {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    /// Whether the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Build a batch of records, numbering them in iteration order.
pub fn records_from<I, S>(texts: I) -> Vec<TextRecord>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(position, text)| TextRecord::new(position, text))
        .collect()
}
