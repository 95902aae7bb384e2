//! Sentiment labels and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tonecheck_common::error::ToneError;

/// Categorical sentiment label.
///
/// Score-derived labels are always one of `Positive`, `Neutral` or
/// `Negative`. `Unavailable` is a sentinel reported by a scoring source
/// that could not run; it is never a genuine verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Unavailable,
}

impl SentimentLabel {
    /// The three labels a score can map to.
    pub const VERDICTS: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Unavailable => "unavailable",
        }
    }

    /// Whether this is a real verdict rather than the sentinel.
    pub fn is_verdict(&self) -> bool {
        !matches!(self, SentimentLabel::Unavailable)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = ToneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            "unavailable" => Ok(SentimentLabel::Unavailable),
            other => Err(ToneError::malformed(format!(
                "unknown sentiment label '{other}'"
            ))),
        }
    }
}

/// A label paired with a confidence in `[0.0, 1.0]`.
///
/// What the confidence means depends on the source: polarity magnitude for
/// lexicon scorers, class probability for classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl SentimentResult {
    /// Create a result, clamping the confidence into `[0.0, 1.0]`.
    /// NaN becomes `0.0`.
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }

    /// `("neutral", 0.0)`, the result for blank text.
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.0,
        }
    }

    /// `("unavailable", 0.0)`, the sentinel for a source that cannot run.
    pub fn unavailable() -> Self {
        Self {
            label: SentimentLabel::Unavailable,
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!(
            "POSITIVE".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Positive
        );
        assert_eq!(
            " negative ".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Negative
        );
        assert!("mixed".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
            SentimentLabel::Unavailable,
        ] {
            assert_eq!(label.to_string().parse::<SentimentLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(SentimentResult::new(SentimentLabel::Positive, 1.7).confidence, 1.0);
        assert_eq!(SentimentResult::new(SentimentLabel::Negative, -0.2).confidence, 0.0);
        assert_eq!(SentimentResult::new(SentimentLabel::Neutral, f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_sentinel() {
        let result = SentimentResult::unavailable();
        assert_eq!(result.label.as_str(), "unavailable");
        assert!(!result.label.is_verdict());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_display_honors_width() {
        assert_eq!(format!("[{:<9}]", SentimentLabel::Neutral), "[neutral  ]");
    }

    proptest! {
        #[test]
        fn prop_confidence_in_unit_range(confidence in proptest::num::f64::ANY) {
            let result = SentimentResult::new(SentimentLabel::Positive, confidence);
            prop_assert!((0.0..=1.0).contains(&result.confidence));
        }
    }
}
