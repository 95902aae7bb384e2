//! Mapping continuous scores onto sentiment labels.
//!
//! A score strictly above the deadband is positive, strictly below its
//! negation is negative, anything else (including NaN) is neutral. Neutral
//! results always carry a confidence of `0.0`.

use serde::{Deserialize, Serialize};
use tonecheck_common::error::{ToneError, ToneResult};
use tonecheck_model::sentiment::{SentimentLabel, SentimentResult};

/// Half-width of the neutral band around zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Deadband(f64);

impl Deadband {
    /// Zero-crossing: any positive score is positive.
    pub const ZERO: Deadband = Deadband(0.0);

    /// Validate a configured deadband. Must be finite; the sign is ignored.
    pub fn new(value: f64) -> ToneResult<Self> {
        if !value.is_finite() {
            return Err(ToneError::config(format!(
                "deadband must be a finite number, got {value}"
            )));
        }
        Ok(Self(value.abs()))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Label a score against this band.
    pub fn label(&self, score: f64) -> SentimentResult {
        label_from_score(score, self.0)
    }
}

/// Derive a label and confidence from a score in `[-1, 1]`.
///
/// Confidence is the score's magnitude clamped to `[0, 1]` for positive and
/// negative labels and `0.0` for neutral. A negative `deadband` behaves like
/// its absolute value; a NaN deadband like zero.
pub fn label_from_score(score: f64, deadband: f64) -> SentimentResult {
    let band = if deadband.is_nan() { 0.0 } else { deadband.abs() };

    if score > band {
        SentimentResult::new(SentimentLabel::Positive, score)
    } else if score < -band {
        SentimentResult::new(SentimentLabel::Negative, -score)
    } else {
        SentimentResult::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_is_neutral() {
        assert_eq!(label_from_score(0.0, 0.0), SentimentResult::neutral());
        assert_eq!(label_from_score(-0.0, 0.0), SentimentResult::neutral());
    }

    #[test]
    fn test_zero_crossing() {
        let pos = label_from_score(0.01, 0.0);
        assert_eq!(pos.label, SentimentLabel::Positive);
        assert!((pos.confidence - 0.01).abs() < 1e-12);

        let neg = label_from_score(-0.4, 0.0);
        assert_eq!(neg.label, SentimentLabel::Negative);
        assert!((neg.confidence - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_deadband_boundaries_are_neutral() {
        assert_eq!(label_from_score(0.05, 0.05).label, SentimentLabel::Neutral);
        assert_eq!(label_from_score(-0.05, 0.05).label, SentimentLabel::Neutral);
        assert_eq!(label_from_score(0.0500001, 0.05).label, SentimentLabel::Positive);
        assert_eq!(label_from_score(-0.0500001, 0.05).label, SentimentLabel::Negative);
    }

    #[test]
    fn test_neutral_confidence_is_zero_inside_band() {
        assert_eq!(label_from_score(0.03, 0.05).confidence, 0.0);
    }

    #[test]
    fn test_out_of_range_scores_clamp() {
        assert_eq!(label_from_score(3.0, 0.0).confidence, 1.0);
        assert_eq!(label_from_score(-3.0, 0.0).confidence, 1.0);
    }

    #[test]
    fn test_nan_score_is_neutral() {
        assert_eq!(label_from_score(f64::NAN, 0.05), SentimentResult::neutral());
    }

    #[test]
    fn test_deadband_validation() {
        assert_eq!(Deadband::new(-0.05).unwrap().value(), 0.05);
        assert!(Deadband::new(f64::INFINITY).is_err());
        assert!(Deadband::new(f64::NAN).is_err());
        assert_eq!(Deadband::ZERO.label(1.0).label, SentimentLabel::Positive);
    }

    proptest! {
        #[test]
        fn prop_always_a_verdict(score in any::<f64>(), band in 0.0f64..0.5) {
            let result = label_from_score(score, band);
            prop_assert!(SentimentLabel::VERDICTS.contains(&result.label));
            prop_assert!(result.confidence >= 0.0);
            prop_assert!(result.confidence <= 1.0);
        }

        #[test]
        fn prop_sign_symmetry(score in -1.0f64..1.0, band in 0.0f64..0.5) {
            let pos = label_from_score(score, band);
            let neg = label_from_score(-score, band);
            prop_assert_eq!(pos.confidence, neg.confidence);
        }
    }
}
