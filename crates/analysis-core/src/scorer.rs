//! Scoring capabilities and their availability handles.
//!
//! A [`ScoringSource`] is built once at startup and injected into the batch
//! driver. Its status is decided at construction: an unavailable source is
//! logged once and afterwards answers every request with the
//! `unavailable` sentinel instead of failing.

use std::fmt;
use std::sync::Arc;

use tonecheck_common::error::ToneResult;
use tonecheck_model::sentiment::SentimentResult;

use crate::label::Deadband;

/// Anything that turns text into a sentiment result.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> ToneResult<SentimentResult>;
}

/// A capability producing a continuous polarity in `[-1, 1]`.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn polarity(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Adapts a [`PolarityScorer`] into a [`SentimentScorer`] through label
/// derivation.
#[derive(Debug, Clone)]
pub struct PolaritySource<P> {
    scorer: P,
    deadband: Deadband,
}

impl<P: PolarityScorer> PolaritySource<P> {
    pub fn new(scorer: P, deadband: Deadband) -> Self {
        Self { scorer, deadband }
    }
}

impl<P: PolarityScorer> SentimentScorer for PolaritySource<P> {
    fn score(&self, text: &str) -> ToneResult<SentimentResult> {
        Ok(self.deadband.label(self.scorer.polarity(text)))
    }
}

/// Whether a source can run.
#[derive(Clone)]
pub enum SourceStatus {
    Available(Arc<dyn SentimentScorer>),
    Unavailable { reason: String },
}

impl fmt::Debug for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Available(_) => f.write_str("Available"),
            SourceStatus::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// A named scoring capability with an explicit availability status.
#[derive(Debug, Clone)]
pub struct ScoringSource {
    name: String,
    status: SourceStatus,
}

impl ScoringSource {
    pub fn available(name: impl Into<String>, scorer: impl SentimentScorer + 'static) -> Self {
        Self {
            name: name.into(),
            status: SourceStatus::Available(Arc::new(scorer)),
        }
    }

    /// Record a source that failed to initialize.
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        let reason = reason.into();
        tracing::warn!(source = %name, %reason, "Scoring source unavailable");
        Self {
            name,
            status: SourceStatus::Unavailable { reason },
        }
    }

    /// Build from a fallible initialization.
    pub fn from_init<S>(name: impl Into<String>, init: ToneResult<S>) -> Self
    where
        S: SentimentScorer + 'static,
    {
        match init {
            Ok(scorer) => Self::available(name, scorer),
            Err(e) => Self::unavailable(name, e.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> &SourceStatus {
        &self.status
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, SourceStatus::Available(_))
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.status {
            SourceStatus::Available(_) => None,
            SourceStatus::Unavailable { reason } => Some(reason.as_str()),
        }
    }

    /// Score one text. Never fails.
    ///
    /// Blank text is neutral without consulting the scorer. An unavailable
    /// source or a scorer error yields the `unavailable` sentinel.
    pub fn evaluate(&self, text: &str) -> SentimentResult {
        self.evaluate_cleaned(text, text)
    }

    /// Score `cleaned`, the prepared form of `raw`. Never fails.
    ///
    /// Blank `raw` input is neutral for every source. Otherwise an
    /// unavailable source reports the sentinel even when cleaning left
    /// nothing (`"!!!"`), and an available one sees blank `cleaned` text as
    /// neutral without being called.
    pub fn evaluate_cleaned(&self, raw: &str, cleaned: &str) -> SentimentResult {
        if raw.trim().is_empty() {
            return SentimentResult::neutral();
        }
        match &self.status {
            SourceStatus::Unavailable { .. } => SentimentResult::unavailable(),
            SourceStatus::Available(_) if cleaned.trim().is_empty() => SentimentResult::neutral(),
            SourceStatus::Available(scorer) => match scorer.score(cleaned) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(source = %self.name, error = %e, "Scoring failed; reporting unavailable");
                    SentimentResult::unavailable()
                }
            },
        }
    }
}
