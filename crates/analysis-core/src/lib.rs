//! Tonecheck Analysis Core
//!
//! Turns raw text into comparable sentiment verdicts:
//! - **Normalization:** Lowercase, strip URLs, mentions, hashtags and
//!   non-letters, collapse whitespace
//! - **Label Derivation:** Map a continuous score onto
//!   positive / neutral / negative with a configurable deadband
//! - **Scoring Sources:** A built-in lexicon polarity scorer and a
//!   pretrained naive Bayes classifier behind an availability handle
//! - **Batch Driver:** Apply every source to every row, in input order
//!
//! This crate is pure computation apart from loading and saving classifier
//! models. Scoring failures never abort a batch.

pub mod batch;
pub mod classifier;
pub mod label;
pub mod lexicon;
pub mod normalize;
pub mod scorer;
pub mod stats;

pub use batch::BatchDriver;
pub use label::{label_from_score, Deadband};
pub use normalize::{normalize, NormalizedText, TextNormalizer};
pub use scorer::{ScoringSource, SentimentScorer};
