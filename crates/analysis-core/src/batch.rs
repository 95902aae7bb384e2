//! The batch comparison driver.
//!
//! Applies every registered [`ScoringSource`] to every record and collects
//! one [`ComparisonRow`] per record, in input order. Rows are independent,
//! so large batches may be split across scoped threads; the output order is
//! the same either way.

use std::time::Instant;

use tonecheck_model::comparison::{ComparisonRow, ComparisonTable, SourceVerdict};
use tonecheck_model::record::TextRecord;

use crate::normalize::TextNormalizer;
use crate::scorer::ScoringSource;

/// Scores batches of text against a fixed set of sources.
#[derive(Debug, Clone)]
pub struct BatchDriver {
    sources: Vec<ScoringSource>,
    normalizer: TextNormalizer,
    normalize_before_scoring: bool,
    parallelism: usize,
}

impl BatchDriver {
    pub fn new(sources: Vec<ScoringSource>) -> Self {
        Self {
            sources,
            normalizer: TextNormalizer::new(),
            normalize_before_scoring: true,
            parallelism: 1,
        }
    }

    /// Whether scorers see normalized text (default) or the raw input.
    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalize_before_scoring = enabled;
        self
    }

    /// Number of worker threads; values below 1 mean sequential.
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = threads.max(1);
        self
    }

    pub fn sources(&self) -> &[ScoringSource] {
        &self.sources
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Score a single text with every source.
    pub fn score_one(&self, text: &str) -> Vec<SourceVerdict> {
        let prepared = if self.normalize_before_scoring {
            self.normalizer.normalize(text).into_string()
        } else {
            text.to_string()
        };

        self.sources
            .iter()
            .map(|source| SourceVerdict {
                source: source.name().to_string(),
                result: source.evaluate_cleaned(text, &prepared),
            })
            .collect()
    }

    fn score_record(&self, record: &TextRecord) -> ComparisonRow {
        ComparisonRow {
            record: record.clone(),
            verdicts: self.score_one(&record.text),
        }
    }

    /// Score a batch. Never fails; problem rows carry sentinel verdicts.
    pub fn run(&self, records: &[TextRecord]) -> ComparisonTable {
        let started = Instant::now();
        let threads = self.parallelism.min(records.len()).max(1);

        tracing::info!(
            rows = records.len(),
            sources = self.sources.len(),
            threads,
            "Starting comparison batch"
        );

        let rows = if threads == 1 {
            records.iter().map(|r| self.score_record(r)).collect()
        } else {
            self.run_parallel(records, threads)
        };

        let table = ComparisonTable {
            sources: self.source_names(),
            rows,
        };

        tracing::info!(
            rows = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Comparison batch complete"
        );
        table
    }

    fn run_parallel(&self, records: &[TextRecord], threads: usize) -> Vec<ComparisonRow> {
        let chunk_size = records.len().div_ceil(threads);

        std::thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|r| self.score_record(r))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(rows) => rows,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Deadband;
    use crate::scorer::PolaritySource;
    use tonecheck_model::record::records_from;
    use tonecheck_model::sentiment::{SentimentLabel, SentimentResult};

    fn word_polarity(text: &str) -> f64 {
        match text {
            "good" => 1.0,
            "bad" => -1.0,
            _ => 0.0,
        }
    }

    fn driver() -> BatchDriver {
        BatchDriver::new(vec![
            ScoringSource::available("Polarity", PolaritySource::new(word_polarity, Deadband::ZERO)),
            ScoringSource::unavailable("Classifier", "not configured"),
        ])
    }

    #[test]
    fn test_rows_follow_input_order() {
        let table = driver().run(&records_from(["good", "bad", ""]));
        assert_eq!(table.sources, vec!["Polarity", "Classifier"]);

        let labels: Vec<_> = table
            .rows
            .iter()
            .map(|r| r.verdict("Polarity").unwrap().label)
            .collect();
        assert_eq!(
            labels,
            vec![
                SentimentLabel::Positive,
                SentimentLabel::Negative,
                SentimentLabel::Neutral
            ]
        );
    }

    #[test]
    fn test_unavailable_source_never_fails_batch() {
        let table = driver().run(&records_from(["good", ""]));
        assert_eq!(
            table.rows[0].verdict("Classifier"),
            Some(&SentimentResult::unavailable())
        );
        assert_eq!(
            table.rows[1].verdict("Classifier"),
            Some(&SentimentResult::neutral())
        );
    }

    #[test]
    fn test_normalization_toggle() {
        let normalized = driver().score_one("GOOD!!!");
        assert_eq!(normalized[0].result.label, SentimentLabel::Positive);

        let raw = driver().with_normalization(false).score_one("GOOD!!!");
        assert_eq!(raw[0].result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let texts: Vec<String> = (0..103)
            .map(|i| match i % 3 {
                0 => "good".to_string(),
                1 => "bad".to_string(),
                _ => format!("row {i}"),
            })
            .collect();
        let records = records_from(texts);

        let sequential = driver().run(&records);
        let parallel = driver().with_parallelism(4).run(&records);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.rows[102].record.position, 102);
    }

    #[test]
    fn test_empty_batch() {
        let table = driver().with_parallelism(8).run(&[]);
        assert!(table.is_empty());
        assert_eq!(table.sources.len(), 2);
    }

    #[test]
    fn test_unavailable_source_on_punctuation_only_row() {
        let table = driver().run(&records_from(["!!!"]));
        assert_eq!(
            table.rows[0].verdict("Polarity"),
            Some(&SentimentResult::neutral())
        );
        assert_eq!(
            table.rows[0].verdict("Classifier"),
            Some(&SentimentResult::unavailable())
        );
    }
}
