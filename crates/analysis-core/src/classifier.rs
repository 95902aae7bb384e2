//! Pretrained classification capability.
//!
//! The classifier is a multinomial naive Bayes model trained offline on
//! labeled text and stored as JSON. At startup the model file is loaded
//! once; if that fails the classifier source is reported unavailable and
//! every request gets the sentinel result.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tonecheck_common::error::{ToneError, ToneResult};
use tonecheck_model::dataset::Dataset;
use tonecheck_model::sentiment::{SentimentLabel, SentimentResult};

use crate::normalize::normalize;
use crate::scorer::{ScoringSource, SentimentScorer};

/// Display name of the classifier source.
pub const CLASSIFIER_SOURCE: &str = "Classifier";

/// A classifier's raw answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    /// Probability of `label`, in `[0, 1]`.
    pub score: f64,
}

/// A capability mapping text to a class label and probability.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> ToneResult<Classification>;
}

/// Adapts a [`Classifier`] into a [`SentimentScorer`].
#[derive(Debug, Clone)]
pub struct ClassifierSource<C> {
    classifier: C,
}

impl<C: Classifier> ClassifierSource<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }
}

impl<C: Classifier> SentimentScorer for ClassifierSource<C> {
    fn score(&self, text: &str) -> ToneResult<SentimentResult> {
        let classification = self.classifier.classify(text)?;
        let label: SentimentLabel = classification.label.parse().map_err(|_| {
            ToneError::scoring(
                CLASSIFIER_SOURCE,
                format!("unexpected class '{}'", classification.label),
            )
        })?;
        Ok(SentimentResult::new(label, classification.score))
    }
}

/// A training example.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledText {
    pub text: String,
    pub label: SentimentLabel,
}

/// Multinomial naive Bayes over normalized words, Laplace smoothed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    /// Smoothing constant used during training.
    alpha: f64,

    /// `ln P(class)`.
    class_log_priors: BTreeMap<String, f64>,

    /// `ln P(word | class)` for words seen with the class.
    word_log_likelihoods: BTreeMap<String, BTreeMap<String, f64>>,

    /// `ln P(word | class)` for vocabulary words never seen with the class.
    unseen_log_likelihoods: BTreeMap<String, f64>,

    vocabulary: BTreeSet<String>,
}

impl NaiveBayesModel {
    /// Fit a model. Every example must carry a real verdict label.
    pub fn train(examples: &[LabeledText], alpha: f64) -> ToneResult<Self> {
        if examples.is_empty() {
            return Err(ToneError::model("no training examples"));
        }
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ToneError::model(format!(
                "smoothing must be positive, got {alpha}"
            )));
        }

        let mut class_docs: HashMap<&'static str, usize> = HashMap::new();
        let mut class_word_counts: HashMap<&'static str, HashMap<String, usize>> = HashMap::new();
        let mut vocabulary = BTreeSet::new();

        for example in examples {
            if !example.label.is_verdict() {
                return Err(ToneError::model(format!(
                    "cannot train on label '{}'",
                    example.label
                )));
            }
            let class = example.label.as_str();
            *class_docs.entry(class).or_insert(0) += 1;

            let counts = class_word_counts.entry(class).or_default();
            for word in normalize(&example.text).words() {
                *counts.entry(word.to_string()).or_insert(0) += 1;
                vocabulary.insert(word.to_string());
            }
        }

        let total_docs = examples.len() as f64;
        let vocab_size = vocabulary.len() as f64;

        let mut class_log_priors = BTreeMap::new();
        let mut word_log_likelihoods = BTreeMap::new();
        let mut unseen_log_likelihoods = BTreeMap::new();

        for (class, docs) in &class_docs {
            class_log_priors.insert(class.to_string(), (*docs as f64 / total_docs).ln());

            let counts = class_word_counts.remove(class).unwrap_or_default();
            let total_words: usize = counts.values().sum();
            let denominator = total_words as f64 + alpha * vocab_size;

            let likelihoods = counts
                .into_iter()
                .map(|(word, count)| (word, ((count as f64 + alpha) / denominator).ln()))
                .collect();
            word_log_likelihoods.insert(class.to_string(), likelihoods);
            unseen_log_likelihoods.insert(class.to_string(), (alpha / denominator).ln());
        }

        tracing::info!(
            examples = examples.len(),
            classes = class_log_priors.len(),
            vocabulary = vocabulary.len(),
            "Trained naive Bayes classifier"
        );

        Ok(Self {
            alpha,
            class_log_priors,
            word_log_likelihoods,
            unseen_log_likelihoods,
            vocabulary,
        })
    }

    /// Collect examples from two columns of a table and fit a model.
    ///
    /// Rows whose label is blank are skipped.
    pub fn train_from_dataset(
        dataset: &Dataset,
        text_column: &str,
        label_column: &str,
        alpha: f64,
    ) -> ToneResult<Self> {
        let texts = dataset.column(text_column)?;
        let labels = dataset.column(label_column)?;

        let mut examples = Vec::with_capacity(texts.len());
        for (text, label) in texts.into_iter().zip(labels) {
            if label.is_blank() {
                continue;
            }
            let parsed: SentimentLabel = label.text.parse().map_err(|_| {
                ToneError::model(format!(
                    "row {}: unknown label '{}'",
                    label.position + 1,
                    label.text
                ))
            })?;
            examples.push(LabeledText {
                text: text.text,
                label: parsed,
            });
        }

        Self::train(&examples, alpha)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_log_priors.keys().map(String::as_str)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Posterior probability of every class. Unknown words are ignored.
    pub fn predict_proba(&self, text: &str) -> BTreeMap<String, f64> {
        let normalized = normalize(text);
        let words: Vec<&str> = normalized
            .words()
            .filter(|w| self.vocabulary.contains(*w))
            .collect();

        let mut log_scores: BTreeMap<String, f64> = BTreeMap::new();
        for (class, prior) in &self.class_log_priors {
            let seen = self.word_log_likelihoods.get(class);
            let unseen = self
                .unseen_log_likelihoods
                .get(class)
                .copied()
                .unwrap_or(f64::NEG_INFINITY);

            let log_score = words.iter().fold(*prior, |acc, word| {
                acc + seen.and_then(|s| s.get(*word)).copied().unwrap_or(unseen)
            });
            log_scores.insert(class.clone(), log_score);
        }

        let max = log_scores
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = log_scores.values().map(|s| (s - max).exp()).sum();

        log_scores
            .into_iter()
            .map(|(class, s)| (class, (s - max).exp() / sum))
            .collect()
    }

    fn validate(&self) -> ToneResult<()> {
        if self.class_log_priors.is_empty() {
            return Err(ToneError::model("model has no classes"));
        }
        for class in self.class_log_priors.keys() {
            let label: SentimentLabel = class
                .parse()
                .map_err(|_| ToneError::model(format!("unknown class '{class}'")))?;
            if !label.is_verdict() {
                return Err(ToneError::model(format!("invalid class '{class}'")));
            }
        }
        Ok(())
    }

    /// Write the model as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ToneResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read and validate a model file.
    pub fn load(path: impl AsRef<Path>) -> ToneResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ToneError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let json = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }
}

impl Classifier for NaiveBayesModel {
    fn classify(&self, text: &str) -> ToneResult<Classification> {
        self.predict_proba(text)
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(label, score)| Classification { label, score })
            .ok_or_else(|| ToneError::scoring(CLASSIFIER_SOURCE, "model has no classes"))
    }
}

/// Build the classifier source from an optional model path.
///
/// Never fails: a missing or broken model yields an unavailable source.
pub fn classifier_source(model_path: Option<&Path>) -> ScoringSource {
    let Some(path) = model_path else {
        return ScoringSource::unavailable(CLASSIFIER_SOURCE, "no classifier model configured");
    };

    match NaiveBayesModel::load(path) {
        Ok(model) => {
            tracing::info!(
                path = %path.display(),
                vocabulary = model.vocabulary_size(),
                "Loaded classifier model"
            );
            ScoringSource::available(CLASSIFIER_SOURCE, ClassifierSource::new(model))
        }
        Err(e) => ScoringSource::unavailable(
            CLASSIFIER_SOURCE,
            format!("failed to load {}: {e}", path.display()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(text: &str, label: SentimentLabel) -> LabeledText {
        LabeledText {
            text: text.to_string(),
            label,
        }
    }

    fn trained() -> NaiveBayesModel {
        NaiveBayesModel::train(
            &[
                example("great product, love it", SentimentLabel::Positive),
                example("wonderful service and great staff", SentimentLabel::Positive),
                example("love the design", SentimentLabel::Positive),
                example("terrible, broke after a day", SentimentLabel::Negative),
                example("awful support, terrible experience", SentimentLabel::Negative),
                example("hate the noise", SentimentLabel::Negative),
            ],
            1.0,
        )
        .unwrap()
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tonecheck-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_classifies_training_vocabulary() {
        let model = trained();
        assert_eq!(model.classify("great love").unwrap().label, "positive");
        assert_eq!(model.classify("terrible awful").unwrap().label, "negative");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let probs = trained().predict_proba("great but terrible");
        let sum: f64 = probs.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probs.values().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_unknown_words_fall_back_to_priors() {
        let probs = trained().predict_proba("zebra quantum");
        assert!((probs["positive"] - 0.5).abs() < 1e-9);
        assert!((probs["negative"] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_training_rejects_sentinel_and_empty() {
        assert!(NaiveBayesModel::train(&[], 1.0).is_err());
        assert!(
            NaiveBayesModel::train(&[example("x", SentimentLabel::Unavailable)], 1.0).is_err()
        );
        assert!(NaiveBayesModel::train(&[example("x", SentimentLabel::Positive)], 0.0).is_err());
    }

    #[test]
    fn test_train_from_dataset() {
        let dataset = Dataset::from_reader(
            "text,label\nso good,positive\nso bad,NEGATIVE\nunlabeled,\n".as_bytes(),
        )
        .unwrap();
        let model = NaiveBayesModel::train_from_dataset(&dataset, "text", "label", 1.0).unwrap();
        assert_eq!(model.classes().collect::<Vec<_>>(), vec!["negative", "positive"]);

        let err = NaiveBayesModel::train_from_dataset(&dataset, "text", "sentiment", 1.0)
            .unwrap_err();
        assert!(matches!(err, ToneError::MissingColumn { .. }));
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("model.json");
        let model = trained();
        model.save(&path).unwrap();
        let loaded = NaiveBayesModel::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            loaded.classify("love it").unwrap().label,
            model.classify("love it").unwrap().label
        );
    }

    #[test]
    fn test_source_maps_classification() {
        let source = ClassifierSource::new(trained());
        let result = source.score("wonderful, great").unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.confidence > 0.5 && result.confidence <= 1.0);
    }

    #[test]
    fn test_source_rejects_foreign_labels() {
        struct Stars;
        impl Classifier for Stars {
            fn classify(&self, _text: &str) -> ToneResult<Classification> {
                Ok(Classification {
                    label: "5 stars".to_string(),
                    score: 0.9,
                })
            }
        }
        assert!(ClassifierSource::new(Stars).score("x").is_err());
    }

    #[test]
    fn test_missing_model_gives_unavailable_source() {
        let source = classifier_source(None);
        assert!(!source.is_available());
        assert_eq!(source.evaluate("great"), SentimentResult::unavailable());

        let source = classifier_source(Some(Path::new("/no/such/model.json")));
        assert!(source.unavailable_reason().unwrap().contains("File not found"));
    }

    #[test]
    fn test_corrupt_model_gives_unavailable_source() {
        let path = temp_path("corrupt.json");
        std::fs::write(&path, "{ not json").unwrap();
        let source = classifier_source(Some(path.as_path()));
        std::fs::remove_file(&path).ok();
        assert!(!source.is_available());
    }
}
