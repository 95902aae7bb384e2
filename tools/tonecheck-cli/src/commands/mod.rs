pub mod analyze;
pub mod check;
pub mod clean;
pub mod compare;
pub mod email;
pub mod train;

use std::path::Path;

use tonecheck_analysis::classifier::classifier_source;
use tonecheck_analysis::lexicon::LexiconScorer;
use tonecheck_analysis::scorer::PolaritySource;
use tonecheck_analysis::{BatchDriver, Deadband, ScoringSource};
use tonecheck_common::config::AppConfig;
use tonecheck_common::error::ToneError;
use tonecheck_model::comparison::ComparisonTable;
use tonecheck_model::dataset::Dataset;

use crate::auth::StaticCredentials;
use crate::session::SessionContext;

/// Name of the built-in lexicon source in output tables.
pub const LEXICON_SOURCE: &str = "Lexicon";

/// Login values given on the command line or through the environment.
pub struct Credentials {
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Start a session for the given credentials.
pub fn login(config: &AppConfig, credentials: &Credentials) -> anyhow::Result<SessionContext> {
    let (Some(user), Some(password)) = (&credentials.user, &credentials.password) else {
        return Err(ToneError::AccessDenied.into());
    };
    let mut session = SessionContext::new();
    session.login(&StaticCredentials::from_config(&config.auth), user, password)?;
    Ok(session)
}

/// Build every scoring source from configuration.
pub fn build_driver(config: &AppConfig) -> anyhow::Result<BatchDriver> {
    let analysis = &config.analysis;
    let deadband = Deadband::new(analysis.deadband)?;

    let sources = vec![
        ScoringSource::available(
            LEXICON_SOURCE,
            PolaritySource::new(LexiconScorer::new(), deadband),
        ),
        classifier_source(analysis.classifier_model.as_deref()),
    ];

    Ok(BatchDriver::new(sources)
        .with_normalization(analysis.normalize_before_scoring)
        .with_parallelism(analysis.parallelism))
}

/// Log in, read a table and select its text column.
pub fn open_dataset(
    config: &AppConfig,
    credentials: &Credentials,
    input: &Path,
    column: Option<String>,
) -> anyhow::Result<SessionContext> {
    let mut session = login(config, credentials)?;
    let dataset = Dataset::from_path(input)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", input.display()))?;
    let column = column.unwrap_or_else(|| config.analysis.text_column.clone());
    session.load_dataset(dataset, &column)?;
    Ok(session)
}

/// Print label counts for each source.
pub fn print_distribution(table: &ComparisonTable) {
    for source in &table.sources {
        let Some(counts) = table.label_distribution(source) else {
            continue;
        };
        let summary: Vec<String> = counts
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .collect();
        println!("  {:<12} {}", source, summary.join(", "));
    }
}
