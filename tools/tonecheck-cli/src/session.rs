//! Request-scoped state passed between workflow steps.
//!
//! Steps run in order: login, load a table and pick its text column,
//! compare, then export or email. Each step checks that its predecessors
//! have run. Loading new data discards earlier results.

use tonecheck_analysis::BatchDriver;
use tonecheck_common::error::{ToneError, ToneResult};
use tonecheck_model::comparison::ComparisonTable;
use tonecheck_model::dataset::Dataset;
use tonecheck_model::record::TextRecord;

use crate::auth::CredentialCheck;

#[derive(Debug, Default)]
pub struct SessionContext {
    identity: Option<String>,
    dataset: Option<Dataset>,
    text_column: Option<String>,
    processed: Option<ComparisonTable>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check credentials. A failure never says which half was wrong.
    pub fn login(
        &mut self,
        check: &dyn CredentialCheck,
        identity: &str,
        secret: &str,
    ) -> ToneResult<()> {
        if !check.verify(identity, secret) {
            tracing::warn!("Rejected login attempt");
            return Err(ToneError::AccessDenied);
        }
        self.identity = Some(identity.trim().to_string());
        tracing::debug!(identity = %identity.trim(), "Logged in");
        Ok(())
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    fn require_login(&self) -> ToneResult<()> {
        if self.identity.is_none() {
            return Err(ToneError::AccessDenied);
        }
        Ok(())
    }

    /// Attach a table and choose its text column.
    pub fn load_dataset(&mut self, dataset: Dataset, text_column: &str) -> ToneResult<()> {
        self.require_login()?;
        if !dataset.has_column(text_column) {
            return Err(ToneError::missing_column(text_column, dataset.columns()));
        }
        self.dataset = Some(dataset);
        self.text_column = Some(text_column.to_string());
        self.processed = None;
        Ok(())
    }

    pub fn dataset(&self) -> ToneResult<&Dataset> {
        self.require_login()?;
        self.dataset
            .as_ref()
            .ok_or_else(|| ToneError::session("load data first (and choose a text column)"))
    }

    /// Records from the chosen column, optionally limited to the first rows.
    pub fn text_records(&self, limit: Option<usize>) -> ToneResult<Vec<TextRecord>> {
        let dataset = self.dataset()?;
        let column = self
            .text_column
            .as_deref()
            .ok_or_else(|| ToneError::session("choose a text column first"))?;
        let mut records = dataset.column(column)?;
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    /// Run the comparison and keep the result for export.
    pub fn compare(
        &mut self,
        driver: &BatchDriver,
        limit: Option<usize>,
    ) -> ToneResult<&ComparisonTable> {
        let records = self.text_records(limit)?;
        let table = self.processed.insert(driver.run(&records));
        Ok(&*table)
    }

    pub fn processed(&self) -> ToneResult<&ComparisonTable> {
        self.require_login()?;
        self.processed
            .as_ref()
            .ok_or_else(|| ToneError::session("run a comparison first"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use tonecheck_analysis::scorer::PolaritySource;
    use tonecheck_analysis::{Deadband, ScoringSource};

    struct AcceptAll;

    impl CredentialCheck for AcceptAll {
        fn verify(&self, _identity: &str, _secret: &str) -> bool {
            true
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_reader("id,text\n1,good\n2,bad\n3,fine\n".as_bytes()).unwrap()
    }

    fn driver() -> BatchDriver {
        BatchDriver::new(vec![ScoringSource::available(
            "Polarity",
            PolaritySource::new(
                |t: &str| if t == "good" { 1.0 } else { 0.0 },
                Deadband::ZERO,
            ),
        )])
    }

    fn logged_in() -> SessionContext {
        let mut session = SessionContext::new();
        session.login(&AcceptAll, "me@example.com", "x").unwrap();
        session
    }

    #[test]
    fn test_rejected_login_is_generic() {
        let creds = StaticCredentials::new("me@example.com", "right");
        let mut session = SessionContext::new();

        let wrong_secret = session.login(&creds, "me@example.com", "wrong").unwrap_err();
        let wrong_identity = session.login(&creds, "you@example.com", "right").unwrap_err();
        assert_eq!(wrong_secret.to_string(), wrong_identity.to_string());
        assert!(session.identity().is_none());
    }

    #[test]
    fn test_steps_require_login() {
        let mut session = SessionContext::new();
        assert!(matches!(
            session.load_dataset(dataset(), "text"),
            Err(ToneError::AccessDenied)
        ));
        assert!(matches!(session.processed(), Err(ToneError::AccessDenied)));
    }

    #[test]
    fn test_compare_requires_data() {
        let mut session = logged_in();
        assert!(matches!(
            session.compare(&driver(), None),
            Err(ToneError::Session { .. })
        ));
    }

    #[test]
    fn test_missing_column_rejected_on_load() {
        let mut session = logged_in();
        let err = session.load_dataset(dataset(), "review").unwrap_err();
        assert!(matches!(err, ToneError::MissingColumn { .. }));
        assert!(session.dataset().is_err());
    }

    #[test]
    fn test_full_flow_with_limit() {
        let mut session = logged_in();
        session.load_dataset(dataset(), "text").unwrap();

        let table = session.compare(&driver(), Some(2)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(session.processed().unwrap().rows[0].record.text, "good");
    }

    #[test]
    fn test_reload_discards_results() {
        let mut session = logged_in();
        session.load_dataset(dataset(), "text").unwrap();
        session.compare(&driver(), None).unwrap();

        session.load_dataset(dataset(), "text").unwrap();
        assert!(session.processed().is_err());
    }
}
