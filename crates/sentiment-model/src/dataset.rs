//! Uploaded tables.

use std::io::Read;
use std::path::Path;

use tonecheck_common::error::{ToneError, ToneResult};

use crate::record::TextRecord;

/// A CSV table with a header row. All cells are kept as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> ToneResult<Self> {
        if headers.is_empty() {
            return Err(ToneError::malformed("table has no header row"));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ToneError::malformed(format!(
                "row {} has {} fields, expected {}",
                i + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    /// Parse CSV from any reader. The first record is the header.
    pub fn from_reader<R: Read>(reader: R) -> ToneResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| ToneError::malformed(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| ToneError::malformed(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ToneError::malformed("table has no header row"));
        }

        Self::new(headers, rows)
    }

    /// Load a table from disk. Only CSV is accepted.
    pub fn from_path(path: impl AsRef<Path>) -> ToneResult<Self> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if matches!(extension.as_deref(), Some("xlsx") | Some("xls")) {
            return Err(ToneError::unsupported(format!(
                "{} is a spreadsheet; export it as CSV first",
                path.display()
            )));
        }

        if !path.exists() {
            return Err(ToneError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.headers.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    pub fn columns(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Extract one column as text records.
    ///
    /// Fails without partial output when the column is missing.
    pub fn column(&self, name: &str) -> ToneResult<Vec<TextRecord>> {
        let index = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ToneError::missing_column(name, &self.headers))?;

        Ok(self
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| TextRecord::new(position, row[index].clone()))
            .collect())
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
