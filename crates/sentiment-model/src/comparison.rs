//! Side-by-side comparison of several scoring sources.
//!
//! A [`ComparisonTable`] exports to CSV with the layout
//! `text, <source> Sentiment, <source> Confidence, ...` (header row, no
//! index column) and can be read back from that same layout.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tonecheck_common::error::{ToneError, ToneResult};

use crate::record::TextRecord;
use crate::sentiment::{SentimentLabel, SentimentResult};

const TEXT_HEADER: &str = "text";
const SENTIMENT_SUFFIX: &str = " Sentiment";
const CONFIDENCE_SUFFIX: &str = " Confidence";

/// One source's result for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVerdict {
    pub source: String,
    pub result: SentimentResult,
}

/// A record together with every source's verdict, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub record: TextRecord,
    pub verdicts: Vec<SourceVerdict>,
}

impl ComparisonRow {
    /// Verdict reported by the named source, if it took part.
    pub fn verdict(&self, source: &str) -> Option<&SentimentResult> {
        self.verdicts
            .iter()
            .find(|v| v.source == source)
            .map(|v| &v.result)
    }
}

/// The result of one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    /// Source names, in column order.
    pub sources: Vec<String>,

    /// Rows in input order.
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            sources,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of each label reported by one source.
    ///
    /// Returns `None` when the source is not part of this table.
    pub fn label_distribution(&self, source: &str) -> Option<BTreeMap<SentimentLabel, usize>> {
        if !self.sources.iter().any(|s| s == source) {
            return None;
        }
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            if let Some(result) = row.verdict(source) {
                *counts.entry(result.label).or_insert(0) += 1;
            }
        }
        Some(counts)
    }

    /// Header row of the CSV export.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![TEXT_HEADER.to_string()];
        for source in &self.sources {
            header.push(format!("{source}{SENTIMENT_SUFFIX}"));
            header.push(format!("{source}{CONFIDENCE_SUFFIX}"));
        }
        header
    }

    /// Write the table as UTF-8 CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> ToneResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.header())?;

        for row in &self.rows {
            let mut fields = Vec::with_capacity(1 + self.sources.len() * 2);
            fields.push(row.record.text.clone());
            for source in &self.sources {
                let result = row
                    .verdict(source)
                    .copied()
                    .unwrap_or_else(SentimentResult::unavailable);
                fields.push(result.label.to_string());
                fields.push(format!("{:?}", result.confidence));
            }
            csv_writer.write_record(&fields)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Render the CSV export into memory.
    pub fn to_csv_bytes(&self) -> ToneResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }

    /// Write the CSV export to a file, creating parent directories.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> ToneResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))?;
        tracing::debug!(path = %path.display(), rows = self.rows.len(), "Wrote comparison CSV");
        Ok(())
    }

    /// Read a table previously produced by [`ComparisonTable::write_csv`].
    pub fn read_csv<R: Read>(reader: R) -> ToneResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let sources = parse_header(&headers)?;

        let mut table = Self::new(sources);
        for (position, record) in csv_reader.records().enumerate() {
            let record = record?;
            let text = record.get(0).unwrap_or_default();
            let mut verdicts = Vec::with_capacity(table.sources.len());

            for (i, source) in table.sources.iter().enumerate() {
                let label_field = record.get(1 + i * 2).unwrap_or_default();
                let confidence_field = record.get(2 + i * 2).unwrap_or_default();

                let label: SentimentLabel = label_field.parse()?;
                let confidence: f64 = confidence_field.trim().parse().map_err(|_| {
                    ToneError::malformed(format!(
                        "row {}: invalid confidence '{confidence_field}' for {source}",
                        position + 1
                    ))
                })?;

                verdicts.push(SourceVerdict {
                    source: source.clone(),
                    result: SentimentResult::new(label, confidence),
                });
            }

            table.rows.push(ComparisonRow {
                record: TextRecord::new(position, text),
                verdicts,
            });
        }

        Ok(table)
    }

    /// Read a CSV export from disk.
    pub fn load_csv(path: impl AsRef<Path>) -> ToneResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ToneError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        Self::read_csv(std::io::BufReader::new(file))
    }
}

/// Recover source names from an export header.
fn parse_header(headers: &[String]) -> ToneResult<Vec<String>> {
    match headers.first() {
        Some(first) if first == TEXT_HEADER => {}
        _ => {
            return Err(ToneError::missing_column(TEXT_HEADER, headers));
        }
    }

    let rest = &headers[1..];
    if rest.len() % 2 != 0 {
        return Err(ToneError::malformed(
            "expected Sentiment/Confidence column pairs after 'text'",
        ));
    }

    rest.chunks(2)
        .map(|pair| {
            let source = pair[0].strip_suffix(SENTIMENT_SUFFIX).ok_or_else(|| {
                ToneError::malformed(format!("expected '<source> Sentiment', found '{}'", pair[0]))
            })?;
            let expected = format!("{source}{CONFIDENCE_SUFFIX}");
            if pair[1] != expected {
                return Err(ToneError::malformed(format!(
                    "expected '{expected}', found '{}'",
                    pair[1]
                )));
            }
            Ok(source.to_string())
        })
        .collect()
}
