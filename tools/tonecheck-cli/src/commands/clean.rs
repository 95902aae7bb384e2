//! Preview cleaned text and word statistics for a column.

use std::path::PathBuf;

use tonecheck_analysis::normalize;
use tonecheck_analysis::stats::WordStats;
use tonecheck_common::config::AppConfig;

use super::Credentials;

pub fn run(
    config: &AppConfig,
    credentials: &Credentials,
    input: PathBuf,
    column: Option<String>,
    preview: usize,
) -> anyhow::Result<()> {
    let session = super::open_dataset(config, credentials, &input, column)?;
    let records = session.text_records(None)?;

    let cleaned: Vec<_> = records.iter().map(|r| normalize(&r.text)).collect();
    let stats = WordStats::from_texts(&cleaned);

    println!("Cleaned preview");
    println!("{}", "=".repeat(50));
    for (record, text) in records.iter().zip(&cleaned).take(preview) {
        println!("[{}] {}", record.position, record.text);
        println!("     -> {} ({} words)", text, text.word_count());
    }

    println!();
    println!("Rows:          {}", stats.rows);
    println!("Total words:   {}", stats.total_words);
    println!("Average words: {:.2}", stats.average_words());
    println!("Max words:     {}", stats.max_words);
    if stats.empty_rows > 0 {
        println!("Empty rows:    {}", stats.empty_rows);
    }

    Ok(())
}
