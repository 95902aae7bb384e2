//! Compare every source over a column and export the table.

use std::path::PathBuf;

use tonecheck_common::config::AppConfig;

use super::Credentials;

pub async fn run(
    config: &AppConfig,
    credentials: &Credentials,
    input: PathBuf,
    column: Option<String>,
    output: PathBuf,
    full: bool,
    email: bool,
) -> anyhow::Result<()> {
    let mut session = super::open_dataset(config, credentials, &input, column)?;
    let driver = super::build_driver(config)?;

    let limit = (!full).then_some(config.analysis.row_limit);
    let total = session.dataset()?.len();
    if let Some(limit) = limit.filter(|l| *l < total) {
        println!("Scoring the first {limit} of {total} rows (use --full for all)");
    }

    let table = session.compare(&driver, limit)?;

    for source in driver.sources() {
        if let Some(reason) = source.unavailable_reason() {
            println!("[WARN] {} unavailable: {reason}", source.name());
        }
    }

    println!("Compared {} rows across {} sources", table.len(), table.sources.len());
    super::print_distribution(table);

    table
        .save_csv(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;
    println!("Results written to {}", output.display());

    if email {
        let csv = session.processed()?.to_csv_bytes()?;
        let delivery = super::email::deliver(config, None, csv).await?;
        super::email::report(&delivery);
    }

    Ok(())
}
