//! Score a single sentence.

use tonecheck_analysis::normalize;
use tonecheck_common::config::AppConfig;

use super::Credentials;

pub fn run(config: &AppConfig, credentials: &Credentials, text: String) -> anyhow::Result<()> {
    let session = super::login(config, credentials)?;
    tracing::debug!(identity = ?session.identity(), "Scoring single text");

    let driver = super::build_driver(config)?;
    let verdicts = driver.score_one(&text);

    println!("Input:   {text}");
    println!("Cleaned: {}", normalize(&text));
    println!();
    for verdict in &verdicts {
        println!(
            "  {:<12} {:<12} {:.2}",
            verdict.source, verdict.result.label, verdict.result.confidence
        );
    }

    Ok(())
}
