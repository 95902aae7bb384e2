//! Report configuration and source availability.

use tonecheck_common::config::{config_file_path, AppConfig, MailDelivery};
use tonecheck_mail::transport::MailSettings;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Tonecheck Check");
    println!("{}", "=".repeat(50));

    let path = config_file_path();
    if path.exists() {
        println!("[OK] Config file: {}", path.display());
    } else {
        println!("[INFO] No config file at {}, using defaults", path.display());
    }

    let analysis = &config.analysis;
    println!(
        "     text column '{}', deadband {}, row limit {}, parallelism {}",
        analysis.text_column, analysis.deadband, analysis.row_limit, analysis.parallelism
    );

    println!();
    let driver = super::build_driver(config)?;
    for source in driver.sources() {
        match source.unavailable_reason() {
            None => println!("[OK] {} available", source.name()),
            Some(reason) => println!("[WARN] {} unavailable: {reason}", source.name()),
        }
    }

    match (MailSettings::from_config(&config.mail), config.mail.delivery) {
        (Ok(settings), MailDelivery::Smtp) => println!(
            "[OK] Mail via SMTP relay {}:{} as {}",
            settings.host, settings.port, settings.user
        ),
        (Ok(_), MailDelivery::Outbox) => println!(
            "[OK] Mail written to outbox {}",
            config.mail.outbox_dir.display()
        ),
        (Err(e), _) => println!("[WARN] {e}"),
    }

    Ok(())
}
