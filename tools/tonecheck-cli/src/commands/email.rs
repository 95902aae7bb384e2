//! Email an exported results file.

use std::path::PathBuf;

use tonecheck_common::config::AppConfig;
use tonecheck_mail::message::EmailMessage;
use tonecheck_mail::transport::{ConfiguredTransport, Delivery, MailSettings, MailTransport};
use tonecheck_model::comparison::ComparisonTable;

use super::Credentials;

pub async fn run(
    config: &AppConfig,
    credentials: &Credentials,
    input: PathBuf,
    to: Option<String>,
) -> anyhow::Result<()> {
    super::login(config, credentials)?;

    // Refuse to send anything that is not a comparison export.
    let table = ComparisonTable::load_csv(&input)
        .map_err(|e| anyhow::anyhow!("Failed to read results {}: {e}", input.display()))?;
    let csv = table.to_csv_bytes()?;

    let delivery = deliver(config, to.as_deref(), csv).await?;
    report(&delivery);
    Ok(())
}

/// Send the results through the configured transport.
pub async fn deliver(
    config: &AppConfig,
    to: Option<&str>,
    csv: Vec<u8>,
) -> anyhow::Result<Delivery> {
    let settings = MailSettings::from_config_with_recipient(&config.mail, to)?;
    let transport = ConfiguredTransport::from_config(&config.mail, &settings)?;
    send_results(&transport, &settings, csv).await
}

/// Compose the results message and hand it to `transport`.
pub async fn send_results<T: MailTransport>(
    transport: &T,
    settings: &MailSettings,
    csv: Vec<u8>,
) -> anyhow::Result<Delivery> {
    let message = EmailMessage::results(&settings.user, &settings.to, csv)?;
    let delivery = transport.send(&message).await?;
    Ok(delivery)
}

pub fn report(delivery: &Delivery) {
    if delivery.was_sent() {
        println!("Email sent to {}", delivery.recipient);
    } else {
        println!("Email for {} written to the outbox", delivery.recipient);
    }
    println!("  Message-ID: {}", delivery.message_id);
    if let Some(path) = &delivery.location {
        println!("  File: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;
    use tonecheck_common::config::MailConfig;
    use tonecheck_common::error::ToneResult;
    use tonecheck_mail::message::RESULTS_FILENAME;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<EmailMessage>>,
    }

    impl MailTransport for Recording {
        fn send(
            &self,
            message: &EmailMessage,
        ) -> impl Future<Output = ToneResult<Delivery>> + Send {
            self.sent.lock().unwrap().push(message.clone());
            let delivery = Delivery {
                message_id: message.message_id(),
                recipient: message.to.clone(),
                location: None,
            };
            async move { Ok(delivery) }
        }
    }

    fn mail_config() -> MailConfig {
        MailConfig {
            host: Some("smtp.example.com".to_string()),
            user: Some("me@example.com".to_string()),
            password: Some("app-password".to_string()),
            to: None,
            ..MailConfig::default()
        }
    }

    #[tokio::test]
    async fn test_results_go_through_transport() {
        let settings =
            MailSettings::from_config_with_recipient(&mail_config(), Some("you@example.com"))
                .unwrap();
        let transport = Recording::default();

        let delivery = send_results(&transport, &settings, b"text\nhi\n".to_vec())
            .await
            .unwrap();

        assert!(delivery.was_sent());
        assert_eq!(delivery.recipient, "you@example.com");

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "me@example.com");
        assert_eq!(sent[0].attachments[0].filename, RESULTS_FILENAME);
        assert_eq!(sent[0].attachments[0].data, b"text\nhi\n");
    }

    #[tokio::test]
    async fn test_recipient_flag_works_without_configured_to() {
        let dir = std::env::temp_dir().join(format!("tonecheck-cli-outbox-{}", std::process::id()));
        let mut config = AppConfig::default();
        config.mail = MailConfig {
            delivery: tonecheck_common::config::MailDelivery::Outbox,
            outbox_dir: dir.clone(),
            ..mail_config()
        };

        let delivery = deliver(&config, Some("you@example.com"), b"a\n".to_vec())
            .await
            .unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(delivery.recipient, "you@example.com");
        assert!(!delivery.was_sent());
    }

    #[tokio::test]
    async fn test_missing_recipient_is_reported() {
        let mut config = AppConfig::default();
        config.mail = mail_config();
        let err = deliver(&config, None, Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("EMAIL_TO"));
    }
}
