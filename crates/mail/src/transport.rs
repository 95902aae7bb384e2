//! Mail delivery.
//!
//! [`SmtpTransport`] submits over STARTTLS with the configured login.
//! [`OutboxTransport`] writes `.eml` files instead and is selected with
//! `mail.delivery = "outbox"`.

use std::future::Future;
use std::path::PathBuf;

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tonecheck_common::config::{MailConfig, MailDelivery};
use tonecheck_common::error::{ToneError, ToneResult};

use crate::message::EmailMessage;

/// Complete outbound mail settings.
#[derive(Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub to: String,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("to", &self.to)
            .finish()
    }
}

impl MailSettings {
    /// Extract settings from configuration. Every field must be present.
    pub fn from_config(config: &MailConfig) -> ToneResult<Self> {
        Self::from_config_with_recipient(config, None)
    }

    /// Like [`MailSettings::from_config`], with `recipient` standing in for
    /// the configured `to` when given.
    pub fn from_config_with_recipient(
        config: &MailConfig,
        recipient: Option<&str>,
    ) -> ToneResult<Self> {
        let to = recipient.map(str::to_string).or_else(|| config.to.clone());
        let mut missing = Vec::new();
        let mut take = |value: &Option<String>, key: &'static str| -> String {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let host = take(&config.host, "EMAIL_HOST");
        let user = take(&config.user, "EMAIL_USER");
        let password = take(&config.password, "EMAIL_PASS");
        let to = take(&to, "EMAIL_TO");

        if config.port == 0 {
            missing.push("EMAIL_PORT");
        }

        if !missing.is_empty() {
            return Err(ToneError::config(format!(
                "mail settings not set: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            host,
            port: config.port,
            user,
            password,
            to,
        })
    }
}

/// Outcome of handing a message to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub message_id: String,
    pub recipient: String,
    /// Where the message was written, for spooling transports.
    pub location: Option<PathBuf>,
}

impl Delivery {
    /// Whether the message left the machine.
    pub fn was_sent(&self) -> bool {
        self.location.is_none()
    }
}

/// Something that can deliver a composed message.
pub trait MailTransport {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = ToneResult<Delivery>> + Send;
}

/// Spools messages as `.eml` files for an external relay to submit.
///
/// Each file carries an `X-Relay` header naming the configured SMTP
/// endpoint. Credentials are never written.
#[derive(Debug, Clone)]
pub struct OutboxTransport {
    dir: PathBuf,
    relay: Option<String>,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            relay: None,
        }
    }

    pub fn for_settings(dir: impl Into<PathBuf>, settings: &MailSettings) -> Self {
        Self {
            dir: dir.into(),
            relay: Some(format!("{}:{}", settings.host, settings.port)),
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn file_name(message: &EmailMessage) -> String {
        format!(
            "{}-{:09}.eml",
            message.date.format("%Y%m%dT%H%M%S"),
            message.date.timestamp_subsec_nanos()
        )
    }
}

impl MailTransport for OutboxTransport {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = ToneResult<Delivery>> + Send {
        let path = self.dir.join(Self::file_name(message));
        let dir = self.dir.clone();
        let mut document = String::new();
        if let Some(relay) = &self.relay {
            document.push_str(&format!("X-Relay: {relay}\r\n"));
        }
        document.push_str(&message.to_mime());
        let message_id = message.message_id();
        let recipient = message.to.clone();

        async move {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| ToneError::mail(format!("cannot create {}: {e}", dir.display())))?;
            tokio::fs::write(&path, document)
                .await
                .map_err(|e| ToneError::mail(format!("cannot write {}: {e}", path.display())))?;

            tracing::info!(
                path = %path.display(),
                to = %recipient,
                "Message spooled to outbox"
            );

            Ok(Delivery {
                message_id,
                recipient,
                location: Some(path),
            })
        }
    }
}

/// Authenticated SMTP submission with STARTTLS.
#[derive(Clone)]
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    relay: String,
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("relay", &self.relay)
            .finish()
    }
}

impl SmtpTransport {
    /// Build a transport for the relay. No connection is made until the
    /// first message is sent.
    pub fn new(settings: &MailSettings) -> ToneResult<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| ToneError::mail(format!("invalid relay {}: {e}", settings.host)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            mailer,
            relay: format!("{}:{}", settings.host, settings.port),
        })
    }

    pub fn relay(&self) -> &str {
        &self.relay
    }
}

/// SMTP envelope for a composed message.
fn envelope(message: &EmailMessage) -> ToneResult<Envelope> {
    let parse = |address: &str| -> ToneResult<Address> {
        address
            .trim()
            .parse()
            .map_err(|e| ToneError::mail(format!("'{address}' is not a valid address: {e}")))
    };
    let from = parse(&message.from)?;
    let to = parse(&message.to)?;
    Envelope::new(Some(from), vec![to]).map_err(|e| ToneError::mail(e.to_string()))
}

impl MailTransport for SmtpTransport {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = ToneResult<Delivery>> + Send {
        let mailer = self.mailer.clone();
        let relay = self.relay.clone();
        let envelope = envelope(message);
        let document = message.to_mime();
        let message_id = message.message_id();
        let recipient = message.to.clone();

        async move {
            let envelope = envelope?;
            mailer
                .send_raw(&envelope, document.as_bytes())
                .await
                .map_err(|e| ToneError::mail(format!("delivery via {relay} failed: {e}")))?;

            tracing::info!(relay = %relay, to = %recipient, "Message sent");

            Ok(Delivery {
                message_id,
                recipient,
                location: None,
            })
        }
    }
}

/// The transport chosen by `mail.delivery`.
#[derive(Debug, Clone)]
pub enum ConfiguredTransport {
    Smtp(SmtpTransport),
    Outbox(OutboxTransport),
}

impl ConfiguredTransport {
    pub fn from_config(config: &MailConfig, settings: &MailSettings) -> ToneResult<Self> {
        Ok(match config.delivery {
            MailDelivery::Smtp => Self::Smtp(SmtpTransport::new(settings)?),
            MailDelivery::Outbox => {
                Self::Outbox(OutboxTransport::for_settings(&config.outbox_dir, settings))
            }
        })
    }
}

impl MailTransport for ConfiguredTransport {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = ToneResult<Delivery>> + Send {
        async move {
            match self {
                Self::Smtp(transport) => transport.send(message).await,
                Self::Outbox(transport) => transport.send(message).await,
            }
        }
    }
}
