//! MIME message composition.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use tonecheck_common::error::{ToneError, ToneResult};

/// Subject line for emailed results.
pub const RESULTS_SUBJECT: &str = "Sentiment Results";

/// Body text for emailed results.
pub const RESULTS_BODY: &str = "Attached are the sentiment results.";

/// File name of the attached export.
pub const RESULTS_FILENAME: &str = "sentiment_results.csv";

const BASE64_LINE: usize = 76;

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    /// MIME type, e.g. `text/csv`.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn csv(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "text/csv".to_string(),
            data,
        }
    }
}

/// A plain-text message with optional attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
    pub date: DateTime<Utc>,
}

impl EmailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> ToneResult<Self> {
        let message = Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            attachments: Vec::new(),
            date: Utc::now(),
        };
        message.validate()?;
        Ok(message)
    }

    /// The standard "results" message with the CSV export attached.
    pub fn results(from: &str, to: &str, csv: Vec<u8>) -> ToneResult<Self> {
        Ok(Self::new(from, to, RESULTS_SUBJECT, RESULTS_BODY)?
            .with_attachment(Attachment::csv(RESULTS_FILENAME, csv)))
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    fn validate(&self) -> ToneResult<()> {
        for (name, value) in [
            ("from", &self.from),
            ("to", &self.to),
            ("subject", &self.subject),
        ] {
            if value.contains(|c: char| c == '\r' || c == '\n') {
                return Err(ToneError::mail(format!("{name} must be a single line")));
            }
        }
        for address in [&self.from, &self.to] {
            if !address.contains('@') {
                return Err(ToneError::mail(format!("'{address}' is not an email address")));
            }
        }
        Ok(())
    }

    /// Message identifier derived from the timestamp and sender domain.
    pub fn message_id(&self) -> String {
        let domain = self.from.rsplit('@').next().unwrap_or("localhost");
        format!(
            "<{}.{}@{}>",
            self.date.timestamp(),
            self.date.timestamp_subsec_nanos(),
            domain
        )
    }

    fn boundary(&self) -> String {
        format!(
            "tonecheck-{:x}-{:x}",
            self.date.timestamp(),
            self.date.timestamp_subsec_nanos()
        )
    }

    /// Render as an RFC 5322 / MIME document with CRLF line endings.
    pub fn to_mime(&self) -> String {
        let boundary = self.boundary();
        let mut out = String::new();

        push_line(&mut out, &format!("From: {}", self.from));
        push_line(&mut out, &format!("To: {}", self.to));
        push_line(&mut out, &format!("Subject: {}", self.subject));
        push_line(&mut out, &format!("Date: {}", self.date.to_rfc2822()));
        push_line(&mut out, &format!("Message-ID: {}", self.message_id()));
        push_line(&mut out, "MIME-Version: 1.0");
        push_line(
            &mut out,
            &format!("Content-Type: multipart/mixed; boundary=\"{boundary}\""),
        );
        push_line(&mut out, "");

        push_line(&mut out, &format!("--{boundary}"));
        push_line(&mut out, "Content-Type: text/plain; charset=\"utf-8\"");
        push_line(&mut out, "Content-Transfer-Encoding: 8bit");
        push_line(&mut out, "");
        for line in self.body.lines() {
            push_line(&mut out, line);
        }

        for attachment in &self.attachments {
            push_line(&mut out, &format!("--{boundary}"));
            push_line(
                &mut out,
                &format!(
                    "Content-Type: {}; name=\"{}\"",
                    attachment.content_type, attachment.filename
                ),
            );
            push_line(
                &mut out,
                &format!(
                    "Content-Disposition: attachment; filename=\"{}\"",
                    attachment.filename
                ),
            );
            push_line(&mut out, "Content-Transfer-Encoding: base64");
            push_line(&mut out, "");
            let encoded = STANDARD.encode(&attachment.data);
            for chunk in encoded.as_bytes().chunks(BASE64_LINE) {
                // Base64 output is ASCII.
                push_line(&mut out, &String::from_utf8_lossy(chunk));
            }
        }

        push_line(&mut out, &format!("--{boundary}--"));
        out
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}
