//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Analysis defaults.
    pub analysis: AnalysisDefaults,

    /// Demo login pair.
    pub auth: AuthConfig,

    /// Outbound mail settings for emailing results.
    pub mail: MailConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default analysis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Column holding the text in uploaded tables.
    pub text_column: String,

    /// Symmetric neutral band around zero for polarity scores.
    pub deadband: f64,

    /// Rows processed when a full run is not requested.
    pub row_limit: usize,

    /// Normalize text before handing it to scorers.
    pub normalize_before_scoring: bool,

    /// Worker threads for batch scoring (1 = sequential).
    pub parallelism: usize,

    /// Path to a trained classifier model (JSON). The classifier source is
    /// reported unavailable when unset or unreadable.
    pub classifier_model: Option<PathBuf>,
}

/// Credentials accepted by the login gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub email: String,
    pub password: String,
}

/// How results mail leaves the machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailDelivery {
    /// STARTTLS submission to `host:port`, authenticated as `user`.
    #[default]
    Smtp,
    /// Write `.eml` files to `outbox_dir` and send nothing.
    Outbox,
}

impl std::str::FromStr for MailDelivery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "outbox" => Ok(Self::Outbox),
            other => Err(format!("unknown mail delivery '{other}' (expected smtp or outbox)")),
        }
    }
}

/// Outbound mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub delivery: MailDelivery,
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub to: Option<String>,

    /// Directory receiving composed `.eml` messages.
    pub outbox_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tonecheck=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            text_column: "text".to_string(),
            deadband: 0.0,
            row_limit: 500,
            normalize_before_scoring: true,
            parallelism: 1,
            classifier_model: None,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email: "demo@tonecheck.local".to_string(),
            password: "Demo@123".to_string(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            delivery: MailDelivery::Smtp,
            host: None,
            port: 587,
            user: None,
            password: None,
            to: None,
            outbox_dir: data_dir().join("outbox"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults,
    /// then apply environment overrides.
    ///
    /// Problems are returned as warnings rather than logged, since this
    /// runs before the subscriber exists.
    pub fn load() -> (Self, Vec<String>) {
        let (mut config, mut warnings) = Self::load_from(&config_file_path());
        warnings.extend(config.apply_env(|key| std::env::var(key).ok()));
        (config, warnings)
    }

    /// Read a config file. A missing file yields defaults silently; an
    /// unreadable or invalid one yields defaults and a warning.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        if !path.exists() {
            return (Self::default(), Vec::new());
        }
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {e}", path.display()))
            .and_then(|content| {
                serde_json::from_str(&content)
                    .map_err(|e| format!("Failed to parse config at {}: {e}", path.display()))
            });
        match parsed {
            Ok(config) => (config, Vec::new()),
            Err(warning) => (Self::default(), vec![warning]),
        }
    }

    /// Override secrets from an environment lookup. Returns a warning for
    /// each value that could not be used.
    ///
    /// Recognized keys: `TONECHECK_DEMO_EMAIL`, `TONECHECK_DEMO_PASSWORD`,
    /// `TONECHECK_CLASSIFIER_MODEL`, `EMAIL_DELIVERY`, `EMAIL_HOST`,
    /// `EMAIL_PORT`, `EMAIL_USER`, `EMAIL_PASS`, `EMAIL_TO`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(email) = lookup("TONECHECK_DEMO_EMAIL") {
            self.auth.email = email;
        }
        if let Some(password) = lookup("TONECHECK_DEMO_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(model) = lookup("TONECHECK_CLASSIFIER_MODEL") {
            self.analysis.classifier_model = Some(PathBuf::from(model));
        }
        if let Some(delivery) = lookup("EMAIL_DELIVERY") {
            match delivery.parse() {
                Ok(delivery) => self.mail.delivery = delivery,
                Err(e) => warnings.push(format!("Ignoring EMAIL_DELIVERY: {e}")),
            }
        }
        if let Some(host) = lookup("EMAIL_HOST") {
            self.mail.host = Some(host);
        }
        if let Some(port) = lookup("EMAIL_PORT") {
            match port.trim().parse() {
                Ok(port) => self.mail.port = port,
                Err(e) => warnings.push(format!("Ignoring invalid EMAIL_PORT '{port}': {e}")),
            }
        }
        if let Some(user) = lookup("EMAIL_USER") {
            self.mail.user = Some(user);
        }
        if let Some(password) = lookup("EMAIL_PASS") {
            self.mail.password = Some(password);
        }
        if let Some(to) = lookup("EMAIL_TO") {
            self.mail.to = Some(to);
        }

        warnings
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tonecheck").join("config.json")
}

/// Default data directory.
fn data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("tonecheck")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.text_column, "text");
        assert_eq!(config.analysis.deadband, 0.0);
        assert_eq!(config.analysis.row_limit, 500);
        assert_eq!(config.mail.port, 587);
        assert!(config.mail.host.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"analysis": {"deadband": 0.05}}"#).unwrap();
        assert_eq!(config.analysis.deadband, 0.05);
        assert_eq!(config.analysis.text_column, "text");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_PORT", "2525"),
            ("EMAIL_TO", "team@example.com"),
            ("TONECHECK_DEMO_PASSWORD", "hunter2"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.mail.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.mail.port, 2525);
        assert_eq!(config.mail.to.as_deref(), Some("team@example.com"));
        assert_eq!(config.auth.password, "hunter2");
        assert_eq!(config.auth.email, AuthConfig::default().email);
    }

    #[test]
    fn test_invalid_port_is_ignored_with_warning() {
        let mut config = AppConfig::default();
        let warnings =
            config.apply_env(|key| (key == "EMAIL_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.mail.port, 587);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("EMAIL_PORT"));
    }

    #[test]
    fn test_clean_env_has_no_warnings() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(|_| None).is_empty());
    }

    #[test]
    fn test_delivery_from_env() {
        let mut config = AppConfig::default();
        assert_eq!(config.mail.delivery, MailDelivery::Smtp);

        let warnings =
            config.apply_env(|key| (key == "EMAIL_DELIVERY").then(|| "Outbox".to_string()));
        assert!(warnings.is_empty());
        assert_eq!(config.mail.delivery, MailDelivery::Outbox);

        let warnings =
            config.apply_env(|key| (key == "EMAIL_DELIVERY").then(|| "pigeon".to_string()));
        assert_eq!(config.mail.delivery, MailDelivery::Outbox);
        assert!(warnings[0].contains("pigeon"));
    }

    #[test]
    fn test_invalid_config_file_reports_warning() {
        let path = std::env::temp_dir().join(format!("tonecheck-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let (config, warnings) = AppConfig::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(config.analysis.row_limit, 500);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_config_file_is_silent() {
        let (config, warnings) = AppConfig::load_from(Path::new("/no/such/tonecheck.json"));
        assert!(warnings.is_empty());
        assert_eq!(config.analysis.text_column, "text");
    }
}
