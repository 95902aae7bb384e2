//! Demo login gate.
//!
//! A single string comparison against a configured pair. It keeps casual
//! users out of the tool and nothing more.

use tonecheck_common::config::AuthConfig;

/// Decides whether an identity/secret pair is accepted.
pub trait CredentialCheck {
    fn verify(&self, identity: &str, secret: &str) -> bool;
}

/// One accepted pair. The identity is compared trimmed and
/// case-insensitively, the secret exactly.
#[derive(Clone)]
pub struct StaticCredentials {
    identity: String,
    secret: String,
}

impl StaticCredentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.email.clone(), config.password.clone())
    }
}

impl CredentialCheck for StaticCredentials {
    fn verify(&self, identity: &str, secret: &str) -> bool {
        identity.trim().to_lowercase() == self.identity.trim().to_lowercase()
            && secret == self.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_case_insensitive() {
        let creds = StaticCredentials::new("Demo@Example.com", "s3cret");
        assert!(creds.verify("  demo@example.COM ", "s3cret"));
    }

    #[test]
    fn test_secret_is_exact() {
        let creds = StaticCredentials::new("demo@example.com", "s3cret");
        assert!(!creds.verify("demo@example.com", "S3cret"));
        assert!(!creds.verify("demo@example.com", " s3cret"));
        assert!(!creds.verify("other@example.com", "s3cret"));
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        };
        assert!(StaticCredentials::from_config(&config).verify("A@B.C", "pw"));
    }
}
