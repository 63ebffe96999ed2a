use serde::{Deserialize, Serialize};

use std::fmt;

/// Storage backend a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretProvider {
    /// Environment variable.
    Environment,
    /// OS keychain (macOS Keychain / Linux Secret Service).
    Keychain,
    /// Interactive prompt (typed in for this session only).
    Prompt,
}

impl fmt::Display for SecretProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretProvider::Environment => write!(f, "environment"),
            SecretProvider::Keychain => write!(f, "keychain"),
            SecretProvider::Prompt => write!(f, "prompt"),
        }
    }
}

/// A wrapper that redacts secret values in Debug and Display output.
///
/// Use this to wrap any `String` that might contain sensitive data.
/// The actual value is accessible via `.expose()`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Redacted(String);

impl Redacted {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Show masked representation: last 4 chars visible.
    pub fn masked(&self) -> String {
        if self.0.len() <= 4 {
            "****".to_string()
        } else {
            format!("****{}", &self.0[self.0.len() - 4..])
        }
    }
}

impl fmt::Debug for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Redacted(\"***\")")
    }
}

impl fmt::Display for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_debug_hides_value() {
        let secret = Redacted::new("AIza-abc123xyz");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("abc123xyz"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_redacted_display_hides_value() {
        let secret = Redacted::new("AIza-abc123xyz");
        let display = format!("{}", secret);
        assert!(!display.contains("abc123xyz"));
    }

    #[test]
    fn test_redacted_expose() {
        let secret = Redacted::new("AIza-abc123xyz");
        assert_eq!(secret.expose(), "AIza-abc123xyz");
    }

    #[test]
    fn test_redacted_masked() {
        let secret = Redacted::new("AIza-abc123xyz");
        assert_eq!(secret.masked(), "****3xyz");
    }

    #[test]
    fn test_redacted_masked_short() {
        let secret = Redacted::new("ab");
        assert_eq!(secret.masked(), "****");
    }

    #[test]
    fn test_secret_provider_display() {
        assert_eq!(SecretProvider::Environment.to_string(), "environment");
        assert_eq!(SecretProvider::Keychain.to_string(), "keychain");
        assert_eq!(SecretProvider::Prompt.to_string(), "prompt");
    }
}
