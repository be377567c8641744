//! Runtime settings.
//!
//! Loaded once at startup from a YAML file (or built in code for tests) and
//! treated as read-only afterwards. Every section defaults so a missing or
//! empty file yields a working development configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete assistant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Kill switch. A disabled assistant rejects every request before any
    /// classification or data access.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Confirmation token behavior.
    #[serde(default)]
    pub confirmation: ConfirmationConfig,

    /// Text Oracle endpoint settings.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AssistantConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(ConfigError::Parse)
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confirmation: ConfirmationConfig::default(),
            oracle: OracleConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

/// Confirmation token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Seconds a pending action token stays valid after issuance.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

/// Text Oracle (LLM) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL of an OpenAI-compatible chat completions endpoint.
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,

    /// Model name sent with each request.
    #[serde(default = "default_oracle_model")]
    pub model: String,

    /// Environment variable holding the API key. Read at client construction,
    /// never stored in the config file.
    #[serde(default = "default_oracle_api_key_env")]
    pub api_key_env: String,

    /// Hard timeout per oracle call. On timeout the caller falls back to its
    /// documented default; nothing blocks past this.
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_oracle_base_url(),
            model: default_oracle_model(),
            api_key_env: default_oracle_api_key_env(),
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

/// Audit logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Where audit entries go.
    #[serde(default)]
    pub backend: AuditBackend,

    /// Log file path when the backend is `file`.
    #[serde(default = "default_audit_file")]
    pub file_path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: AuditBackend::default(),
            file_path: default_audit_file(),
        }
    }
}

/// Audit storage backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditBackend {
    #[default]
    Console,
    File,
    Null,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

fn default_enabled() -> bool {
    true
}

fn default_token_ttl_secs() -> i64 {
    300
}

fn default_oracle_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_oracle_model() -> String {
    "gpt-4o".to_string()
}

fn default_oracle_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_oracle_timeout_secs() -> u64 {
    20
}

fn default_audit_file() -> String {
    "audit.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = AssistantConfig::from_yaml("{}").unwrap();
        assert!(config.enabled);
        assert_eq!(config.confirmation.token_ttl_secs, 300);
        assert_eq!(config.oracle.model, "gpt-4o");
        assert_eq!(config.audit.backend, AuditBackend::Console);
    }

    #[test]
    fn sections_can_be_partially_overridden() {
        let yaml = r#"
enabled: false
confirmation:
  token_ttl_secs: 60
audit:
  backend: file
  file_path: /var/log/frontdesk/audit.log
"#;
        let config = AssistantConfig::from_yaml(yaml).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.confirmation.token_ttl_secs, 60);
        assert_eq!(config.audit.backend, AuditBackend::File);
        assert_eq!(config.audit.file_path, "/var/log/frontdesk/audit.log");
        // Untouched section keeps its defaults.
        assert_eq!(config.oracle.timeout_secs, 20);
    }

    #[test]
    fn unknown_backend_fails_to_parse() {
        assert!(AssistantConfig::from_yaml("audit:\n  backend: kafka\n").is_err());
    }
}
