mod github;
mod ledger;
mod llm;
mod store;

pub use github::*;
pub use ledger::*;
pub use llm::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.store.api_base.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "store.api_base".into(),
                message: "api_base must not be empty".into(),
            });
        }

        // The gist id may come from config or from the env var at runtime;
        // an empty config field is only worth a note.
        if self.store.gist_id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "store.gist_id".into(),
                message: format!(
                    "gist_id not set; will be read from ${} at startup",
                    self.store.gist_id_env
                ),
            });
        }

        if self.store.timeout_ms == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "store.timeout_ms".into(),
                message: "timeout_ms must be greater than 0".into(),
            });
        }

        if self.ledger.max_update_attempts == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "ledger.max_update_attempts".into(),
                message: "max_update_attempts must be at least 1".into(),
            });
        }

        if self.github.api_base.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "github.api_base".into(),
                message: "api_base must not be empty".into(),
            });
        }

        if self.github.max_diff_lines == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "github.max_diff_lines".into(),
                message: "max_diff_lines must be at least 1".into(),
            });
        }

        if self.llm.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        if self.llm.model.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.model".into(),
                message: "model must not be empty".into(),
            });
        }

        errors
    }
}
