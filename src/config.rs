//! CLI configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via TRANSVAL_CONFIG or --config)
//! 3. Environment variables
//!
//! ```yaml
//! empty_input: reject
//! history_file: .transval_history
//! rule_sets:
//!   order: "1=>2,3;2=>3"
//!   ticket:
//!     - "1=>2"
//!     - "2=>3;3=>1"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use transval_core::{EmptyInputPolicy, Registry, RuleError};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How rule texts without any rules are treated.
    pub empty_input: EmptyInputPolicy,
    /// Rule sets loaded into the registry at startup.
    pub rule_sets: BTreeMap<String, RuleSource>,
    /// REPL history file. Defaults to `$HOME/.transval_history`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
}

/// Rule text for one named rule set: a single text, or fragments merged in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSource {
    Single(String),
    Fragments(Vec<String>),
}

impl RuleSource {
    pub fn fragments(&self) -> &[String] {
        match self {
            RuleSource::Single(rules) => std::slice::from_ref(rules),
            RuleSource::Fragments(fragments) => fragments,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, falling back to TRANSVAL_CONFIG,
    /// then applies environment variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var("TRANSVAL_CONFIG") {
                Ok(path) => Self::from_file(path)?,
                Err(_) => Self::default(),
            },
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(policy) = std::env::var("TRANSVAL_EMPTY_INPUT") {
            match policy.to_lowercase().as_str() {
                "allow" => self.empty_input = EmptyInputPolicy::Allow,
                "reject" => self.empty_input = EmptyInputPolicy::Reject,
                other => tracing::warn!("Ignoring TRANSVAL_EMPTY_INPUT={}", other),
            }
        }
    }

    /// Builds a registry holding every configured rule set.
    pub fn build_registry(&self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::with_policy(self.empty_input);

        for (name, source) in &self.rule_sets {
            for rules in source.fragments() {
                registry
                    .set(name, rules)
                    .map_err(|e| ConfigError::RuleSet {
                        name: name.clone(),
                        source: e,
                    })?;
            }
        }

        if !registry.is_empty() {
            tracing::info!("Loaded {} rule set(s) from config", registry.len());
        }

        Ok(registry)
    }

    /// Returns the REPL history file path.
    pub fn history_path(&self) -> PathBuf {
        self.history_file.clone().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|h| PathBuf::from(h).join(".transval_history"))
                .unwrap_or_else(|_| ".transval_history".into())
        })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {1}", .0.display())]
    Io(PathBuf, std::io::Error),

    #[error("failed to parse config file '{}': {1}", .0.display())]
    Parse(PathBuf, String),

    #[error("invalid rule set '{name}': {source}")]
    RuleSet {
        name: String,
        #[source]
        source: RuleError,
    },
}
