//! Declarative form configuration
//!
//! A `FormConfig` describes a form's initial values and the built-in rules
//! applied to each field. It is stored as JSON.

use crate::error::ConfigError;
use crate::state::Values;
use crate::store::FormStore;
use crate::validation::{Rule, RuleSet, ValidatorRegistry};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Initial values and validation rules of one form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Every field of the form with its starting value
    #[serde(default)]
    pub initial_values: Values,
    /// Field id -> rules, checked in order
    #[serde(default)]
    pub validators: HashMap<String, RuleSet>,
}

impl FormConfig {
    /// Sign-up form used by the demo when no config file exists
    pub fn signup() -> Self {
        Self {
            initial_values: Values::from([
                ("email".to_string(), json!("")),
                ("name".to_string(), json!("")),
                ("age".to_string(), json!(0)),
                ("newsletter".to_string(), json!(false)),
            ]),
            validators: HashMap::from([
                (
                    "email".to_string(),
                    RuleSet(vec![Rule::required(), Rule::email()]),
                ),
                (
                    "name".to_string(),
                    RuleSet(vec![Rule::required(), Rule::max_length(40)]),
                ),
                (
                    "age".to_string(),
                    RuleSet(vec![Rule::range(Some(13.0), Some(130.0))]),
                ),
            ]),
        }
    }

    /// Default config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "formstore", "formstore")
            .map(|dirs| dirs.config_dir().join("form.json"))
    }

    /// Load from the default path, falling back to [`FormConfig::signup`]
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_or_signup(&path),
            None => Ok(Self::signup()),
        }
    }

    /// Load `path` if it exists, otherwise the sign-up form
    pub fn load_or_signup(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::signup())
        }
    }

    /// Load and parse the config file at `path`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded form config");
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    /// Build a validator registry from the configured rules
    pub fn registry(&self) -> ValidatorRegistry {
        self.validators
            .iter()
            .fold(ValidatorRegistry::new(), |registry, (id, rules)| {
                registry.with(id.clone(), rules.clone())
            })
    }

    /// Build a store holding the initial values, validated by the rules
    pub fn into_store(self) -> FormStore {
        let registry = self.registry();
        FormStore::with_validators(self.initial_values, registry)
    }
}
