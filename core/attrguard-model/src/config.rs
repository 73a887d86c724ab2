//! Declarative model schemas.
//!
//! A schema file names each attribute's rules, its default, and whether
//! invalid values fall back to defaults:
//!
//! ```toml
//! use_defaults = true
//!
//! [defaults]
//! title = "test title"
//!
//! [validators.title]
//! is_type = "string"
//! max_length = 20
//! min_length = 2
//! ```
//!
//! Rule order inside `[validators.<attribute>]` is the order the rules run.

use crate::error::{ConfigError, ConfigResult};
use attrguard_types::AttributeBag;
use attrguard_validator::{RuleDeclaration, RuleSpec, RuleSpecs, ValidatorConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Model schema as written in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Replace invalid values with `defaults`.
    #[serde(default, alias = "useDefaults")]
    pub use_defaults: bool,
    /// Initial and fallback values by attribute.
    #[serde(default)]
    pub defaults: AttributeBag,
    /// Rule declarations by attribute.
    #[serde(default)]
    pub validators: IndexMap<String, RuleDeclaration>,
}

impl ModelConfig {
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Loads a schema file. `.json` files are read as JSON, anything else
    /// as TOML.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_toml_str(&contents)?
        };

        info!(
            path = %path.display(),
            attributes = config.validators.len(),
            "loaded model schema"
        );
        Ok(config)
    }

    /// Compiles the rule declarations.
    pub fn rule_specs(&self) -> ConfigResult<RuleSpecs> {
        let specs = RuleSpec::parse_all(&self.validators)?;
        debug!(
            rules = specs.values().map(RuleSpec::len).sum::<usize>(),
            "compiled rule declarations"
        );
        Ok(specs)
    }

    #[must_use]
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            use_defaults: self.use_defaults,
        }
    }
}
