//! Report building for the `attrguard` command line tool.

use attrguard_model::{ConfigResult, Model, ModelConfig, SetOptions};
use attrguard_types::AttributeBag;
use attrguard_validator::AttributeError;
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of one `attrguard check` run, printed as JSON.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CheckReport {
    pub valid: bool,
    pub errors: Vec<AttributeError>,
    /// Model attributes after the check, fallback writes included.
    pub attributes: AttributeBag,
}

/// Builds a model from `config`, stores `state` without validation, then
/// applies `input` as one validated set.
pub fn check(
    config: &ModelConfig,
    state: Option<AttributeBag>,
    input: AttributeBag,
    use_defaults: Option<bool>,
) -> ConfigResult<CheckReport> {
    let mut model = Model::from_config(config)?;

    if let Some(state) = state {
        debug!(attributes = state.len(), "loading stored state");
        model.store(state);
    }

    let options = SetOptions {
        validate: true,
        use_defaults,
    };
    let errors = match model.set(input, options) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.into_inner(),
    };
    info!(failures = errors.len(), "check finished");

    Ok(CheckReport {
        valid: errors.is_empty(),
        errors,
        attributes: model.attributes().clone(),
    })
}
