//! The validation runner.

use crate::changes::changed_attributes_by;
use crate::fallback::apply_defaults;
use crate::host::ModelHost;
use crate::outcome::{AttributeError, ValidationErrors};
use crate::resolver::resolve;
use crate::rules::RuleSpec;
use attrguard_types::{AttributeBag, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

/// Per-model engine settings, fixed when the [`Validator`] is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Replace invalid values with declared defaults.
    #[serde(default, alias = "useDefaults")]
    pub use_defaults: bool,
}

/// Per-call settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Overrides [`ValidatorConfig::use_defaults`] for this call when set.
    pub use_defaults: Option<bool>,
}

impl ValidateOptions {
    #[must_use]
    pub fn use_defaults(enabled: bool) -> Self {
        Self {
            use_defaults: Some(enabled),
        }
    }
}

/// Runs attribute rules for a host model.
///
/// Holds no state besides its config; one validator may serve any number of
/// calls and hosts.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Whether a call with `options` applies the fallback policy.
    #[must_use]
    pub fn uses_defaults(&self, options: &ValidateOptions) -> bool {
        options.use_defaults.unwrap_or(self.config.use_defaults)
    }

    /// Validates an assignment of `incoming` onto `host`.
    ///
    /// Only attributes that differ from the host's stored values are
    /// checked. On failure, and if the fallback policy is enabled, declared
    /// defaults are written into the host before the errors are returned.
    pub fn validate<H>(
        &self,
        host: &mut H,
        incoming: &AttributeBag,
        options: &ValidateOptions,
    ) -> Result<(), ValidationErrors>
    where
        H: ModelHost + ?Sized,
    {
        let _span = debug_span!("validate", attributes = incoming.len()).entered();

        let errors = self.check(&*host, incoming);
        if errors.is_empty() {
            trace!("assignment valid");
            return Ok(());
        }

        debug!(failures = errors.len(), "assignment invalid");
        if self.uses_defaults(options) {
            return Err(apply_defaults(host, errors));
        }
        Err(errors)
    }

    /// Runs the rules for the changed attributes of `incoming` without
    /// touching the host. Returns every failure.
    pub fn check<H>(&self, host: &H, incoming: &AttributeBag) -> ValidationErrors
    where
        H: ModelHost + ?Sized,
    {
        let mut errors = ValidationErrors::new();
        let Some(specs) = host.rule_specs() else {
            return errors;
        };

        for attribute in changed_attributes_by(incoming, move |name| host.previous(name)) {
            let (Some(spec), Some(value)) = (specs.get(attribute), incoming.get(attribute)) else {
                continue;
            };
            errors.extend(run_rules(attribute, value, spec));
        }
        errors
    }
}

/// Runs every rule of `spec` against `value`, in order, and returns the
/// failures that count.
pub fn run_rules(attribute: &str, value: &Value, spec: &RuleSpec) -> Vec<AttributeError> {
    let mut failures = Vec::new();
    for rule in resolve(spec) {
        let Some(message) = rule.test(value, attribute) else {
            continue;
        };
        if rule.suppresses(value) {
            trace!(attribute, rule = rule.name, "failure ignored for empty value");
            continue;
        }
        debug!(attribute, rule = rule.name, %message, "rule failed");
        failures.push(AttributeError::new(attribute, rule.name, message));
    }
    failures
}
