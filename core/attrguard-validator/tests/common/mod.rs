//! Shared test helpers for validator tests.

#![allow(dead_code)]

use attrguard_types::{AttributeBag, Value};
use attrguard_validator::{ModelHost, RuleSpec, RuleSpecs, ValidationErrors};

/// A minimal host that records every raw write and fallback notification.
#[derive(Debug, Default)]
pub struct TestHost {
    pub attributes: AttributeBag,
    pub specs: Option<RuleSpecs>,
    pub defaults: Option<AttributeBag>,
    pub raw_writes: Vec<(String, Value)>,
    pub fallback_calls: Vec<ValidationErrors>,
}

impl TestHost {
    pub fn new(specs: RuleSpecs) -> Self {
        Self {
            specs: Some(specs),
            ..Self::default()
        }
    }

    pub fn with_attributes(mut self, attributes: AttributeBag) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_defaults(mut self, defaults: AttributeBag) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }
}

impl ModelHost for TestHost {
    fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    fn rule_specs(&self) -> Option<&RuleSpecs> {
        self.specs.as_ref()
    }

    fn defaults(&self) -> Option<&AttributeBag> {
        self.defaults.as_ref()
    }

    fn set_raw(&mut self, attribute: &str, value: Value) {
        self.raw_writes.push((attribute.to_string(), value.clone()));
        self.attributes.insert(attribute.to_string(), value);
    }

    fn on_fallback(&mut self, errors: &ValidationErrors) {
        self.fallback_calls.push(errors.clone());
    }
}

/// Builds a spec map from `(attribute, spec)` pairs, keeping their order.
pub fn specs<const N: usize>(pairs: [(&str, RuleSpec); N]) -> RuleSpecs {
    pairs
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect()
}
