//! Expands a [`RuleSpec`] into the concrete rules to execute.

use crate::rules::{Rule, RuleSpec};
use attrguard_types::Value;

/// A rule ready to run against one attribute.
///
/// Borrowed from its [`RuleSpec`] and rebuilt on every validation pass, so
/// edits to the spec between calls always take effect.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRule<'a> {
    pub name: &'a str,
    pub rule: &'a Rule,
    /// Attribute-wide: identical for every rule resolved from one spec.
    pub empty_ok: bool,
}

impl ResolvedRule<'_> {
    pub fn test(&self, value: &Value, attribute: &str) -> Option<String> {
        self.rule.test(value, attribute)
    }

    /// True when the rule failed but the failure does not count because the
    /// value is empty and the attribute allows that.
    #[must_use]
    pub fn suppresses(&self, value: &Value) -> bool {
        self.empty_ok && value.is_empty()
    }
}

/// Resolves `spec` in declaration order.
pub fn resolve(spec: &RuleSpec) -> Vec<ResolvedRule<'_>> {
    let empty_ok = spec.is_empty_ok();
    spec.rules()
        .iter()
        .map(|rule| ResolvedRule {
            name: rule.name(),
            rule,
            empty_ok,
        })
        .collect()
}
