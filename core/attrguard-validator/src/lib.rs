//! Declarative attribute validation.
//!
//! A host model declares, per attribute, a [`RuleSpec`]: an ordered list of
//! rules such as `isType`, `range` or `maxLength`. On every assignment the
//! [`Validator`]:
//!
//! 1. finds the attributes whose value actually changes ([`changed_attributes`]),
//! 2. resolves each one's rules ([`resolve`]) and runs them in order,
//! 3. collects every failure into [`ValidationErrors`],
//! 4. optionally writes declared defaults for the failing attributes
//!    ([`apply_defaults`]) and notifies the host.
//!
//! The host side of the contract is the [`ModelHost`] trait. Rules never
//! see more than one attribute's value.

mod changes;
mod error;
mod fallback;
mod host;
mod outcome;
mod resolver;
mod rules;
mod runner;
pub mod testers;

pub use changes::{changed_attributes, changed_attributes_by};
pub use error::{SchemaError, SchemaResult};
pub use fallback::apply_defaults;
pub use host::ModelHost;
pub use outcome::{AttributeError, ValidationErrors};
pub use resolver::{ResolvedRule, resolve};
pub use rules::{CUSTOM_RULE_NAME, CustomRule, Rule, RuleDeclaration, RuleSpec, RuleSpecs};
pub use runner::{ValidateOptions, Validator, ValidatorConfig, run_rules};
pub use testers::TesterKind;
