//! Rule declarations.
//!
//! A [`RuleSpec`] is the ordered set of rules attached to one attribute. It
//! can be assembled with the builder methods or parsed from a declarative
//! table (`tester name → argument`), which is how schema files describe it.

use crate::error::{SchemaError, SchemaResult};
use crate::testers::{self, TesterKind};
use attrguard_types::Value;
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Declaration key for the custom predicate.
pub const CUSTOM_RULE_NAME: &str = "fn";

/// Rule sets by attribute name.
pub type RuleSpecs = IndexMap<String, RuleSpec>;

/// A declarative rule table, as read from a schema file.
pub type RuleDeclaration = IndexMap<String, Value>;

type CustomCheck = dyn Fn(&Value, &str) -> Option<String> + Send + Sync;

/// A user-supplied predicate. Receives the candidate value and the
/// attribute name; returns a failure message or `None`.
#[derive(Clone)]
pub struct CustomRule {
    name: String,
    check: Arc<CustomCheck>,
}

impl CustomRule {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self::named(CUSTOM_RULE_NAME, check)
    }

    /// A custom predicate reported under its own rule name.
    pub fn named<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value, attribute: &str) -> Option<String> {
        (self.check)(value, attribute)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One rule with its typed argument.
#[derive(Debug, Clone)]
pub enum Rule {
    Range { min: f64, max: f64 },
    IsType(String),
    Regex(Regex),
    InList(Vec<Value>),
    IsKey(Vec<String>),
    MaxLength(usize),
    MinLength(usize),
    ToEqual(Value),
    MinValue(Value),
    MaxValue(Value),
    IsInstance(String),
    Custom(CustomRule),
}

impl Rule {
    /// The built-in kind, or `None` for a custom predicate.
    #[must_use]
    pub fn kind(&self) -> Option<TesterKind> {
        let kind = match self {
            Self::Range { .. } => TesterKind::Range,
            Self::IsType(_) => TesterKind::IsType,
            Self::Regex(_) => TesterKind::Regex,
            Self::InList(_) => TesterKind::InList,
            Self::IsKey(_) => TesterKind::IsKey,
            Self::MaxLength(_) => TesterKind::MaxLength,
            Self::MinLength(_) => TesterKind::MinLength,
            Self::ToEqual(_) => TesterKind::ToEqual,
            Self::MinValue(_) => TesterKind::MinValue,
            Self::MaxValue(_) => TesterKind::MaxValue,
            Self::IsInstance(_) => TesterKind::IsInstance,
            Self::Custom(_) => return None,
        };
        Some(kind)
    }

    /// Name reported in [`AttributeError::rule`](crate::AttributeError).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Custom(custom) => custom.name(),
            other => other.kind().map_or(CUSTOM_RULE_NAME, TesterKind::name),
        }
    }

    /// Runs the rule's tester against `value`.
    pub fn test(&self, value: &Value, attribute: &str) -> Option<String> {
        match self {
            Self::Range { min, max } => testers::range(value, *min, *max, attribute),
            Self::IsType(type_name) => testers::is_type(value, type_name, attribute),
            Self::Regex(pattern) => testers::regex(value, pattern, attribute),
            Self::InList(list) => testers::in_list(value, list, attribute),
            Self::IsKey(keys) => testers::is_key(value, keys, attribute),
            Self::MaxLength(limit) => testers::max_length(value, *limit, attribute),
            Self::MinLength(limit) => testers::min_length(value, *limit, attribute),
            Self::ToEqual(example) => testers::to_equal(value, example, attribute),
            Self::MinValue(limit) => testers::min_value(value, limit, attribute),
            Self::MaxValue(limit) => testers::max_value(value, limit, attribute),
            Self::IsInstance(kind) => testers::is_instance(value, kind, attribute),
            Self::Custom(custom) => custom.check(value, attribute),
        }
    }

    /// Builds a rule from a declared argument.
    ///
    /// `range` without a `[min, max]` pair and `inList` without a list
    /// constrain nothing and come back as `None`.
    fn from_declared(
        kind: TesterKind,
        arg: &Value,
        attribute: &str,
    ) -> SchemaResult<Option<Self>> {
        let invalid = |reason: &str| SchemaError::InvalidArgument {
            attribute: attribute.to_string(),
            rule: kind.name().to_string(),
            reason: reason.to_string(),
        };

        let rule = match kind {
            TesterKind::Range => match arg.as_array() {
                Some([Value::Number(min), Value::Number(max)]) => Self::Range {
                    min: *min,
                    max: *max,
                },
                _ => {
                    debug!(attribute, rule = kind.name(), "argument is not [min, max], skipping");
                    return Ok(None);
                }
            },
            TesterKind::IsType => {
                Self::IsType(expect_str(arg).ok_or_else(|| invalid("expected a type name"))?)
            }
            TesterKind::Regex => {
                let pattern = arg.as_str().ok_or_else(|| invalid("expected a pattern string"))?;
                let re = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                    attribute: attribute.to_string(),
                    source,
                })?;
                Self::Regex(re)
            }
            TesterKind::InList => {
                let Some(list) = arg.as_array() else {
                    debug!(attribute, rule = kind.name(), "argument is not a list, skipping");
                    return Ok(None);
                };
                Self::InList(list.to_vec())
            }
            TesterKind::IsKey => Self::IsKey(
                arg.as_object()
                    .ok_or_else(|| invalid("expected a table"))?
                    .keys()
                    .cloned()
                    .collect(),
            ),
            TesterKind::MaxLength => {
                Self::MaxLength(expect_len(arg).ok_or_else(|| invalid(NOT_A_LENGTH))?)
            }
            TesterKind::MinLength => {
                Self::MinLength(expect_len(arg).ok_or_else(|| invalid(NOT_A_LENGTH))?)
            }
            TesterKind::ToEqual => Self::ToEqual(arg.clone()),
            TesterKind::MinValue => Self::MinValue(arg.clone()),
            TesterKind::MaxValue => Self::MaxValue(arg.clone()),
            TesterKind::IsInstance => {
                Self::IsInstance(expect_str(arg).ok_or_else(|| invalid("expected a kind name"))?)
            }
        };
        Ok(Some(rule))
    }
}

const NOT_A_LENGTH: &str = "expected a non-negative integer";

fn expect_str(arg: &Value) -> Option<String> {
    arg.as_str().map(str::to_string)
}

fn expect_len(arg: &Value) -> Option<usize> {
    arg.as_f64()
        .filter(|n| *n >= 0.0 && n.fract() == 0.0)
        .map(|n| n as usize)
}

/// The rules for one attribute, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    rules: Vec<Rule>,
    empty_ok: bool,
}

impl RuleSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a declarative table for `attribute`.
    ///
    /// Unknown names are skipped, and so are `range` and `inList` entries
    /// whose argument has the wrong shape. `emptyOk` / `empty_ok` sets the
    /// attribute-wide empty flag. The custom key `fn` cannot carry a function
    /// in a table and is skipped as well; attach custom predicates with
    /// [`RuleSpec::custom`].
    pub fn from_declaration(
        attribute: &str,
        declaration: &RuleDeclaration,
    ) -> SchemaResult<Self> {
        let mut spec = Self::new();
        for (name, arg) in declaration {
            if name == "emptyOk" || name == "empty_ok" {
                spec.empty_ok = arg.as_bool().ok_or_else(|| SchemaError::InvalidArgument {
                    attribute: attribute.to_string(),
                    rule: "emptyOk".to_string(),
                    reason: "expected a boolean".to_string(),
                })?;
                continue;
            }
            if name == CUSTOM_RULE_NAME {
                debug!(attribute, "custom rule declared without a function, skipping");
                continue;
            }
            match TesterKind::from_name(name) {
                Some(kind) => spec.rules.extend(Rule::from_declared(kind, arg, attribute)?),
                None => debug!(attribute, rule = %name, "unknown rule, skipping"),
            }
        }
        Ok(spec)
    }

    /// Parses a whole `attribute → table` map.
    pub fn parse_all(
        declarations: &IndexMap<String, RuleDeclaration>,
    ) -> SchemaResult<RuleSpecs> {
        declarations
            .iter()
            .map(|(attribute, decl)| {
                let spec = Self::from_declaration(attribute, decl)?;
                Ok((attribute.clone(), spec))
            })
            .collect()
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty_ok(&self) -> bool {
        self.empty_ok
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    // ── builder ──────────────────────────────────────────────────

    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn empty_ok(mut self, empty_ok: bool) -> Self {
        self.empty_ok = empty_ok;
        self
    }

    #[must_use]
    pub fn range(self, min: f64, max: f64) -> Self {
        self.rule(Rule::Range { min, max })
    }

    #[must_use]
    pub fn is_type(self, type_name: impl Into<String>) -> Self {
        self.rule(Rule::IsType(type_name.into()))
    }

    #[must_use]
    pub fn regex(self, pattern: Regex) -> Self {
        self.rule(Rule::Regex(pattern))
    }

    #[must_use]
    pub fn in_list<T: Into<Value>>(self, list: impl IntoIterator<Item = T>) -> Self {
        self.rule(Rule::InList(list.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub fn is_key<K: Into<String>>(self, keys: impl IntoIterator<Item = K>) -> Self {
        self.rule(Rule::IsKey(keys.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub fn max_length(self, limit: usize) -> Self {
        self.rule(Rule::MaxLength(limit))
    }

    #[must_use]
    pub fn min_length(self, limit: usize) -> Self {
        self.rule(Rule::MinLength(limit))
    }

    #[must_use]
    pub fn to_equal(self, example: impl Into<Value>) -> Self {
        self.rule(Rule::ToEqual(example.into()))
    }

    #[must_use]
    pub fn min_value(self, limit: impl Into<Value>) -> Self {
        self.rule(Rule::MinValue(limit.into()))
    }

    #[must_use]
    pub fn max_value(self, limit: impl Into<Value>) -> Self {
        self.rule(Rule::MaxValue(limit.into()))
    }

    #[must_use]
    pub fn is_instance(self, kind: impl Into<String>) -> Self {
        self.rule(Rule::IsInstance(kind.into()))
    }

    #[must_use]
    pub fn custom<F>(self, check: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.rule(Rule::Custom(CustomRule::new(check)))
    }
}
