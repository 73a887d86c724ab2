//! The built-in tester catalog.
//!
//! Every tester is a pure function of the candidate value, its rule argument
//! and the attribute name. `None` means the value passed; `Some(message)`
//! carries a human-readable failure that names the value, the constraint and
//! the attribute.

use attrguard_types::Value;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt::Display;
use std::sync::LazyLock;

/// The closed set of built-in rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TesterKind {
    Range,
    IsType,
    Regex,
    InList,
    IsKey,
    MaxLength,
    MinLength,
    ToEqual,
    MinValue,
    MaxValue,
    IsInstance,
}

impl TesterKind {
    pub const ALL: [TesterKind; 11] = [
        Self::Range,
        Self::IsType,
        Self::Regex,
        Self::InList,
        Self::IsKey,
        Self::MaxLength,
        Self::MinLength,
        Self::ToEqual,
        Self::MinValue,
        Self::MaxValue,
        Self::IsInstance,
    ];

    /// Canonical (camelCase) rule name, as reported in errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::IsType => "isType",
            Self::Regex => "regex",
            Self::InList => "inList",
            Self::IsKey => "isKey",
            Self::MaxLength => "maxLength",
            Self::MinLength => "minLength",
            Self::ToEqual => "toEqual",
            Self::MinValue => "minValue",
            Self::MaxValue => "maxValue",
            Self::IsInstance => "isInstance",
        }
    }

    /// Registry lookup by declared name. Accepts camelCase and snake_case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "range" => Self::Range,
            "isType" | "is_type" => Self::IsType,
            "regex" => Self::Regex,
            "inList" | "in_list" => Self::InList,
            "isKey" | "is_key" => Self::IsKey,
            "maxLength" | "max_length" => Self::MaxLength,
            "minLength" | "min_length" => Self::MinLength,
            "toEqual" | "to_equal" => Self::ToEqual,
            "minValue" | "min_value" => Self::MinValue,
            "maxValue" | "max_value" => Self::MaxValue,
            "isInstance" | "is_instance" => Self::IsInstance,
            _ => return None,
        };
        Some(kind)
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern compiles"));

/// Replaces `{n}` with the n-th argument. Placeholders without a matching
/// argument are left as written.
pub fn format_message(template: &str, args: &[&dyn Display]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map_or_else(|| caps[0].to_string(), |arg| arg.to_string())
        })
        .into_owned()
}

macro_rules! message {
    ($template:literal, $($arg:expr),+ $(,)?) => {
        format_message($template, &[$(&$arg as &dyn Display),+])
    };
}

fn join(items: impl IntoIterator<Item = impl Display>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fails unless `value` is a number within `[min, max]`.
pub fn range(value: &Value, min: f64, max: f64, attribute: &str) -> Option<String> {
    let inside = value.as_f64().is_some_and(|n| n >= min && n <= max);
    (!inside).then(|| {
        message!("{0} is not within the range {1} - {2} for {3}", value, min, max, attribute)
    })
}

/// `"date"` requires a date with a representable instant; any other type
/// name must equal [`Value::type_name`].
pub fn is_type(value: &Value, type_name: &str, attribute: &str) -> Option<String> {
    if type_name == "date" {
        return value
            .as_datetime()
            .is_none()
            .then(|| message!("Expected {0} to be a valid date for {1}", value, attribute));
    }
    (value.type_name() != type_name).then(|| {
        message!("Expected {0} to be of type {1} for {2}", value, type_name, attribute)
    })
}

/// Strings match on their content, everything else on its display text.
pub fn regex(value: &Value, pattern: &Regex, attribute: &str) -> Option<String> {
    let text = match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    };
    (!pattern.is_match(&text)).then(|| {
        message!("{0} did not match pattern /{1}/ for {2}", value, pattern.as_str(), attribute)
    })
}

pub fn in_list(value: &Value, list: &[Value], attribute: &str) -> Option<String> {
    (!list.contains(value)).then(|| {
        message!("{0} is not part of [{1}] for {2}", value, join(list), attribute)
    })
}

/// Fails unless `value` is a string naming one of `keys`.
pub fn is_key(value: &Value, keys: &[String], attribute: &str) -> Option<String> {
    let present = value.as_str().is_some_and(|k| keys.iter().any(|key| key == k));
    (!present).then(|| {
        message!("{0} is not one of [{1}] for {2}", value, join(keys), attribute)
    })
}

pub fn max_length(value: &Value, limit: usize, attribute: &str) -> Option<String> {
    value.length().filter(|len| *len > limit).map(|_| {
        message!("{0} is longer than {1} for {2}", value, limit, attribute)
    })
}

pub fn min_length(value: &Value, limit: usize, attribute: &str) -> Option<String> {
    value.length().filter(|len| *len < limit).map(|_| {
        message!("{0} is shorter than {1} for {2}", value, limit, attribute)
    })
}

pub fn to_equal(value: &Value, example: &Value, attribute: &str) -> Option<String> {
    (value != example).then(|| {
        message!("{0} is not the same as {1} for {2}", value, example, attribute)
    })
}

/// Boundary-inclusive; incomparable values pass.
pub fn min_value(value: &Value, limit: &Value, attribute: &str) -> Option<String> {
    value.compare(limit).filter(|ord| ord.is_lt()).map(|_| {
        message!("{0} is smaller than {1} for {2}", value, limit, attribute)
    })
}

/// Boundary-inclusive; incomparable values pass.
pub fn max_value(value: &Value, limit: &Value, attribute: &str) -> Option<String> {
    value
        .compare(limit)
        .filter(|ord| ord.is_gt())
        .map(|_| message!("{0} exceeds {1} for {2}", value, limit, attribute))
}

pub fn is_instance(value: &Value, kind: &str, attribute: &str) -> Option<String> {
    let matches = matches!(value, Value::Instance { kind: k, .. } if k == kind);
    (!matches).then(|| {
        message!("{0} is not an instance of {1} for {2}", value, kind, attribute)
    })
}
