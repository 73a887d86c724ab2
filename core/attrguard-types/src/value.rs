//! Dynamically typed attribute values.
//!
//! A [`Value`] is whatever a host model stores under an attribute name. The
//! variant set is closed: scalars, composites, a date instant, and an
//! explicitly tagged instance used for "instance of" checks.
//!
//! Serde representation (JSON and TOML alike):
//! - scalars, arrays and tables map to the obvious variants
//! - `{"$date": 1700000000000}` or `{"$date": "2023-11-14T22:13:20Z"}` is a [`Value::Date`]
//! - `{"$instance": "Point", "value": {...}}` is a [`Value::Instance`]

use crate::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::cmp::Ordering;
use std::fmt;

const DATE_KEY: &str = "$date";
const INSTANCE_KEY: &str = "$instance";
const INSTANCE_VALUE_KEY: &str = "value";
// Key the `toml` deserializer uses to hand datetimes through serde.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Largest integer an `f64` holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single attribute value.
///
/// Equality is structural: two values are equal when they have the same
/// variant and equal contents. Values carry no identity. `NaN` equals `NaN`,
/// so storing a `NaN` twice is not a change.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent / null.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Milliseconds since the Unix epoch. Millis outside chrono's
    /// representable range are an invalid date.
    Date(i64),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    /// A value tagged with the kind it is an instance of.
    Instance { kind: String, value: Box<Value> },
}

impl Value {
    /// Creates a date value from a UTC instant.
    #[must_use]
    pub fn date(instant: DateTime<Utc>) -> Self {
        Self::Date(instant.timestamp_millis())
    }

    /// Parses a date from RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as
    /// UTC), or a plain `YYYY-MM-DD` (midnight UTC).
    pub fn parse_date(s: &str) -> crate::Result<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Date(dt.timestamp_millis()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self::Date(naive.and_utc().timestamp_millis()));
        }
        if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
                return Ok(Self::Date(midnight.and_utc().timestamp_millis()));
            }
        }
        Err(Error::InvalidDate(s.to_string()))
    }

    /// Wraps a value in an instance tag.
    #[must_use]
    pub fn instance(kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Instance {
            kind: kind.into(),
            value: Box::new(value.into()),
        }
    }

    /// Name of the value's dynamic type, as matched by the `isType` rule.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Instance { .. } => "instance",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for null, the empty string, an empty array and an empty object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::Array(items) => items.is_empty(),
            Self::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the instant for a date value, or `None` if this is not a date
    /// or the millis are out of range.
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(ms) => DateTime::from_timestamp_millis(*ms),
            _ => None,
        }
    }

    /// Length of a string (in chars) or an array (in elements).
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Orders two values of the same scalar kind.
    ///
    /// Numbers, strings, booleans and dates compare within their own kind;
    /// every other pairing is incomparable and returns `None`.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Interprets a decoded map, recognising the `$date` and `$instance` forms.
    fn from_map(mut map: IndexMap<String, Value>) -> crate::Result<Self> {
        if map.len() == 1 {
            let tagged = map.get(DATE_KEY).or_else(|| map.get(TOML_DATETIME_KEY));
            match tagged {
                Some(Self::Number(ms)) => return Ok(Self::Date(*ms as i64)),
                Some(Self::String(s)) => return Self::parse_date(s),
                Some(other) => return Err(Error::InvalidDate(other.to_string())),
                None => {}
            }
        }

        if map.keys().all(|k| k == INSTANCE_KEY || k == INSTANCE_VALUE_KEY) {
            if let Some(Self::String(kind)) = map.get(INSTANCE_KEY) {
                let kind = kind.clone();
                let value = map.shift_remove(INSTANCE_VALUE_KEY).unwrap_or_default();
                return Ok(Self::Instance {
                    kind,
                    value: Box::new(value),
                });
            }
        }

        Ok(Self::Object(map))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (
                Self::Instance { kind: ka, value: va },
                Self::Instance { kind: kb, value: vb },
            ) => ka == kb && va == vb,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Date(_) => match self.as_datetime() {
                Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
                None => f.write_str("Invalid Date"),
            },
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Instance { kind, value } => write!(f, "{kind}({value})"),
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::date(instant)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

// ── Serde ────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(ms) => {
                let mut map = serializer.serialize_map(Some(1))?;
                match self.as_datetime() {
                    Some(dt) => map.serialize_entry(
                        DATE_KEY,
                        &dt.to_rfc3339_opts(SecondsFormat::Millis, true),
                    )?,
                    None => map.serialize_entry(DATE_KEY, ms)?,
                }
                map.end()
            }
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Instance { kind, value } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(INSTANCE_KEY, kind)?;
                map.serialize_entry(INSTANCE_VALUE_KEY, value)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an attribute value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Number(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Value::from_map(map).map_err(de::Error::custom)
    }
}
