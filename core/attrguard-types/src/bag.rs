use crate::{Error, Value};
use indexmap::IndexMap;

/// Attribute name → value, iterated in insertion order.
///
/// Used both for a model's stored attributes and for the partial set of
/// attributes passed to a single assignment.
pub type AttributeBag = IndexMap<String, Value>;

/// Builds a bag from `(name, value)` pairs, keeping their order.
pub fn bag<K, I>(pairs: I) -> AttributeBag
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Decodes a JSON object into a bag. Key order follows the document.
pub fn bag_from_json(json: &str) -> crate::Result<AttributeBag> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::NotAnObject(other.type_name())),
    }
}
