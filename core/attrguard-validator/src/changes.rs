//! Change detection between a model's stored attributes and an assignment.

use attrguard_types::{AttributeBag, Value};

/// Names from `incoming`, in its order, whose value is new or differs from
/// `previous`.
///
/// Attributes being set for the first time count as changed. Comparison is
/// by value, so assigning an equal value is not a change.
pub fn changed_attributes<'a>(previous: &AttributeBag, incoming: &'a AttributeBag) -> Vec<&'a str> {
    changed_attributes_by(incoming, |name| previous.get(name))
}

/// Like [`changed_attributes`], with the stored value of each attribute
/// looked up through `previous`.
pub fn changed_attributes_by<'a, 'p, F>(incoming: &'a AttributeBag, previous: F) -> Vec<&'a str>
where
    F: Fn(&str) -> Option<&'p Value>,
{
    incoming
        .iter()
        .filter(|(name, value)| previous(name.as_str()) != Some(*value))
        .map(|(name, _)| name.as_str())
        .collect()
}
