//! Validation results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One failed rule on one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeError {
    pub attribute: String,
    pub rule: String,
    pub message: String,
}

impl AttributeError {
    pub fn new(
        attribute: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.attribute, self.rule, self.message)
    }
}

/// Every failure from one validation call, flat and ordered: by attribute in
/// assignment order, then by rule in declaration order.
///
/// A validation call that passes returns `Ok(())` instead of an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed: {}", summarize(.0))]
pub struct ValidationErrors(Vec<AttributeError>);

fn summarize(errors: &[AttributeError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: AttributeError) {
        self.0.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeError> {
        self.0.iter()
    }

    /// Errors reported for `attribute`.
    pub fn for_attribute<'a, 'b>(
        &'a self,
        attribute: &'b str,
    ) -> impl Iterator<Item = &'a AttributeError> + 'b
    where
        'a: 'b,
    {
        self.0.iter().filter(move |e| e.attribute == attribute)
    }

    /// Distinct failing attribute names, in first-failure order.
    #[must_use]
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for error in &self.0 {
            if !names.contains(&error.attribute.as_str()) {
                names.push(&error.attribute);
            }
        }
        names
    }

    /// Rule names that failed for `attribute`, in order.
    #[must_use]
    pub fn rules_for(&self, attribute: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.attribute == attribute)
            .map(|e| e.rule.as_str())
            .collect()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<AttributeError> {
        self.0
    }
}

impl From<Vec<AttributeError>> for ValidationErrors {
    fn from(errors: Vec<AttributeError>) -> Self {
        Self(errors)
    }
}

impl Extend<AttributeError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = AttributeError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = AttributeError;
    type IntoIter = std::vec::IntoIter<AttributeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a AttributeError;
    type IntoIter = std::slice::Iter<'a, AttributeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidationErrors {
        ValidationErrors::from(vec![
            AttributeError::new("title", "isType", "false is not a string"),
            AttributeError::new("count", "range", "9 is out of range"),
            AttributeError::new("title", "minLength", "too short"),
        ])
    }

    #[test]
    fn rules_for_outlives_the_attribute_name() {
        let errors = sample();
        let rules = {
            let name = String::from("title");
            errors.rules_for(&name)
        };
        assert_eq!(rules, vec!["isType", "minLength"]);
    }

    #[test]
    fn for_attribute_filters_in_order() {
        let errors = sample();
        let messages: Vec<&str> = errors
            .for_attribute("title")
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(messages, vec!["false is not a string", "too short"]);
        assert_eq!(errors.attributes(), vec!["title", "count"]);
    }
}
