//! Error types for rule declarations.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while turning a declarative rule table into a [`RuleSpec`](crate::RuleSpec).
///
/// Unknown rule names are not errors; they are skipped.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A known rule was given an argument of the wrong shape.
    #[error("invalid argument for rule `{rule}` on `{attribute}`: {reason}")]
    InvalidArgument {
        attribute: String,
        rule: String,
        reason: String,
    },

    /// The `regex` rule's pattern does not compile.
    #[error("invalid pattern for `{attribute}`: {source}")]
    InvalidPattern {
        attribute: String,
        #[source]
        source: regex::Error,
    },
}
