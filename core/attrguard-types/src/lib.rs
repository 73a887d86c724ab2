//! Core value types for attrguard.
//!
//! This crate defines the data that flows between a host model and the
//! validation engine:
//! - [`Value`]: a dynamically typed attribute value
//! - [`AttributeBag`]: an insertion-ordered mapping of attribute name to value
//!
//! Nothing here knows about rules or validation; those live in
//! `attrguard-validator`.

mod bag;
mod value;

pub use bag::{AttributeBag, bag, bag_from_json};
pub use value::Value;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or decoding values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("expected an object of attributes, found {0}")]
    NotAnObject(&'static str),
}
