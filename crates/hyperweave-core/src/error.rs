//! Error types for Hyperweave Core

use thiserror::Error;

/// Result type alias using Hyperweave's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Hyperweave error types
///
/// Every variant is a local precondition violation raised synchronously by
/// the call that violated it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid parent element: {0}")]
    InvalidParent(String),

    #[error("Invalid hypergraph element: {0}")]
    InvalidElement(String),

    #[error("Parent element cannot be itself (composition loop): {0}")]
    SelfParenting(String),

    #[error("Invalid relation direction: {0}")]
    InvalidRelationDirection(String),

    #[error("Attribute not found: {0}")]
    KeyNotFound(String),

    #[error("Child not found: {child} in {parent}")]
    ChildNotFound { parent: String, child: String },

    #[error("Duplicate GUID: {0}")]
    DuplicateGuid(String),

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
