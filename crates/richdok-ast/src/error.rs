//! Error types for AST decoding.

use thiserror::Error;

use crate::node::NodeKind;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while decoding the positional wire form of an AST
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The AST root is not a JSON array
    #[error("AST must be an array of nodes, found {found}")]
    NotAnArray { found: String },

    /// A value is not shaped like `[kind, fields]`
    #[error("Node at {path} must be a [kind, fields] pair")]
    NotANode { path: String },

    /// The kind tag is not one of `block`, `entity`, `inline`
    #[error("Unknown node kind '{tag}' at {path}")]
    UnknownKind { path: String, tag: String },

    /// A required positional field is absent
    #[error("{kind} node at {path} is missing its '{field}' field")]
    MissingField {
        path: String,
        kind: NodeKind,
        field: &'static str,
    },

    /// A positional field has the wrong JSON type
    #[error("{kind} node at {path}: field '{field}' must be {expected}")]
    InvalidField {
        path: String,
        kind: NodeKind,
        field: &'static str,
        expected: &'static str,
    },
}

impl SchemaError {
    /// Path of the offending node, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::NotAnArray { .. } => None,
            SchemaError::NotANode { path }
            | SchemaError::UnknownKind { path, .. }
            | SchemaError::MissingField { path, .. }
            | SchemaError::InvalidField { path, .. } => Some(path),
        }
    }
}
