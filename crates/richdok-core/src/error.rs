//! Error types for compilation.

use richdok_ast::{NodeKind, SchemaError};
use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors that abort a compilation
#[derive(Debug, Error)]
pub enum CompileError {
    /// The AST could not be decoded from its wire form
    #[error("Malformed AST: {0}")]
    Schema(#[from] SchemaError),

    /// A root node is not a block
    #[error("Root node {index} is an {kind} node; the top level must contain blocks only")]
    NonBlockRoot { index: usize, kind: NodeKind },

    /// Invalid compiler configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error while loading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CompileError {
    fn from(err: toml::de::Error) -> Self {
        CompileError::Config(err.to_string())
    }
}
