//! richdok-ast - Abstract Syntax Tree definitions
//!
//! This crate provides the node types that describe a document before it is
//! compiled into a rich-text content model, together with the positional
//! JSON schema those nodes travel in.

pub mod block;
pub mod error;
pub mod inline;
pub mod node;
pub mod schema;

pub use block::{BlockNode, EntityNode, Mutability};
pub use error::SchemaError;
pub use inline::{InlineNode, StyleSet};
pub use node::{Data, Node, NodeKind};
pub use schema::{decode_ast, decode_node, encode_ast, encode_node};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "1.0.0");
    }
}
