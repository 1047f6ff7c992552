//! richdok-core - Document ASTs to rich-text content
//!
//! Core library for richdok, compiling an AST of block, entity and inline
//! nodes into ordered content blocks with per-character styles and entity
//! references, plus the table of entities those references point to.
//!
//! # Example
//!
//! ```
//! use richdok_ast::Node;
//! use richdok_core::{compile, CompilerConfig};
//!
//! let ast = vec![
//!     Node::block("header-one").with_child(Node::text("Title")),
//!     Node::block("unstyled").with_child(Node::inline(["BOLD"], "Body")),
//! ];
//!
//! let doc = compile(&ast, &CompilerConfig::default()).unwrap();
//! assert_eq!(doc.plain_text_default(), "Title\nBody");
//! ```

pub mod compiler;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod flatten;
pub mod keys;
pub mod raw;
pub mod registry;

// Re-export main types and functions
pub use compiler::{
    compile, compile_json, compile_with_keys, root_blocks, Compiler, VisitContext,
};
pub use config::{CompilerConfig, KeyConfig, KeyStrategy};
pub use content::{CharacterMetadata, ContentBlock};
pub use document::CompiledDocument;
pub use error::{CompileError, Result};
pub use keys::{BlockKey, KeyGenerator, RandomKeys, SequentialKeys};
pub use raw::RawDocument;
pub use registry::{EntityId, EntityInstance, EntityMap, EntityRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
