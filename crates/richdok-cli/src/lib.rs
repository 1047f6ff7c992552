//! richdok CLI - Command-line interface library
//!
//! This library provides the CLI functionality for richdok:
//! - Compile: Turn a JSON AST into a raw rich-text document
//! - Check: Validate a JSON AST without compiling it
//!
//! # Binary Usage
//!
//! ```bash
//! # Compile an AST, writing the raw document to stdout
//! richdok compile article.json
//!
//! # Deterministic keys and a human-readable summary
//! richdok compile article.json --sequential-keys --format text
//!
//! # Check an AST for structural problems
//! richdok check article.json --format json
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    check_command, check_file, compile_command, compile_file, init_logging, render_text, run_cli,
    CheckReport, NodeCounts, OutputFormat,
};
