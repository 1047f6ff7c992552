//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use richdok_ast::{decode_ast, Node};
use richdok_core::{
    compile, root_blocks, CompileError, CompiledDocument, CompilerConfig, KeyStrategy, RawDocument,
};

/// Environment variable holding a tracing filter (e.g. `richdok_core=trace`)
pub const LOG_ENV: &str = "RICHDOK_LOG";

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for tool consumption
    #[default]
    Json,
}

#[derive(Parser)]
#[command(name = "richdok")]
#[command(author, version, about = "Compile document ASTs into rich-text content", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON AST into a raw rich-text document
    Compile {
        /// Input AST file (JSON)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compiler configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (json or text)
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Use deterministic sequential block keys
        #[arg(long)]
        sequential_keys: bool,
    },

    /// Check a JSON AST for structural problems
    Check {
        /// Input AST file (JSON)
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compile {
            input,
            output,
            config,
            format,
            sequential_keys,
        } => {
            compile_command(
                &input,
                output.as_deref(),
                config.as_deref(),
                format,
                sequential_keys,
            )?;
        }
        Commands::Check { input, format } => {
            check_command(&input, format)?;
        }
    }

    Ok(())
}

/// Install the stderr tracing subscriber
///
/// `RICHDOK_LOG` takes precedence; otherwise the level follows `verbosity`.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_ast(input: &Path) -> Result<serde_json::Value> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Input is not valid JSON: {}", input.display()))
}

/// Load the compiler configuration, falling back to defaults
fn load_config(config: Option<&Path>, sequential_keys: bool) -> Result<CompilerConfig> {
    let mut settings = match config {
        Some(path) => CompilerConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => CompilerConfig::default(),
    };
    if sequential_keys {
        settings.keys.strategy = KeyStrategy::Sequential;
    }
    Ok(settings)
}

/// Read, decode and compile an AST file
pub fn compile_file(input: &Path, config: &CompilerConfig) -> Result<CompiledDocument> {
    let value = read_ast(input)?;
    let ast = decode_ast(&value)
        .with_context(|| format!("Malformed AST in {}", input.display()))?;
    debug!(file = %input.display(), roots = ast.len(), "decoded AST");

    compile(&ast, config).with_context(|| format!("Failed to compile {}", input.display()))
}

/// Execute the compile command
pub fn compile_command(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    format: OutputFormat,
    sequential_keys: bool,
) -> Result<()> {
    let settings = load_config(config, sequential_keys)?;
    let doc = compile_file(input, &settings)?;
    info!(
        blocks = doc.block_count(),
        entities = doc.entities.len(),
        "compiled {}",
        input.display()
    );

    let rendered = match format {
        OutputFormat::Json => RawDocument::from(&doc)
            .to_json_pretty()
            .context("Failed to serialize document to JSON")?,
        OutputFormat::Text => render_text(&doc),
    };

    match output {
        Some(path) => {
            fs::write(path, rendered.as_bytes())
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!("Created: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Human-readable summary of a compiled document
pub fn render_text(doc: &CompiledDocument) -> String {
    let mut out = String::new();

    for (i, block) in doc.blocks.iter().enumerate() {
        let indent = "  ".repeat(block.depth);
        let _ = writeln!(
            out,
            "{}[{}] {} ({})",
            indent, i, block.block_type, block.key
        );
        let _ = writeln!(out, "{}    {:?}", indent, block.text);
        for style in block.styles().iter() {
            let ranges: Vec<String> = block
                .find_style_ranges(style)
                .iter()
                .map(|(start, end)| format!("{}..{}", start, end))
                .collect();
            let _ = writeln!(out, "{}    {}: {}", indent, style, ranges.join(", "));
        }
        for (start, end, id) in block.find_entity_ranges() {
            let _ = writeln!(out, "{}    entity {}: {}..{}", indent, id, start, end);
        }
    }

    if !doc.entities.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Entities:");
        for (id, entity) in &doc.entities {
            let _ = writeln!(
                out,
                "  {}: {} ({}) {}",
                id,
                entity.entity_type,
                entity.mutability,
                serde_json::Value::Object(entity.data.clone())
            );
        }
    }

    out.trim_end().to_string()
}

/// Number of nodes of each kind in an AST
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeCounts {
    pub blocks: usize,
    pub entities: usize,
    pub inlines: usize,
}

impl NodeCounts {
    fn tally(nodes: &[Node]) -> Self {
        let mut counts = NodeCounts::default();
        let mut stack: Vec<&Node> = nodes.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Block(_) => counts.blocks += 1,
                Node::Entity(_) => counts.entities += 1,
                Node::Inline(_) => counts.inlines += 1,
            }
            stack.extend(node.children());
        }
        counts
    }
}

/// Result of checking one AST file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub file: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<NodeCounts>,
}

/// Check an AST file without compiling it
pub fn check_file(input: &Path) -> Result<CheckReport> {
    let value = read_ast(input)?;
    let file = input.display().to_string();

    let report = match decode_ast(&value) {
        Ok(ast) => {
            let nodes = Some(NodeCounts::tally(&ast));
            match root_blocks(&ast) {
                Ok(_) => CheckReport {
                    file,
                    valid: true,
                    error: None,
                    path: None,
                    nodes,
                },
                Err(err) => CheckReport {
                    file,
                    valid: false,
                    path: match &err {
                        CompileError::NonBlockRoot { index, .. } => Some(format!("[{}]", index)),
                        _ => None,
                    },
                    error: Some(err.to_string()),
                    nodes,
                },
            }
        }
        Err(err) => CheckReport {
            file,
            valid: false,
            path: err.path().map(str::to_string),
            error: Some(err.to_string()),
            nodes: None,
        },
    };
    Ok(report)
}

/// Execute the check command
pub fn check_command(input: &Path, format: OutputFormat) -> Result<()> {
    let report = check_file(input)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize check report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => match (&report.error, &report.nodes) {
            (None, Some(nodes)) => println!(
                "✓ {} is valid: {} blocks, {} entities, {} inlines",
                report.file, nodes.blocks, nodes.entities, nodes.inlines
            ),
            (Some(error), _) => println!("✗ {}: {}", report.file, error),
            (None, None) => println!("✓ {} is valid", report.file),
        },
    }

    if !report.valid {
        anyhow::bail!("{} is not a valid AST", input.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use richdok_ast::Mutability;
    use richdok_core::{compile_with_keys, SequentialKeys};

    #[test]
    fn test_render_text() {
        let ast = vec![Node::block("unstyled")
            .with_child(Node::inline(["BOLD"], "Hi "))
            .with_child(
                Node::entity("LINK", Mutability::Mutable)
                    .with_data("url", "u")
                    .with_child(Node::text("there")),
            )
            .with_child(Node::block("unstyled").with_child(Node::text("child")))];
        let doc =
            compile_with_keys(&ast, &CompilerConfig::default(), SequentialKeys::default()).unwrap();

        let text = render_text(&doc);
        assert!(text.contains("[0] unstyled (b1)"));
        assert!(text.contains("\"Hi there\""));
        assert!(text.contains("BOLD: 0..3"));
        assert!(text.contains("entity 0: 3..8"));
        assert!(text.contains("  [1] unstyled (b0)"));
        assert!(text.contains("0: LINK (MUTABLE) {\"url\":\"u\"}"));
    }

    #[test]
    fn test_node_counts() {
        let ast = vec![Node::block("unstyled")
            .with_child(Node::text("a"))
            .with_child(Node::entity("LINK", Mutability::Mutable).with_child(Node::text("b")))];
        assert_eq!(
            NodeCounts::tally(&ast),
            NodeCounts {
                blocks: 1,
                entities: 1,
                inlines: 2
            }
        );
    }

    #[test]
    fn test_load_config_sequential_override() {
        let config = load_config(None, true).unwrap();
        assert_eq!(config.keys.strategy, KeyStrategy::Sequential);
        assert_eq!(load_config(None, false).unwrap(), CompilerConfig::default());
    }
}
