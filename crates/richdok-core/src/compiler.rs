//! Tree compiler
//!
//! Walks the AST depth-first and turns it into content blocks:
//!
//! - a **block** node becomes a [`ContentBlock`] whose text is the
//!   concatenation of its inline and entity children; its block children
//!   become nested [`BlockTree`]s one depth level further down
//! - an **entity** node registers itself in the [`EntityRegistry`] and
//!   annotates every character of its children with the new id
//! - an **inline** node contributes its text, one [`CharacterMetadata`]
//!   per character
//!
//! Entities are registered the moment the walk reaches them, so ids follow
//! document order. When entities nest, a character carries only the
//! innermost entity. A block found inside an entity is hoisted into the
//! enclosing block's nested blocks; it does not inherit the entity.
//!
//! # Example
//!
//! ```
//! use richdok_ast::{Mutability, Node};
//! use richdok_core::{compile, CompilerConfig};
//!
//! let ast = vec![Node::block("unstyled")
//!     .with_child(Node::inline(["BOLD"], "Hello "))
//!     .with_child(
//!         Node::entity("LINK", Mutability::Mutable)
//!             .with_data("url", "https://example.com")
//!             .with_child(Node::text("world")),
//!     )];
//!
//! let doc = compile(&ast, &CompilerConfig::default()).unwrap();
//! assert_eq!(doc.blocks[0].text, "Hello world");
//! assert_eq!(doc.entities.len(), 1);
//! ```

use richdok_ast::{decode_ast, BlockNode, EntityNode, InlineNode, Node};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::CompilerConfig;
use crate::content::{CharacterMetadata, ContentBlock};
use crate::document::CompiledDocument;
use crate::error::{CompileError, Result};
use crate::flatten::{flatten, BlockTree};
use crate::keys::KeyGenerator;
use crate::registry::{EntityId, EntityRegistry};

/// Traversal state handed down to each child visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitContext {
    /// Depth given to a block visited in this context
    pub depth: usize,
    /// Entity annotating text visited in this context
    pub current_entity: Option<EntityId>,
}

impl VisitContext {
    /// Context of a root node
    pub fn root() -> Self {
        Self::default()
    }

    /// Context for the children of a block at this context's depth
    pub fn enter_block(self) -> Self {
        Self {
            depth: self.depth + 1,
            current_entity: None,
        }
    }

    /// Context for the children of the entity `id`
    pub fn enter_entity(self, id: EntityId) -> Self {
        Self {
            depth: self.depth,
            current_entity: Some(id),
        }
    }
}

/// Text contributed to the enclosing block by an inline or entity node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextFragment {
    pub text: String,
    pub characters: Vec<CharacterMetadata>,
    /// Blocks found inside an entity, hoisted to the enclosing block
    pub blocks: Vec<BlockTree>,
}

impl TextFragment {
    fn append(&mut self, other: TextFragment) {
        self.text.push_str(&other.text);
        self.characters.extend(other.characters);
        self.blocks.extend(other.blocks);
    }
}

/// Result of visiting one node
#[derive(Debug, Clone, PartialEq)]
pub enum Visited {
    Block(BlockTree),
    Text(TextFragment),
}

/// One compilation run: configuration, key source and entity registry
pub struct Compiler<K = Box<dyn KeyGenerator>> {
    config: CompilerConfig,
    keys: K,
    registry: EntityRegistry,
}

impl Compiler {
    /// Create a compiler using the key strategy from `config`
    pub fn new(config: CompilerConfig) -> Self {
        let keys = config.key_generator();
        Self::with_keys(config, keys)
    }
}

impl<K: KeyGenerator> Compiler<K> {
    /// Create a compiler with an explicit key generator
    pub fn with_keys(config: CompilerConfig, keys: K) -> Self {
        Self {
            config,
            keys,
            registry: EntityRegistry::new(),
        }
    }

    /// Compile a whole AST
    ///
    /// Every root must be a block. An empty AST yields the canonical
    /// single empty block.
    pub fn compile(mut self, ast: &[Node]) -> Result<CompiledDocument> {
        if ast.is_empty() {
            debug!("empty AST, emitting a single empty block");
            return Ok(CompiledDocument::empty(
                &mut self.keys,
                &self.config.empty_block_type,
            ));
        }

        let roots = root_blocks(ast)?;

        debug!(roots = roots.len(), "compiling AST");
        let trees: Vec<BlockTree> = roots
            .into_iter()
            .map(|block| self.visit_block(block, VisitContext::root()))
            .collect();

        let blocks = flatten(trees);
        debug!(
            blocks = blocks.len(),
            entities = self.registry.len(),
            "compiled AST"
        );

        Ok(CompiledDocument {
            blocks,
            entities: self.registry.into_table(),
        })
    }

    /// Visit any node
    pub fn visit(&mut self, node: &Node, ctx: VisitContext) -> Visited {
        match node {
            Node::Block(block) => Visited::Block(self.visit_block(block, ctx)),
            Node::Entity(entity) => Visited::Text(self.visit_entity(entity, ctx)),
            Node::Inline(inline) => Visited::Text(visit_inline(inline, ctx)),
        }
    }

    fn visit_block(&mut self, node: &BlockNode, ctx: VisitContext) -> BlockTree {
        let child_ctx = ctx.enter_block();
        let mut content = TextFragment::default();
        let mut children = Vec::new();

        for child in &node.children {
            match self.visit(child, child_ctx) {
                Visited::Block(tree) => children.push(tree),
                Visited::Text(fragment) => {
                    content.text.push_str(&fragment.text);
                    content.characters.extend(fragment.characters);
                    children.extend(fragment.blocks);
                }
            }
        }

        let block = ContentBlock {
            key: self.keys.next_key(),
            text: content.text,
            block_type: node.block_type.clone(),
            character_list: content.characters,
            depth: ctx.depth,
            data: node.data.clone(),
        };
        trace!(
            key = %block.key,
            block_type = %block.block_type,
            depth = block.depth,
            nested = children.len(),
            "emitted block"
        );

        BlockTree { block, children }
    }

    fn visit_entity(&mut self, node: &EntityNode, ctx: VisitContext) -> TextFragment {
        // Registered before any child is visited: ids follow document order.
        let id = self.registry.create(
            node.entity_type.clone(),
            node.mutability,
            node.data.clone(),
        );
        trace!(%id, entity_type = %node.entity_type, "registered entity");

        let child_ctx = ctx.enter_entity(id);
        let mut fragment = TextFragment::default();
        for child in &node.children {
            match self.visit(child, child_ctx) {
                Visited::Block(tree) => fragment.blocks.push(tree),
                Visited::Text(text) => fragment.append(text),
            }
        }
        fragment
    }
}

fn visit_inline(node: &InlineNode, ctx: VisitContext) -> TextFragment {
    let metadata = CharacterMetadata::new(node.styles.clone(), ctx.current_entity);
    TextFragment {
        text: node.text.clone(),
        characters: vec![metadata; node.text.chars().count()],
        blocks: Vec::new(),
    }
}

/// The root blocks of an AST, or the first root that is not a block
pub fn root_blocks(ast: &[Node]) -> Result<Vec<&BlockNode>> {
    ast.iter()
        .enumerate()
        .map(|(index, node)| match node {
            Node::Block(block) => Ok(block),
            other => Err(CompileError::NonBlockRoot {
                index,
                kind: other.kind(),
            }),
        })
        .collect()
}

/// Compile an AST using the key strategy from `config`
pub fn compile(ast: &[Node], config: &CompilerConfig) -> Result<CompiledDocument> {
    Compiler::new(config.clone()).compile(ast)
}

/// Compile an AST with an explicit key generator
pub fn compile_with_keys<K: KeyGenerator>(
    ast: &[Node],
    config: &CompilerConfig,
    keys: K,
) -> Result<CompiledDocument> {
    Compiler::with_keys(config.clone(), keys).compile(ast)
}

/// Decode an AST from its JSON wire form and compile it
pub fn compile_json(value: &Value, config: &CompilerConfig) -> Result<CompiledDocument> {
    let ast = decode_ast(value)?;
    compile(&ast, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SequentialKeys;
    use richdok_ast::{Mutability, NodeKind};
    use serde_json::json;

    fn compile_seq(ast: &[Node]) -> CompiledDocument {
        compile_with_keys(ast, &CompilerConfig::default(), SequentialKeys::default()).unwrap()
    }

    fn texts(doc: &CompiledDocument) -> Vec<&str> {
        doc.blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_empty_ast_is_single_empty_block() {
        let doc = compile_seq(&[]);
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].text, "");
        assert!(doc.blocks[0].character_list.is_empty());
        assert_eq!(doc.blocks[0].block_type, "unstyled");
        assert!(doc.entities.is_empty());
    }

    #[test]
    fn test_empty_block_type_from_config() {
        let config = CompilerConfig {
            empty_block_type: "paragraph".to_string(),
            ..CompilerConfig::default()
        };
        let doc = compile(&[], &config).unwrap();
        assert_eq!(doc.blocks[0].block_type, "paragraph");
    }

    #[test]
    fn test_block_without_children() {
        let doc = compile_seq(&[Node::block("header-one").with_data("id", 3)]);
        let block = &doc.blocks[0];
        assert_eq!(block.text, "");
        assert!(block.character_list.is_empty());
        assert_eq!(block.block_type, "header-one");
        assert_eq!(block.depth, 0);
        assert_eq!(block.data.get("id"), Some(&json!(3)));
    }

    #[test]
    fn test_style_application() {
        let doc = compile_seq(&[Node::block("unstyled").with_child(Node::inline(["BOLD"], "hi"))]);
        let chars = &doc.blocks[0].character_list;
        assert_eq!(chars.len(), 2);
        for c in chars {
            assert_eq!(c.style.iter().collect::<Vec<_>>(), vec!["BOLD"]);
            assert_eq!(c.entity, None);
        }
    }

    #[test]
    fn test_entity_wrapping() {
        let doc = compile_seq(&[Node::block("unstyled").with_child(
            Node::entity("LINK", Mutability::Mutable)
                .with_data("url", "x")
                .with_child(Node::inline(Vec::<String>::new(), "go")),
        )]);

        let block = &doc.blocks[0];
        assert_eq!(block.text, "go");
        assert_eq!(doc.entities.len(), 1);
        let (id, entity) = doc.entities.iter().next().unwrap();
        assert_eq!(entity.entity_type, "LINK");
        assert_eq!(entity.mutability, Mutability::Mutable);
        assert_eq!(entity.data.get("url"), Some(&json!("x")));
        assert!(block.character_list.iter().all(|c| c.entity == Some(*id)));
    }

    #[test]
    fn test_flattening_order_and_depth() {
        let ast = vec![
            Node::block("unstyled")
                .with_child(Node::text("x"))
                .with_child(Node::block("unstyled").with_child(Node::text("y"))),
            Node::block("unstyled").with_child(Node::text("z")),
        ];
        let doc = compile_seq(&ast);

        assert_eq!(texts(&doc), vec!["x", "y", "z"]);
        let depths: Vec<usize> = doc.blocks.iter().map(|b| b.depth).collect();
        assert_eq!(depths, vec![0, 1, 0]);
    }

    #[test]
    fn test_text_after_nested_block_joins_parent() {
        let ast = vec![Node::block("unordered-list-item")
            .with_child(Node::text("a"))
            .with_child(Node::block("unordered-list-item").with_child(Node::text("nested")))
            .with_child(Node::text("b"))];
        let doc = compile_seq(&ast);
        assert_eq!(texts(&doc), vec!["ab", "nested"]);
    }

    #[test]
    fn test_keys_minted_after_children() {
        let ast = vec![Node::block("unstyled").with_child(Node::block("unstyled"))];
        let doc = compile_seq(&ast);
        assert_eq!(doc.blocks[0].key.as_str(), "b1");
        assert_eq!(doc.blocks[1].key.as_str(), "b0");
    }

    #[test]
    fn test_entity_ids_follow_document_order() {
        let link = |url: &str, text: &str| {
            Node::entity("LINK", Mutability::Mutable)
                .with_data("url", url)
                .with_child(Node::text(text))
        };
        let ast = vec![
            Node::block("unstyled")
                .with_child(link("a", "A"))
                .with_child(Node::block("unstyled").with_child(link("b", "B"))),
            Node::block("unstyled").with_child(link("c", "C")),
        ];
        let doc = compile_seq(&ast);

        let urls: Vec<&Value> = doc
            .entities
            .values()
            .map(|e| e.data.get("url").unwrap())
            .collect();
        assert_eq!(urls, vec![&json!("a"), &json!("b"), &json!("c")]);
        assert_eq!(doc.blocks[0].entity_at(0), Some(EntityId(0)));
        assert_eq!(doc.blocks[1].entity_at(0), Some(EntityId(1)));
        assert_eq!(doc.blocks[2].entity_at(0), Some(EntityId(2)));
    }

    #[test]
    fn test_nested_entities_innermost_wins() {
        let ast = vec![Node::block("unstyled").with_child(
            Node::entity("LINK", Mutability::Mutable)
                .with_child(Node::text("a"))
                .with_child(Node::entity("MENTION", Mutability::Immutable).with_child(Node::text("b")))
                .with_child(Node::text("c")),
        )];
        let doc = compile_seq(&ast);
        let block = &doc.blocks[0];

        assert_eq!(block.text, "abc");
        assert_eq!(block.entity_at(0), Some(EntityId(0)));
        assert_eq!(block.entity_at(1), Some(EntityId(1)));
        assert_eq!(block.entity_at(2), Some(EntityId(0)));
        assert_eq!(doc.entities[&EntityId(1)].entity_type, "MENTION");
    }

    #[test]
    fn test_block_inside_entity_is_hoisted() {
        let ast = vec![Node::block("unstyled").with_child(
            Node::entity("LINK", Mutability::Mutable)
                .with_child(Node::text("link"))
                .with_child(Node::block("atomic").with_child(Node::text("inner"))),
        )];
        let doc = compile_seq(&ast);

        assert_eq!(texts(&doc), vec!["link", "inner"]);
        assert_eq!(doc.blocks[1].depth, 1);
        assert_eq!(doc.blocks[1].entity_at(0), None);
    }

    #[test]
    fn test_entity_context_does_not_cross_blocks() {
        let ctx = VisitContext::root().enter_entity(EntityId(4));
        assert_eq!(ctx.depth, 0);
        assert_eq!(ctx.enter_block().current_entity, None);
        assert_eq!(ctx.enter_block().depth, 1);
    }

    #[test]
    fn test_non_block_root_rejected() {
        let ast = vec![Node::block("unstyled"), Node::text("loose")];
        let err = compile(&ast, &CompilerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::NonBlockRoot {
                index: 1,
                kind: NodeKind::Inline
            }
        ));
    }

    #[test]
    fn test_root_blocks_reports_first_offender() {
        let ast = vec![
            Node::block("unstyled"),
            Node::entity("LINK", Mutability::Mutable),
            Node::text("loose"),
        ];
        let err = root_blocks(&ast).unwrap_err();
        assert!(matches!(
            err,
            CompileError::NonBlockRoot {
                index: 1,
                kind: NodeKind::Entity
            }
        ));
        assert_eq!(root_blocks(&ast[..1]).unwrap().len(), 1);
    }

    #[test]
    fn test_multibyte_text_length() {
        let doc = compile_seq(&[Node::block("unstyled").with_child(Node::text("héllo ✓"))]);
        assert_eq!(doc.blocks[0].character_list.len(), 7);
    }

    #[test]
    fn test_compile_json() {
        let doc = compile_json(
            &json!([
                ["block", ["header-two", "k", {}, [["inline", [["ITALIC"], "Title"]]]]]
            ]),
            &CompilerConfig::default(),
        )
        .unwrap();
        assert_eq!(doc.blocks[0].block_type, "header-two");
        assert!(doc.blocks[0].character_list[0].has_style("ITALIC"));
    }

    #[test]
    fn test_compile_json_unknown_kind() {
        let err = compile_json(&json!([["section", []]]), &CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, CompileError::Schema(_)));
        assert!(err.to_string().contains("Unknown node kind 'section'"));
    }
}
