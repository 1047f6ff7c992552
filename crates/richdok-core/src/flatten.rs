//! Block tree flattening
//!
//! Visiting a block yields the block plus the results of its nested block
//! children, each of which carries its own children in turn. Flattening
//! happens once, over the whole forest, in pre-order.

use crate::content::ContentBlock;

/// A compiled block together with its nested blocks
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTree {
    pub block: ContentBlock,
    pub children: Vec<BlockTree>,
}

impl BlockTree {
    /// Number of blocks in this tree
    pub fn block_count(&self) -> usize {
        1 + self.children.iter().map(BlockTree::block_count).sum::<usize>()
    }
}

/// Flatten a forest of block trees into document order
///
/// Each block is immediately followed by its own descendants, before the
/// next sibling.
pub fn flatten(trees: Vec<BlockTree>) -> Vec<ContentBlock> {
    let mut out = Vec::with_capacity(trees.iter().map(BlockTree::block_count).sum());
    // Pre-order walk over an explicit stack.
    let mut stack: Vec<BlockTree> = trees.into_iter().rev().collect();
    while let Some(tree) = stack.pop() {
        out.push(tree.block);
        stack.extend(tree.children.into_iter().rev());
    }
    out
}
