use crate::convert::{ConvertOptions, from_tree, to_tree};
use crate::editing::commands::{Cmd, execute};
use crate::editing::invariants::{InvariantError, check_page};
use crate::editing::patch::Patch;
use crate::models::{Block, BlockId, BlockMap, Node, block_map, top_level_blocks};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("Offset {offset} out of range for block {id} (length {len})")]
    OffsetOutOfRange {
        id: BlockId,
        offset: usize,
        len: usize,
    },
    #[error("Invalid range {from}..{to} in block {id}")]
    InvalidRange { id: BlockId, from: usize, to: usize },
    #[error("Offset {offset} splits a character in block {id}")]
    NotCharBoundary { id: BlockId, offset: usize },
    #[error("No block before {0} to merge into")]
    NoPreviousBlock(BlockId),
}

/// A page of blocks plus a version counter for change detection.
///
/// Pages are values: [`Page::apply`] returns a new page and leaves the
/// original untouched, so callers can keep old versions for undo or diffing.
/// A page always holds at least one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    blocks: Vec<Block>,
    version: u64,
}

impl Page {
    /// A page with a single empty paragraph.
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    pub fn from_blocks(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::empty_paragraph());
        }
        Self { blocks, version: 0 }
    }

    /// Rebuild a page from an editor document.
    pub fn from_tree(doc: &Node, options: &ConvertOptions) -> Self {
        Self::from_blocks(from_tree(doc, options))
    }

    pub fn to_tree(&self, options: &ConvertOptions) -> Node {
        to_tree(&self.blocks, options)
    }

    /// Apply a command, returning the edited page and a patch describing it.
    ///
    /// On error the page is unchanged and no version is consumed.
    ///
    /// ```rust
    /// use blockdoc_engine::editing::{Cmd, Page};
    /// use blockdoc_engine::models::{Block, BlockKind};
    ///
    /// let page = Page::from_blocks(vec![
    ///     Block::with_id("a", BlockKind::Paragraph).with_content("Hello world"),
    /// ]);
    /// let (page, patch) = page
    ///     .apply(&Cmd::SplitBlock { id: "a".into(), offset: 5 })
    ///     .unwrap();
    ///
    /// assert_eq!(page.blocks().len(), 2);
    /// assert_eq!(patch.version, page.version());
    /// ```
    pub fn apply(&self, cmd: &Cmd) -> Result<(Page, Patch), EditError> {
        let (blocks, mut patch) = execute(&self.blocks, cmd)?;
        let version = self.version + 1;
        patch.version = version;

        log::debug!(
            "Applied {:?}: {} changed, {} removed (v{})",
            cmd,
            patch.changed.len(),
            patch.removed.len(),
            version
        );

        Ok((Page { blocks, version }, patch))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn block_map(&self) -> BlockMap<'_> {
        block_map(&self.blocks)
    }

    pub fn top_level(&self) -> Vec<&Block> {
        top_level_blocks(&self.blocks)
    }

    pub fn check(&self) -> Result<(), InvariantError> {
        check_page(&self.blocks)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
