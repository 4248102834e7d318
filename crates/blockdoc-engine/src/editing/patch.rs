use crate::models::BlockId;

/// Caret position after an edit: a block and a UTF-16 offset into its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    pub block: BlockId,
    pub offset: usize,
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Patch {
    /// Blocks created or modified, in document order of the edit.
    pub changed: Vec<BlockId>,
    /// Blocks that no longer exist.
    pub removed: Vec<BlockId>,
    pub focus: Option<Caret>,
    pub version: u64,
}
