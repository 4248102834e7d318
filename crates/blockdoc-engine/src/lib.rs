pub mod convert;
pub mod editing;
pub mod models;

// Re-export key types for easier usage
pub use convert::{ConvertOptions, EmptyDocument, from_tree, to_tree};
pub use editing::{Cmd, EditError, InvariantError, Page, Patch};
pub use models::{Block, BlockId, BlockKind, InlineMark, MarkType, Node};
