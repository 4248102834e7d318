pub mod block;
pub mod mark;
pub mod text;
pub mod tree;

pub use block::{Block, BlockId, BlockKind, BlockMap, Properties, block_map, top_level_blocks};
pub use mark::{InlineMark, MarkAttrs, MarkType};
pub use tree::{Attrs, BLOCK_ID_ATTR, Node, NodeMark};
