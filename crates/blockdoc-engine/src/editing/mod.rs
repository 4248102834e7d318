/*!
 * # Editing Core
 *
 * Everything that changes a document happens here, on the flat block model.
 * The tree representation (see `convert`) is only ever rebuilt from these
 * blocks, never edited directly.
 *
 * ## Layers
 *
 * ### 1. Mark Algebra (`marks`)
 * - Pure functions over a block's `Vec<InlineMark>`
 * - Keeps the canonical form: no zero-width non-point marks, no overlapping or
 *   touching marks of the same identity (type plus attrs)
 * - Exclusive types (link, highlight, text color) replace what they cover
 *
 * ### 2. Block Split/Merge (`split`)
 * - Splitting, merging and text insertion/deletion on single blocks
 * - Mark offsets are shifted, clipped or duplicated so no formatting is lost
 *
 * ### 3. Pages and Commands (`page`, `commands`, `patch`)
 * - A `Page` is a value holding the flat block list and a version counter
 * - Edits are expressed as `Cmd`s; `Page::apply` returns a new page plus a
 *   `Patch` listing changed and removed blocks and where the caret goes
 * - Structural edits keep parent `children` lists in step
 *
 * ### 4. Invariant Checks (`invariants`)
 * - Validates pages that arrive from outside the editing layer
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockdoc_engine::editing::*;
 * use blockdoc_engine::models::{Block, BlockKind, MarkType};
 *
 * let page = Page::from_blocks(vec![
 *     Block::with_id("a", BlockKind::Paragraph).with_content("Hello world"),
 * ]);
 *
 * let (page, _) = page
 *     .apply(&Cmd::ToggleMark {
 *         id: "a".into(),
 *         mark_type: MarkType::Bold,
 *         from: 0,
 *         to: 5,
 *         attrs: None,
 *     })
 *     .unwrap();
 * let (page, patch) = page
 *     .apply(&Cmd::SplitBlock { id: "a".into(), offset: 5 })
 *     .unwrap();
 *
 * assert_eq!(page.blocks()[0].marks.len(), 1);
 * assert_eq!(patch.focus.unwrap().offset, 0);
 * assert!(page.check().is_ok());
 * ```
 */

pub mod commands;
pub mod invariants;
pub mod marks;
pub mod page;
pub mod patch;
pub mod split;

pub use commands::Cmd;
pub use invariants::{InvariantError, check_block, check_page};
pub use marks::{
    add_mark, clamp_marks, get_marks_at_position, has_mark_in_range, remove_mark,
    resolve_overlaps, toggle_mark,
};
pub use page::{EditError, Page};
pub use patch::{Caret, Patch};
pub use split::{Split, delete_text, insert_text, merge_blocks, split_block, split_block_with_id};
