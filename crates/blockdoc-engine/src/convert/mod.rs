/*!
 * # Flat/Tree Conversion
 *
 * Bidirectional conversion between the flat block list (the editing model) and
 * the nested tree document handed to the rich-text editor.
 *
 * ## Data Flow
 *
 * - Edits happen on the flat model (see `editing`)
 * - **`to_tree`** hands a document to the editor, grouping list runs and nesting
 *   container children
 * - **`from_tree`** runs on every editor change and rebuilds the flat list from
 *   scratch, ungrouping lists and lowering containers into the child-id graph
 *
 * Both directions share the **`runs`** codec, which turns `content + marks` into
 * marked text runs and back. Round trips preserve content, order, kinds and mark
 * semantics; marks are re-derived, not preserved by identity.
 *
 * ## Modules
 *
 * - **`runs`**: Mark-Run codec (`to_runs`, `from_runs`)
 * - **`to_tree`**: Flat→Tree converter
 * - **`from_tree`**: Tree→Flat converter
 * - **`schema`**: node and mark type names shared with the editor
 * - **`options`**: `ConvertOptions` (empty-document policy, placeholders)
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockdoc_engine::convert::{ConvertOptions, from_tree, to_tree};
 * use blockdoc_engine::models::{Block, BlockKind};
 *
 * let blocks = vec![
 *     Block::with_id("a", BlockKind::BulletListItem).with_content("Item 1"),
 *     Block::with_id("b", BlockKind::BulletListItem).with_content("Item 2"),
 * ];
 * let options = ConvertOptions::default();
 *
 * let doc = to_tree(&blocks, &options);
 * assert_eq!(doc.content.len(), 1); // one bulletList node
 *
 * let back = from_tree(&doc, &options);
 * assert_eq!(back.len(), 2);
 * ```
 */

pub mod from_tree;
pub mod options;
pub mod runs;
pub mod schema;
pub mod to_tree;

pub use from_tree::from_tree;
pub use options::{ConvertOptions, EmptyDocument};
pub use runs::{MarkedText, Run, RunMark, from_runs, to_runs};
pub use to_tree::{to_tree, to_tree_with_map};
