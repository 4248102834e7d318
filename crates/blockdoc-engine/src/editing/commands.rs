use std::collections::HashSet;

use crate::editing::marks::toggle_mark;
use crate::editing::page::EditError;
use crate::editing::patch::{Caret, Patch};
use crate::editing::split::{delete_text, insert_text, merge_blocks, split_block};
use crate::models::{Block, BlockId, BlockKind, MarkAttrs, MarkType, text, top_level_blocks};

/// Commands that can be applied to a page
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert a default block of `kind` after `after`, or at the top of the page.
    InsertBlock {
        after: Option<BlockId>,
        kind: BlockKind,
    },
    /// Remove a block together with its descendants.
    DeleteBlock {
        id: BlockId,
    },
    SplitBlock {
        id: BlockId,
        offset: usize,
    },
    /// Append a block onto its previous sibling. The absorbed block's
    /// descendants are removed with it.
    MergeWithPrevious {
        id: BlockId,
    },
    InsertText {
        id: BlockId,
        offset: usize,
        text: String,
    },
    DeleteText {
        id: BlockId,
        from: usize,
        to: usize,
    },
    ToggleMark {
        id: BlockId,
        mark_type: MarkType,
        from: usize,
        to: usize,
        attrs: Option<MarkAttrs>,
    },
    SetKind {
        id: BlockId,
        kind: BlockKind,
    },
}

/// Run a command against a copy of `blocks`, returning the new block list and
/// what changed. `blocks` itself is left untouched.
pub(crate) fn execute(blocks: &[Block], cmd: &Cmd) -> Result<(Vec<Block>, Patch), EditError> {
    let mut blocks = blocks.to_vec();
    let mut patch = Patch::default();

    match cmd {
        Cmd::InsertBlock { after, kind } => {
            let block = Block::new(*kind);
            let new_id = block.id.clone();
            match after {
                None => blocks.insert(0, block),
                Some(after) => {
                    let idx = index_of(&blocks, after)?;
                    blocks.insert(idx + 1, block);
                    if let Some(parent) = parent_of(&blocks, after) {
                        insert_child_after(&mut blocks[parent], after, new_id.clone());
                        patch.changed.push(blocks[parent].id.clone());
                    }
                }
            }
            patch.changed.push(new_id.clone());
            patch.focus = Some(Caret {
                block: new_id,
                offset: 0,
            });
        }
        Cmd::DeleteBlock { id } => {
            index_of(&blocks, id)?;
            let previous = previous_sibling(&blocks, id);
            patch.removed = remove_subtree(&mut blocks, id);
            if let Some(parent) = parent_of(&blocks, id) {
                blocks[parent].children.retain(|c| c != id);
                patch.changed.push(blocks[parent].id.clone());
            }

            if blocks.is_empty() {
                // A page always keeps at least one block
                let block = Block::empty_paragraph();
                patch.changed.push(block.id.clone());
                patch.focus = Some(Caret {
                    block: block.id.clone(),
                    offset: 0,
                });
                blocks.push(block);
            } else if let Some(prev) = previous {
                let idx = index_of(&blocks, &prev)?;
                patch.focus = Some(Caret {
                    block: prev,
                    offset: blocks[idx].content_len(),
                });
            }
        }
        Cmd::SplitBlock { id, offset } => {
            let idx = index_of(&blocks, id)?;
            check_offset(&blocks[idx], *offset)?;
            let split = split_block(&blocks[idx], *offset);
            let new_id = split.after.id.clone();

            blocks[idx] = split.before;
            blocks.insert(idx + 1, split.after);
            if let Some(parent) = parent_of(&blocks, id) {
                insert_child_after(&mut blocks[parent], id, new_id.clone());
                patch.changed.push(blocks[parent].id.clone());
            }
            patch.changed.extend([id.clone(), new_id.clone()]);
            patch.focus = Some(Caret {
                block: new_id,
                offset: 0,
            });
        }
        Cmd::MergeWithPrevious { id } => {
            let idx = index_of(&blocks, id)?;
            let prev = previous_sibling(&blocks, id)
                .ok_or_else(|| EditError::NoPreviousBlock(id.clone()))?;
            let prev_idx = index_of(&blocks, &prev)?;
            let caret = blocks[prev_idx].content_len();

            blocks[prev_idx] = merge_blocks(&blocks[prev_idx], &blocks[idx]);
            if let Some(parent) = parent_of(&blocks, id) {
                blocks[parent].children.retain(|c| c != id);
            }
            patch.removed = remove_subtree(&mut blocks, id);
            patch.changed.push(prev.clone());
            patch.focus = Some(Caret {
                block: prev,
                offset: caret,
            });
        }
        Cmd::InsertText { id, offset, text: inserted } => {
            let idx = index_of(&blocks, id)?;
            check_offset(&blocks[idx], *offset)?;
            blocks[idx] = insert_text(&blocks[idx], *offset, inserted);
            patch.changed.push(id.clone());
            patch.focus = Some(Caret {
                block: id.clone(),
                offset: offset + text::utf16_len(inserted),
            });
        }
        Cmd::DeleteText { id, from, to } => {
            let idx = index_of(&blocks, id)?;
            check_range(&blocks[idx], *from, *to)?;
            blocks[idx] = delete_text(&blocks[idx], *from, *to);
            patch.changed.push(id.clone());
            patch.focus = Some(Caret {
                block: id.clone(),
                offset: *from,
            });
        }
        Cmd::ToggleMark {
            id,
            mark_type,
            from,
            to,
            attrs,
        } => {
            let idx = index_of(&blocks, id)?;
            check_range(&blocks[idx], *from, *to)?;
            let marks = toggle_mark(&blocks[idx].marks, *mark_type, *from, *to, attrs.clone());
            blocks[idx].marks = marks;
            patch.changed.push(id.clone());
        }
        Cmd::SetKind { id, kind } => {
            let idx = index_of(&blocks, id)?;
            blocks[idx].kind = *kind;
            if !kind.nests_children() && !blocks[idx].children.is_empty() {
                // Former children move up to the block's own level
                log::debug!(
                    "block {id} released {} children on becoming {kind:?}",
                    blocks[idx].children.len()
                );
                let released = std::mem::take(&mut blocks[idx].children);
                if let Some(parent) = parent_of(&blocks, id) {
                    let pos = blocks[parent]
                        .children
                        .iter()
                        .position(|c| c == id)
                        .map_or(blocks[parent].children.len(), |p| p + 1);
                    blocks[parent].children.splice(pos..pos, released);
                    patch.changed.push(blocks[parent].id.clone());
                }
            }
            patch.changed.push(id.clone());
        }
    }

    Ok((blocks, patch))
}

fn index_of(blocks: &[Block], id: &BlockId) -> Result<usize, EditError> {
    blocks
        .iter()
        .position(|b| &b.id == id)
        .ok_or_else(|| EditError::BlockNotFound(id.clone()))
}

fn parent_of(blocks: &[Block], id: &BlockId) -> Option<usize> {
    blocks.iter().position(|b| b.children.contains(id))
}

fn check_offset(block: &Block, offset: usize) -> Result<(), EditError> {
    let len = block.content_len();
    if offset > len {
        return Err(EditError::OffsetOutOfRange {
            id: block.id.clone(),
            offset,
            len,
        });
    }
    if text::snap(&block.content, offset) != offset {
        return Err(EditError::NotCharBoundary {
            id: block.id.clone(),
            offset,
        });
    }
    Ok(())
}

fn check_range(block: &Block, from: usize, to: usize) -> Result<(), EditError> {
    check_offset(block, to)?;
    if from > to {
        return Err(EditError::InvalidRange {
            id: block.id.clone(),
            from,
            to,
        });
    }
    check_offset(block, from)
}

fn insert_child_after(parent: &mut Block, after: &BlockId, child: BlockId) {
    let pos = parent
        .children
        .iter()
        .position(|c| c == after)
        .map_or(parent.children.len(), |p| p + 1);
    parent.children.insert(pos, child);
}

/// The sibling preceding `id`: within its parent's children when nested,
/// otherwise among the top-level blocks.
fn previous_sibling(blocks: &[Block], id: &BlockId) -> Option<BlockId> {
    let siblings: Vec<&BlockId> = match parent_of(blocks, id) {
        Some(parent) => blocks[parent].children.iter().collect(),
        None => top_level_blocks(blocks).into_iter().map(|b| &b.id).collect(),
    };
    let pos = siblings.iter().position(|s| *s == id)?;
    pos.checked_sub(1).map(|p| siblings[p].clone())
}

/// Remove `id` and everything below it, returning the removed ids.
fn remove_subtree(blocks: &mut Vec<Block>, id: &BlockId) -> Vec<BlockId> {
    let mut removed: Vec<BlockId> = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![id.clone()];

    while let Some(next) = stack.pop() {
        if !seen.insert(next.clone()) {
            continue;
        }
        if let Some(block) = blocks.iter().find(|b| b.id == next) {
            stack.extend(block.children.iter().rev().cloned());
        }
        removed.push(next);
    }

    blocks.retain(|b| !seen.contains(&b.id));
    removed
}
