//! # Block Split/Merge Engine
//!
//! Structural edits on single blocks with exact offset arithmetic for marks.
//! Offsets are UTF-16 code units, clamped to `[0, content_len]` and snapped
//! back to the start of any character they fall inside.

use crate::editing::marks::resolve_overlaps;
use crate::models::{Block, BlockId, BlockKind, InlineMark, Properties, text};

/// The two halves produced by [`split_block`].
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Keeps the original id, kind, properties and children.
    pub before: Block,
    /// Fresh plain paragraph holding the trailing text.
    pub after: Block,
}

/// Split `block` at `offset`, giving the trailing half a generated id.
pub fn split_block(block: &Block, offset: usize) -> Split {
    split_block_with_id(block, offset, BlockId::generate())
}

/// Split `block` at `offset`, giving the trailing half `new_id`.
///
/// Marks spanning the split point are duplicated onto both halves. The trailing
/// half never inherits kind, properties or children: splitting a heading or a
/// list item continues as a paragraph.
pub fn split_block_with_id(block: &Block, offset: usize, new_id: BlockId) -> Split {
    let offset = text::snap(&block.content, offset);
    let (head, tail) = text::split_at(&block.content, offset);

    let mut before_marks = Vec::new();
    let mut after_marks = Vec::new();
    for mark in &block.marks {
        if mark.to <= offset {
            before_marks.push(mark.clone());
        } else if mark.from >= offset {
            after_marks.push(mark.with_range(mark.from - offset, mark.to - offset));
        } else {
            before_marks.push(mark.with_range(mark.from, offset));
            after_marks.push(mark.with_range(0, mark.to - offset));
        }
    }

    let before = Block {
        content: head.to_string(),
        marks: before_marks,
        ..block.clone()
    };
    let after = Block {
        id: new_id,
        kind: BlockKind::Paragraph,
        content: tail.to_string(),
        marks: after_marks,
        properties: Properties::new(),
        children: Vec::new(),
    };
    Split { before, after }
}

/// Append `second` onto `first`.
///
/// The result keeps `first`'s id, kind, properties and children. Marks from
/// `second` are shifted past `first`'s content; a mark cut by an earlier split
/// rejoins its other half.
pub fn merge_blocks(first: &Block, second: &Block) -> Block {
    let shift = first.content_len();
    let mut marks = first.marks.clone();
    marks.extend(
        second
            .marks
            .iter()
            .map(|m| m.with_range(m.from + shift, m.to + shift)),
    );

    Block {
        content: format!("{}{}", first.content, second.content),
        marks: resolve_overlaps(&marks),
        ..first.clone()
    }
}

/// Insert `inserted` at `offset`, carrying marks along.
///
/// Marks after the caret shift right, marks containing it grow. A mark ending
/// exactly at the caret grows only when its type is inclusive; a mark starting
/// there shifts. Point marks at or after the caret shift.
pub fn insert_text(block: &Block, offset: usize, inserted: &str) -> Block {
    let n = text::utf16_len(inserted);
    if n == 0 {
        return block.clone();
    }
    let offset = text::snap(&block.content, offset);
    let (head, tail) = text::split_at(&block.content, offset);

    let marks: Vec<InlineMark> = block
        .marks
        .iter()
        .map(|m| {
            if m.is_empty() {
                if m.from >= offset {
                    m.with_range(m.from + n, m.to + n)
                } else {
                    m.clone()
                }
            } else if m.from >= offset {
                m.with_range(m.from + n, m.to + n)
            } else if m.to > offset || (m.to == offset && m.mark_type.is_inclusive()) {
                m.with_range(m.from, m.to + n)
            } else {
                m.clone()
            }
        })
        .collect();

    Block {
        content: format!("{head}{inserted}{tail}"),
        marks: resolve_overlaps(&marks),
        ..block.clone()
    }
}

/// Delete `[from, to)`, collapsing marks over the removed range.
///
/// Formatting marks squeezed to zero width disappear, as do point marks inside
/// the range.
pub fn delete_text(block: &Block, from: usize, to: usize) -> Block {
    let len = block.content_len();
    let from = text::snap(&block.content, from);
    let to = text::snap(&block.content, to);
    if from >= to {
        return block.clone();
    }
    let removed = to - from;
    let map = |p: usize| {
        if p <= from {
            p
        } else if p >= to {
            p - removed
        } else {
            from
        }
    };

    let marks: Vec<InlineMark> = block
        .marks
        .iter()
        .filter(|m| !(m.is_empty() && from <= m.from && m.from < to))
        .map(|m| m.with_range(map(m.from), map(m.to)))
        .collect();

    let head = text::slice(&block.content, 0, from);
    let tail = text::slice(&block.content, to, len);
    Block {
        content: format!("{head}{tail}"),
        marks: resolve_overlaps(&marks),
        ..block.clone()
    }
}
