//! Structural checks over blocks and pages.
//!
//! Editing operations keep these properties by construction; the checks exist
//! for data that arrives from outside (files, the editor, other clients).

use std::collections::HashSet;

use crate::models::{Block, BlockId, MarkType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("Block {block}: mark {index} ({from}..{to}) exceeds content length {len}")]
    MarkOutOfBounds {
        block: BlockId,
        index: usize,
        from: usize,
        to: usize,
        len: usize,
    },
    #[error("Block {block}: mark {index} has inverted range {from}..{to}")]
    InvertedMark {
        block: BlockId,
        index: usize,
        from: usize,
        to: usize,
    },
    #[error("Block {block}: zero-width {mark_type:?} mark at {at}")]
    ZeroWidthMark {
        block: BlockId,
        mark_type: MarkType,
        at: usize,
    },
    #[error("Block {block}: {mark_type:?} marks {first} and {second} overlap or touch")]
    UnmergedMarks {
        block: BlockId,
        mark_type: MarkType,
        first: usize,
        second: usize,
    },
    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),
    #[error("Block {parent} references missing child {child}")]
    MissingChild { parent: BlockId, child: BlockId },
    #[error("Page has no blocks")]
    EmptyPage,
}

/// Check that a block's marks are in bounds, non-degenerate and fully merged.
pub fn check_block(block: &Block) -> Result<(), InvariantError> {
    let len = block.content_len();

    for (index, mark) in block.marks.iter().enumerate() {
        if mark.from > mark.to {
            return Err(InvariantError::InvertedMark {
                block: block.id.clone(),
                index,
                from: mark.from,
                to: mark.to,
            });
        }
        if mark.to > len {
            return Err(InvariantError::MarkOutOfBounds {
                block: block.id.clone(),
                index,
                from: mark.from,
                to: mark.to,
                len,
            });
        }
        if mark.is_empty() && !mark.mark_type.is_point() {
            return Err(InvariantError::ZeroWidthMark {
                block: block.id.clone(),
                mark_type: mark.mark_type,
                at: mark.from,
            });
        }
    }

    for (first, a) in block.marks.iter().enumerate() {
        for (offset, b) in block.marks[first + 1..].iter().enumerate() {
            let touching = a.from <= b.to && b.from <= a.to;
            if !a.mark_type.is_point() && a.same_identity(b) && touching {
                return Err(InvariantError::UnmergedMarks {
                    block: block.id.clone(),
                    mark_type: a.mark_type,
                    first,
                    second: first + 1 + offset,
                });
            }
        }
    }

    Ok(())
}

/// Check every block plus page-level structure: at least one block, unique
/// ids and no dangling child references.
pub fn check_page(blocks: &[Block]) -> Result<(), InvariantError> {
    if blocks.is_empty() {
        return Err(InvariantError::EmptyPage);
    }

    let mut ids = HashSet::new();
    for block in blocks {
        if !ids.insert(&block.id) {
            return Err(InvariantError::DuplicateId(block.id.clone()));
        }
    }

    for block in blocks {
        check_block(block)?;
        if let Some(child) = block.children.iter().find(|c| !ids.contains(c)) {
            return Err(InvariantError::MissingChild {
                parent: block.id.clone(),
                child: child.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockKind, InlineMark};
    use rstest::rstest;

    fn para(id: &str, content: &str) -> Block {
        Block::with_id(id, BlockKind::Paragraph).with_content(content)
    }

    #[test]
    fn test_well_formed_block_passes() {
        let block = para("a", "Hello world").with_marks(vec![
            InlineMark::new(MarkType::Bold, 0, 5),
            InlineMark::new(MarkType::Italic, 3, 8),
            InlineMark::new(MarkType::Mention, 11, 11),
        ]);
        assert_eq!(check_block(&block), Ok(()));
    }

    #[rstest]
    #[case::out_of_bounds(InlineMark::new(MarkType::Bold, 2, 9), "MarkOutOfBounds")]
    #[case::inverted(InlineMark::new(MarkType::Bold, 4, 2), "InvertedMark")]
    #[case::zero_width(InlineMark::new(MarkType::Italic, 2, 2), "ZeroWidthMark")]
    fn test_malformed_mark(#[case] mark: InlineMark, #[case] expected: &str) {
        let err = check_block(&para("a", "Hello").with_marks(vec![mark])).unwrap_err();
        assert!(format!("{err:?}").starts_with(expected), "{err:?}");
    }

    #[rstest]
    #[case::overlapping(0, 3, 2, 5)]
    #[case::adjacent(0, 2, 2, 5)]
    fn test_unmerged_marks_are_reported(
        #[case] a_from: usize,
        #[case] a_to: usize,
        #[case] b_from: usize,
        #[case] b_to: usize,
    ) {
        let block = para("a", "Hello").with_marks(vec![
            InlineMark::new(MarkType::Bold, a_from, a_to),
            InlineMark::new(MarkType::Bold, b_from, b_to),
        ]);
        assert_eq!(
            check_block(&block),
            Err(InvariantError::UnmergedMarks {
                block: "a".into(),
                mark_type: MarkType::Bold,
                first: 0,
                second: 1,
            })
        );
    }

    #[test]
    fn test_repeated_mentions_are_allowed() {
        let mention = InlineMark::new(MarkType::Mention, 3, 3);
        let block = para("a", "hi @ you").with_marks(vec![mention.clone(), mention]);
        assert_eq!(check_block(&block), Ok(()));
    }

    #[test]
    fn test_distinct_links_may_touch() {
        let block = para("a", "onetwo").with_marks(vec![
            InlineMark::link(0, 3, "https://a.example"),
            InlineMark::link(3, 6, "https://b.example"),
        ]);
        assert_eq!(check_block(&block), Ok(()));
    }

    #[test]
    fn test_page_checks() {
        assert_eq!(check_page(&[]), Err(InvariantError::EmptyPage));
        assert_eq!(
            check_page(&[para("a", ""), para("a", "")]),
            Err(InvariantError::DuplicateId("a".into()))
        );
        assert_eq!(
            check_page(&[para("a", "").with_children(vec!["ghost".into()])]),
            Err(InvariantError::MissingChild {
                parent: "a".into(),
                child: "ghost".into(),
            })
        );
        assert_eq!(
            check_page(&[para("a", "").with_children(vec!["b".into()]), para("b", "x")]),
            Ok(())
        );
    }
}
