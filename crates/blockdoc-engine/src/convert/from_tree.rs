//! # Tree→Flat Converter
//!
//! Walks the editor document and rebuilds the flat block list from scratch on
//! every call; nothing from a previous flat state is consulted.
//!
//! - list nodes are ungrouped into one block per item
//! - containers become one block whose `children` list the ids of their lowered
//!   content; the container is emitted before its descendants
//! - unknown node types degrade to paragraphs holding whatever text they carry
//! - ids come from `blockId`; missing or duplicate ids get fresh ones

use std::collections::HashSet;

use serde_json::Value;

use crate::convert::options::{ConvertOptions, EmptyDocument};
use crate::convert::runs::{MarkedText, Run, RunMark, from_runs};
use crate::convert::schema;
use crate::models::{
    Attrs, BLOCK_ID_ATTR, Block, BlockId, BlockKind, MarkType, Node, Properties,
};

/// Lower a tree document into an ordered flat block list.
///
/// A document with no block nodes yields `[]` under [`EmptyDocument::Omit`] and a
/// single empty paragraph under [`EmptyDocument::EmptyParagraph`]. The one-empty-
/// paragraph document produced for an empty page converts back to one empty
/// paragraph block with a fresh id.
pub fn from_tree(doc: &Node, options: &ConvertOptions) -> Vec<Block> {
    let mut lowering = Lowering::default();
    for node in &doc.content {
        lowering.lower(node);
    }

    if lowering.blocks.is_empty() && options.empty_document == EmptyDocument::EmptyParagraph {
        lowering.blocks.push(Block::empty_paragraph());
    }
    log::debug!(
        "lowered {} tree nodes into {} blocks",
        doc.content.len(),
        lowering.blocks.len()
    );
    lowering.blocks
}

#[derive(Default)]
struct Lowering {
    blocks: Vec<Block>,
    seen: HashSet<BlockId>,
}

impl Lowering {
    /// Lower one block-level node, returning the ids of the blocks created at
    /// this level (several for a list, one otherwise).
    fn lower(&mut self, node: &Node) -> Vec<BlockId> {
        let kind = match node.node_type.as_str() {
            schema::BULLET_LIST => return self.lower_list(node, BlockKind::BulletListItem),
            schema::ORDERED_LIST => return self.lower_list(node, BlockKind::NumberedListItem),
            schema::TASK_LIST => return self.lower_list(node, BlockKind::TodoItem),
            schema::LIST_ITEM => return vec![self.lower_item(node, BlockKind::BulletListItem)],
            schema::TASK_ITEM => return vec![self.lower_item(node, BlockKind::TodoItem)],
            schema::DOC => return node.content.iter().flat_map(|n| self.lower(n)).collect(),
            schema::PARAGRAPH => BlockKind::Paragraph,
            schema::HEADING => {
                let level = node.attr_u64("level").unwrap_or(1);
                BlockKind::heading(u8::try_from(level).unwrap_or(u8::MAX))
            }
            schema::BLOCKQUOTE => BlockKind::Quote,
            schema::CODE_BLOCK => BlockKind::Code,
            schema::HORIZONTAL_RULE => BlockKind::Divider,
            schema::IMAGE => BlockKind::Image,
            schema::CALLOUT => BlockKind::Callout,
            schema::TOGGLE => BlockKind::Toggle,
            schema::TABLE => BlockKind::Table,
            schema::COLUMNS => BlockKind::ColumnLayout,
            schema::COLUMN => BlockKind::Column,
            schema::EMBED => BlockKind::Embed,
            schema::BOOKMARK => BlockKind::Bookmark,
            schema::FILE => BlockKind::File,
            schema::EQUATION => BlockKind::Equation,
            schema::TABLE_OF_CONTENTS => BlockKind::TableOfContents,
            other => {
                log::warn!("unknown node type {other:?}, lowering to paragraph");
                BlockKind::Paragraph
            }
        };

        let mut block = Block::with_id(self.claim_id(node), kind);
        let mut nested: Vec<&Node> = Vec::new();

        match kind {
            BlockKind::Paragraph
            | BlockKind::Heading1
            | BlockKind::Heading2
            | BlockKind::Heading3
            | BlockKind::Quote
            | BlockKind::Callout => {
                set_text(&mut block, flatten_runs(node));
                block.properties = properties_from(&node.attrs, &["level"]);
            }
            BlockKind::Code => {
                block.content = node.text_content();
                block.properties = properties_from(&node.attrs, &[]);
            }
            BlockKind::Equation => {
                block.content = node
                    .attr_str("latex")
                    .map_or_else(|| node.text_content(), str::to_string);
                block.properties = properties_from(&node.attrs, &["latex"]);
            }
            BlockKind::TableOfContents => {
                block.properties = properties_from(&node.attrs, &["headings"]);
            }
            BlockKind::Table => {
                block.properties = table_properties(node);
            }
            BlockKind::Toggle => {
                block.properties = properties_from(&node.attrs, &[]);
                let summary = node
                    .content
                    .iter()
                    .position(|child| schema::is_textblock(&child.node_type));
                if let Some(idx) = summary {
                    set_text(&mut block, flatten_runs(&node.content[idx]));
                }
                nested.extend(
                    node.content
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| Some(*i) != summary)
                        .map(|(_, child)| child),
                );
            }
            BlockKind::Column => {
                block.properties = properties_from(&node.attrs, &[]);
                nested.extend(node.content.iter());
            }
            BlockKind::ColumnLayout => {
                block.properties = properties_from(&node.attrs, &[]);
                return vec![self.lower_columns(block, node)];
            }
            _ => {
                block.properties = properties_from(&node.attrs, &[]);
            }
        }

        vec![self.push_with_children(block, &nested)]
    }

    fn lower_list(&mut self, list: &Node, kind: BlockKind) -> Vec<BlockId> {
        list.content
            .iter()
            .flat_map(|item| match item.node_type.as_str() {
                schema::LIST_ITEM | schema::TASK_ITEM => vec![self.lower_item(item, kind)],
                _ => self.lower(item),
            })
            .collect()
    }

    /// One list item: its leading paragraph is the block text, anything after
    /// (typically a nested list) becomes its children.
    fn lower_item(&mut self, item: &Node, kind: BlockKind) -> BlockId {
        let mut block = Block::with_id(self.claim_id(item), kind);
        if kind == BlockKind::TodoItem {
            block.properties = properties_from(&item.attrs, &["checked"]);
            block.properties.insert(
                "checked".to_string(),
                Value::Bool(item.attr_bool("checked").unwrap_or(false)),
            );
        } else {
            block.properties = properties_from(&item.attrs, &[]);
        }

        let mut nested: Vec<&Node> = Vec::new();
        if item.content.iter().any(|c| schema::is_inline(&c.node_type)) {
            set_text(&mut block, flatten_runs(item));
        } else {
            let mut body = item.content.iter();
            if let Some(first) = body.next() {
                if schema::is_textblock(&first.node_type) {
                    set_text(&mut block, flatten_runs(first));
                } else {
                    nested.push(first);
                }
            }
            nested.extend(body);
        }
        self.push_with_children(block, &nested)
    }

    /// Every child of a `columns` node becomes one column block; stray
    /// non-column children are wrapped in a fresh column.
    fn lower_columns(&mut self, layout: Block, node: &Node) -> BlockId {
        let idx = self.reserve(layout);
        let mut columns = Vec::new();
        for child in &node.content {
            if child.node_type == schema::COLUMN {
                columns.extend(self.lower(child));
            } else {
                let column = Block::with_id(self.fresh_id(), BlockKind::Column);
                columns.push(self.push_with_children(column, &[child]));
            }
        }
        self.blocks[idx].children = columns;
        self.blocks[idx].id.clone()
    }

    fn push_with_children(&mut self, block: Block, nested: &[&Node]) -> BlockId {
        let idx = self.reserve(block);
        let children: Vec<BlockId> = nested.iter().flat_map(|n| self.lower(n)).collect();
        self.blocks[idx].children = children;
        self.blocks[idx].id.clone()
    }

    /// Emit `block` now so it precedes its descendants; children are filled in later.
    fn reserve(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    fn claim_id(&mut self, node: &Node) -> BlockId {
        match node.block_id() {
            Some(id) if self.seen.insert(id.clone()) => id,
            Some(id) => {
                log::warn!("duplicate blockId {id} in tree, issuing a fresh id");
                self.fresh_id()
            }
            None => self.fresh_id(),
        }
    }

    fn fresh_id(&mut self) -> BlockId {
        let id = BlockId::generate();
        self.seen.insert(id.clone());
        id
    }
}

fn set_text(block: &mut Block, text: MarkedText) {
    block.content = text.content;
    block.marks = text.marks;
}

/// Runs of a node's inline content. Block-level children (blockquote
/// paragraphs, callout bodies) are joined with line breaks.
fn flatten_runs(node: &Node) -> MarkedText {
    let mut runs = Vec::new();
    collect_runs(node, &mut runs);
    from_runs(&runs)
}

fn collect_runs(node: &Node, runs: &mut Vec<Run>) {
    let mut first_block = true;
    for child in &node.content {
        match child.node_type.as_str() {
            schema::TEXT => {
                if let Some(text) = &child.text {
                    runs.push(Run {
                        text: text.clone(),
                        marks: run_marks(child),
                    });
                }
            }
            schema::HARD_BREAK => runs.push(Run {
                text: "\n".to_string(),
                marks: run_marks(child),
            }),
            schema::MENTION => runs.push(Run {
                text: String::new(),
                marks: vec![RunMark {
                    mark_type: MarkType::Mention,
                    attrs: strip_nulls(&child.attrs),
                }],
            }),
            other if schema::is_textblock(other) || !child.content.is_empty() => {
                if !first_block {
                    runs.push(Run::plain("\n"));
                }
                first_block = false;
                collect_runs(child, runs);
            }
            _ => {
                // Inline atoms we don't model contribute their text, if any
                if let Some(text) = child.text.as_ref().filter(|t| !t.is_empty()) {
                    runs.push(Run::plain(text.clone()));
                }
            }
        }
    }
}

fn run_marks(node: &Node) -> Vec<RunMark> {
    node.marks
        .iter()
        .filter_map(|mark| match schema::mark_from_name(&mark.mark_type) {
            Some(mark_type) => Some(RunMark {
                mark_type,
                attrs: strip_nulls(&mark.attrs),
            }),
            None => {
                log::warn!("dropping unknown mark type {:?}", mark.mark_type);
                None
            }
        })
        .collect()
}

/// Node attrs as block properties, minus identity, derived keys and nulls.
fn properties_from(attrs: &Attrs, derived: &[&str]) -> Properties {
    attrs
        .iter()
        .filter(|(k, v)| {
            k.as_str() != BLOCK_ID_ATTR && !derived.contains(&k.as_str()) && !v.is_null()
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn strip_nulls(attrs: &Attrs) -> Attrs {
    properties_from(attrs, &[])
}

fn table_properties(node: &Node) -> Properties {
    let rows: Vec<&Node> = node
        .content
        .iter()
        .filter(|r| r.node_type == schema::TABLE_ROW)
        .collect();

    let header_row = rows.first().is_some_and(|row| {
        !row.content.is_empty()
            && row
                .content
                .iter()
                .all(|cell| cell.node_type == schema::TABLE_HEADER)
    });

    let cells: Vec<Value> = rows
        .iter()
        .map(|row| {
            Value::Array(
                row.content
                    .iter()
                    .map(|cell| Value::String(flatten_runs(cell).content))
                    .collect(),
            )
        })
        .collect();

    let mut props = properties_from(&node.attrs, &[]);
    props.insert("rows".to_string(), Value::Array(cells));
    props.insert("headerRow".to_string(), Value::Bool(header_row));
    props
}
