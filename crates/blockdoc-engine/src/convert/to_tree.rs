//! # Flat→Tree Converter
//!
//! Walks an ordered block list and builds the nested editor document:
//!
//! - consecutive blocks of the same run-forming kind share one list node
//! - container blocks (toggle, column layout, column) pull their children from
//!   the block map and nest them
//! - every block-level node carries `blockId` so the reverse pass keeps identity
//!
//! An empty input produces a document holding one empty paragraph.

use std::collections::HashSet;

use serde_json::{Value, json};

use crate::convert::options::ConvertOptions;
use crate::convert::runs::{Run, to_runs};
use crate::convert::schema;
use crate::models::{Block, BlockKind, BlockMap, Node, NodeMark, block_map, top_level_blocks};

/// Convert a complete block list. Blocks listed as a container or list item child are
/// rendered inside that container instead of at the top level.
pub fn to_tree(blocks: &[Block], options: &ConvertOptions) -> Node {
    let map = block_map(blocks);
    let top = top_level_blocks(blocks);
    TreeBuilder::new(&map, options).build(&top)
}

/// Convert `blocks` in order, resolving container children against `map`.
pub fn to_tree_with_map(
    blocks: &[&Block],
    map: &BlockMap<'_>,
    options: &ConvertOptions,
) -> Node {
    TreeBuilder::new(map, options).build(blocks)
}

struct TreeBuilder<'a> {
    map: &'a BlockMap<'a>,
    options: &'a ConvertOptions,
    /// Container ids currently being expanded; guards against child cycles.
    ancestors: HashSet<&'a str>,
    headings: Vec<Value>,
}

impl<'a> TreeBuilder<'a> {
    fn new(map: &'a BlockMap<'a>, options: &'a ConvertOptions) -> Self {
        Self {
            map,
            options,
            ancestors: HashSet::new(),
            headings: Vec::new(),
        }
    }

    fn build(mut self, blocks: &[&'a Block]) -> Node {
        self.headings = collect_headings(blocks, self.map);
        let mut content = self.convert_blocks(blocks);
        if content.is_empty() {
            content.push(Node::new(schema::PARAGRAPH));
        }
        log::debug!(
            "converted {} top-level blocks into {} tree nodes",
            blocks.len(),
            content.len()
        );
        Node::doc(content)
    }

    fn convert_blocks(&mut self, blocks: &[&'a Block]) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut i = 0;

        while i < blocks.len() {
            let kind = blocks[i].kind;
            if kind.is_run_forming() {
                // Collect the run of consecutive blocks sharing this list kind
                let start = i;
                while i < blocks.len() && blocks[i].kind == kind {
                    i += 1;
                }
                nodes.push(self.list_node(kind, &blocks[start..i]));
            } else {
                nodes.push(self.block_node(blocks[i]));
                i += 1;
            }
        }
        nodes
    }

    fn list_node(&mut self, kind: BlockKind, items: &[&'a Block]) -> Node {
        let (list_type, item_type) = match kind {
            BlockKind::NumberedListItem => (schema::ORDERED_LIST, schema::LIST_ITEM),
            BlockKind::TodoItem => (schema::TASK_LIST, schema::TASK_ITEM),
            _ => (schema::BULLET_LIST, schema::LIST_ITEM),
        };

        let content = items
            .iter()
            .map(|&block| {
                let mut item = atom(item_type, block);
                if kind == BlockKind::TodoItem {
                    item = item.with_attr("checked", block.checked());
                }
                let mut body = vec![paragraph(block)];
                body.extend(self.children_of(block));
                item.with_content(body)
            })
            .collect();

        Node::new(list_type).with_content(content)
    }

    fn block_node(&mut self, block: &'a Block) -> Node {
        match block.kind {
            BlockKind::Paragraph => {
                atom(schema::PARAGRAPH, block).with_content(inline_nodes(block))
            }
            BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => {
                let level = block.kind.heading_level().unwrap_or(1);
                atom(schema::HEADING, block)
                    .with_attr("level", level)
                    .with_content(inline_nodes(block))
            }
            BlockKind::Quote => atom(schema::BLOCKQUOTE, block).with_content(vec![paragraph(block)]),
            BlockKind::Code => {
                let language = block
                    .property_str("language")
                    .map_or(Value::Null, |l| Value::String(l.to_string()));
                // Code blocks take no marks in the editor schema
                let mut node = atom(schema::CODE_BLOCK, block).with_attr("language", language);
                if !block.content.is_empty() {
                    node.content = vec![Node::text(block.content.clone(), Vec::new())];
                }
                node
            }
            BlockKind::Divider => Node::new(schema::HORIZONTAL_RULE).with_block_id(&block.id),
            BlockKind::Callout => atom(schema::CALLOUT, block).with_content(inline_nodes(block)),
            BlockKind::Toggle => {
                let mut content = vec![paragraph(block)];
                content.extend(self.children_of(block));
                atom(schema::TOGGLE, block).with_content(content)
            }
            BlockKind::Table => table_node(block),
            BlockKind::ColumnLayout => self.columns_node(block),
            BlockKind::Column => self.column_node(block),
            BlockKind::Image => atom(schema::IMAGE, block),
            BlockKind::Embed => atom(schema::EMBED, block),
            BlockKind::Bookmark => atom(schema::BOOKMARK, block),
            BlockKind::File => atom(schema::FILE, block),
            BlockKind::Equation => {
                atom(schema::EQUATION, block).with_attr("latex", block.content.as_str())
            }
            BlockKind::TableOfContents => atom(schema::TABLE_OF_CONTENTS, block)
                .with_attr("headings", Value::Array(self.headings.clone())),
            BlockKind::BulletListItem | BlockKind::NumberedListItem | BlockKind::TodoItem => {
                // Lone list items normally arrive through convert_blocks
                self.list_node(block.kind, &[block])
            }
        }
    }

    fn columns_node(&mut self, block: &'a Block) -> Node {
        let mut columns: Vec<Node> = self
            .resolve_children(block)
            .into_iter()
            .map(|child| {
                if child.kind == BlockKind::Column {
                    self.column_node(child)
                } else {
                    let inner = self.convert_blocks(&[child]);
                    Node::new(schema::COLUMN).with_content(inner)
                }
            })
            .collect();
        self.leave(block);

        if columns.is_empty() && self.options.placeholder_children {
            let placeholder = vec![Node::new(schema::PARAGRAPH)];
            columns.push(Node::new(schema::COLUMN).with_content(placeholder));
        }
        atom(schema::COLUMNS, block).with_content(columns)
    }

    fn column_node(&mut self, block: &'a Block) -> Node {
        let mut content = self.children_of(block);
        if content.is_empty() && self.options.placeholder_children {
            content.push(Node::new(schema::PARAGRAPH));
        }
        atom(schema::COLUMN, block).with_content(content)
    }

    /// Converted child nodes of a container, list grouping included.
    fn children_of(&mut self, block: &'a Block) -> Vec<Node> {
        let children = self.resolve_children(block);
        let nodes = self.convert_blocks(&children);
        self.leave(block);
        nodes
    }

    /// Resolve `block.children` and mark `block` as being expanded.
    /// Callers must pair this with [`Self::leave`].
    fn resolve_children(&mut self, block: &'a Block) -> Vec<&'a Block> {
        self.ancestors.insert(block.id.as_str());
        block
            .children
            .iter()
            .filter_map(|id| match self.map.get(id.as_str()) {
                Some(child) if self.ancestors.contains(child.id.as_str()) => {
                    log::warn!("skipping cyclic child {id} of block {}", block.id);
                    None
                }
                Some(child) => Some(*child),
                None => {
                    log::warn!("skipping missing child {id} of block {}", block.id);
                    None
                }
            })
            .collect()
    }

    fn leave(&mut self, block: &Block) {
        self.ancestors.remove(block.id.as_str());
    }
}

/// Text-bearing paragraph for a block's content (no `blockId`).
fn paragraph(block: &Block) -> Node {
    Node::new(schema::PARAGRAPH).with_content(inline_nodes(block))
}

/// Node carrying the block's properties as attrs plus its `blockId`.
fn atom(node_type: &str, block: &Block) -> Node {
    let mut node = Node::new(node_type);
    node.attrs = block.properties.clone();
    node.with_block_id(&block.id)
}

/// Inline nodes for a block's content: text runs, hard breaks and mentions.
fn inline_nodes(block: &Block) -> Vec<Node> {
    let mut nodes = Vec::new();
    for run in to_runs(&block.content, &block.marks) {
        if run.is_point() {
            nodes.extend(point_node(&run));
            continue;
        }
        let marks = node_marks(&run);
        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                let mut hard_break = Node::new(schema::HARD_BREAK);
                hard_break.marks = marks.clone();
                nodes.push(hard_break);
            }
            if !piece.is_empty() {
                nodes.push(Node::text(piece, marks.clone()));
            }
        }
    }
    nodes
}

fn point_node(run: &Run) -> Option<Node> {
    run.marks.first().map(|mark| {
        let mut node = Node::new(schema::MENTION);
        node.attrs = mark.attrs.clone();
        node
    })
}

fn node_marks(run: &Run) -> Vec<NodeMark> {
    run.marks
        .iter()
        .filter_map(|mark| {
            schema::mark_name(mark.mark_type).map(|name| NodeMark {
                mark_type: name.to_string(),
                attrs: mark.attrs.clone(),
            })
        })
        .collect()
}

fn table_node(block: &Block) -> Node {
    let header_row = block
        .properties
        .get("headerRow")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let mut rows: Vec<Vec<String>> = block
        .properties
        .get("rows")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| {
                            cells
                                .iter()
                                .map(|c| c.as_str().unwrap_or_default().to_string())
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .filter(|row: &Vec<String>| !row.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if rows.is_empty() {
        rows.push(vec![String::new()]);
    }

    let content = rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let cell_type = if r == 0 && header_row {
                schema::TABLE_HEADER
            } else {
                schema::TABLE_CELL
            };
            let cells = row
                .iter()
                .map(|text| {
                    let mut para = Node::new(schema::PARAGRAPH);
                    if !text.is_empty() {
                        para.content = vec![Node::text(text.clone(), Vec::new())];
                    }
                    Node::new(cell_type).with_content(vec![para])
                })
                .collect();
            Node::new(schema::TABLE_ROW).with_content(cells)
        })
        .collect();

    let mut node = atom(schema::TABLE, block);
    // Rows travel as the node's content, not as attrs
    node.attrs.remove("rows");
    node.attrs.remove("headerRow");
    node.with_content(content)
}

/// Headings in reading order, descending into containers.
fn collect_headings(blocks: &[&Block], map: &BlockMap<'_>) -> Vec<Value> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut stack: Vec<&Block> = blocks.iter().rev().copied().collect();

    while let Some(block) = stack.pop() {
        if !seen.insert(block.id.as_str()) {
            continue;
        }
        if let Some(level) = block.kind.heading_level() {
            out.push(json!({
                "blockId": block.id.as_str(),
                "level": level,
                "text": block.content,
            }));
        }
        if !block.kind.nests_children() {
            continue;
        }
        stack.extend(
            block
                .children
                .iter()
                .rev()
                .filter_map(|id| map.get(id.as_str()).copied()),
        );
    }
    out
}
