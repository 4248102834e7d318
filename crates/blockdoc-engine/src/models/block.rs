use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{mark::InlineMark, text};

/// Kind-specific key/value payload (`checked`, `language`, `rows`, `url`, ...).
pub type Properties = Map<String, Value>;

/// Opaque, unique block identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    /// Fresh collision-resistant id (UUID v4).
    pub fn generate() -> Self {
        BlockId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        BlockId(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        BlockId(s)
    }
}

/// Block variants understood by the document model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletListItem,
    NumberedListItem,
    TodoItem,
    Quote,
    Code,
    Divider,
    Image,
    Callout,
    Toggle,
    Table,
    ColumnLayout,
    Column,
    Embed,
    Bookmark,
    File,
    Equation,
    TableOfContents,
}

impl BlockKind {
    /// Kinds whose consecutive blocks are grouped into one list node in the tree.
    pub fn is_run_forming(self) -> bool {
        matches!(
            self,
            BlockKind::BulletListItem | BlockKind::NumberedListItem | BlockKind::TodoItem
        )
    }

    /// Kinds whose `children` hold nested blocks rendered inside them.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            BlockKind::Toggle | BlockKind::ColumnLayout | BlockKind::Column
        )
    }

    /// Kinds whose `children` are rendered nested under them in the tree.
    /// Children listed on any other kind stay at the top level.
    pub fn nests_children(self) -> bool {
        self.is_container() || self.is_run_forming()
    }

    /// Kinds that carry editable inline text.
    pub fn has_text(self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading1
                | BlockKind::Heading2
                | BlockKind::Heading3
                | BlockKind::BulletListItem
                | BlockKind::NumberedListItem
                | BlockKind::TodoItem
                | BlockKind::Quote
                | BlockKind::Code
                | BlockKind::Callout
                | BlockKind::Toggle
                | BlockKind::Equation
        )
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            BlockKind::Heading1 => Some(1),
            BlockKind::Heading2 => Some(2),
            BlockKind::Heading3 => Some(3),
            _ => None,
        }
    }

    /// Heading kind for a level. Levels deeper than 3 collapse to `Heading3`.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => BlockKind::Heading1,
            2 => BlockKind::Heading2,
            _ => BlockKind::Heading3,
        }
    }
}

/// One ordered unit of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<InlineMark>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockId>,
}

impl Block {
    /// Empty block of `kind` with a freshly generated id.
    pub fn new(kind: BlockKind) -> Self {
        Self::with_id(BlockId::generate(), kind)
    }

    /// The default block a page starts with.
    pub fn empty_paragraph() -> Self {
        Self::new(BlockKind::Paragraph)
    }

    pub fn with_id(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            content: String::new(),
            marks: Vec::new(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_marks(mut self, marks: Vec<InlineMark>) -> Self {
        self.marks = marks;
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<BlockId>) -> Self {
        self.children = children;
        self
    }

    /// Content length in UTF-16 code units; the valid offset domain is `[0, len]`.
    pub fn content_len(&self) -> usize {
        text::utf16_len(&self.content)
    }

    /// `checked` state of a todo item. Missing means unchecked.
    pub fn checked(&self) -> bool {
        self.properties
            .get("checked")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Lookup from block id to block, used to resolve container children.
pub type BlockMap<'a> = HashMap<&'a str, &'a Block>;

pub fn block_map(blocks: &[Block]) -> BlockMap<'_> {
    blocks.iter().map(|b| (b.id.as_str(), b)).collect()
}

/// Blocks not nested under a container or list item, in their original order.
pub fn top_level_blocks(blocks: &[Block]) -> Vec<&Block> {
    let nested: HashSet<&str> = blocks
        .iter()
        .filter(|b| b.kind.nests_children())
        .flat_map(|b| b.children.iter().map(BlockId::as_str))
        .collect();
    blocks
        .iter()
        .filter(|b| !nested.contains(b.id.as_str()))
        .collect()
}
