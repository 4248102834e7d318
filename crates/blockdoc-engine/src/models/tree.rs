use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::block::BlockId;

/// Attribute map on a tree node or tree mark.
pub type Attrs = Map<String, Value>;

/// Attribute carrying a block's identity through the tree.
pub const BLOCK_ID_ATTR: &str = "blockId";

/// A node in the nested tree document consumed by the rich-text editor.
///
/// Mirrors the editor's JSON shape: `{ type, attrs?, content? }` for element nodes
/// and `{ type: "text", text, marks? }` for text leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<NodeMark>,
}

/// A mark applied to a text run (or inline atom) in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Attrs,
}

impl NodeMark {
    pub fn new(mark_type: impl Into<String>) -> Self {
        Self {
            mark_type: mark_type.into(),
            attrs: Attrs::new(),
        }
    }
}

impl Node {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: Attrs::new(),
            content: Vec::new(),
            text: None,
            marks: Vec::new(),
        }
    }

    /// Root node of a tree document.
    pub fn doc(content: Vec<Node>) -> Self {
        Self::new("doc").with_content(content)
    }

    /// Text leaf.
    pub fn text(text: impl Into<String>, marks: Vec<NodeMark>) -> Self {
        Self {
            text: Some(text.into()),
            marks,
            ..Self::new("text")
        }
    }

    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = content;
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_block_id(self, id: &BlockId) -> Self {
        self.with_attr(BLOCK_ID_ATTR, id.as_str())
    }

    pub fn is_text(&self) -> bool {
        self.node_type == "text"
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attrs.get(key).and_then(Value::as_bool)
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attrs.get(key).and_then(Value::as_u64)
    }

    /// The `blockId` attribute, when present and non-empty.
    pub fn block_id(&self) -> Option<BlockId> {
        self.attr_str(BLOCK_ID_ATTR)
            .filter(|s| !s.is_empty())
            .map(BlockId::from)
    }

    /// All text below this node, concatenated in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }
}
