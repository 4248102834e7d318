//! Node and mark type names agreed with the editor's schema registration.

use crate::models::MarkType;

pub const DOC: &str = "doc";
pub const TEXT: &str = "text";
pub const HARD_BREAK: &str = "hardBreak";
pub const MENTION: &str = "mention";

pub const PARAGRAPH: &str = "paragraph";
pub const HEADING: &str = "heading";
pub const BULLET_LIST: &str = "bulletList";
pub const ORDERED_LIST: &str = "orderedList";
pub const LIST_ITEM: &str = "listItem";
pub const TASK_LIST: &str = "taskList";
pub const TASK_ITEM: &str = "taskItem";
pub const BLOCKQUOTE: &str = "blockquote";
pub const CODE_BLOCK: &str = "codeBlock";
pub const HORIZONTAL_RULE: &str = "horizontalRule";
pub const IMAGE: &str = "image";
pub const TABLE: &str = "table";
pub const TABLE_ROW: &str = "tableRow";
pub const TABLE_CELL: &str = "tableCell";
pub const TABLE_HEADER: &str = "tableHeader";

pub const CALLOUT: &str = "callout";
pub const TOGGLE: &str = "toggle";
pub const COLUMNS: &str = "columns";
pub const COLUMN: &str = "column";
pub const EMBED: &str = "embed";
pub const BOOKMARK: &str = "bookmark";
pub const FILE: &str = "file";
pub const EQUATION: &str = "equation";
pub const TABLE_OF_CONTENTS: &str = "tableOfContents";

/// Tree name of a formatting mark. Mentions are inline nodes, not marks.
pub fn mark_name(mark_type: MarkType) -> Option<&'static str> {
    match mark_type {
        MarkType::Bold => Some("bold"),
        MarkType::Italic => Some("italic"),
        MarkType::Underline => Some("underline"),
        MarkType::Strikethrough => Some("strike"),
        MarkType::Code => Some("code"),
        MarkType::Link => Some("link"),
        MarkType::Highlight => Some("highlight"),
        MarkType::TextColor => Some("textStyle"),
        MarkType::Mention => None,
    }
}

pub fn mark_from_name(name: &str) -> Option<MarkType> {
    match name {
        "bold" => Some(MarkType::Bold),
        "italic" => Some(MarkType::Italic),
        "underline" => Some(MarkType::Underline),
        "strike" => Some(MarkType::Strikethrough),
        "code" => Some(MarkType::Code),
        "link" => Some(MarkType::Link),
        "highlight" => Some(MarkType::Highlight),
        "textStyle" => Some(MarkType::TextColor),
        _ => None,
    }
}

/// Nodes whose own content is inline text.
pub fn is_textblock(node_type: &str) -> bool {
    matches!(node_type, PARAGRAPH | HEADING | CODE_BLOCK)
}

pub fn is_inline(node_type: &str) -> bool {
    matches!(node_type, TEXT | HARD_BREAK | MENTION)
}
