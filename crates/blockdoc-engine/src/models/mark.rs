use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute payload carried by a mark (link href, colour, mention target, ...).
pub type MarkAttrs = Map<String, Value>;

/// Inline formatting kinds that can be applied to a block's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkType {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Link,
    Highlight,
    TextColor,
    Mention,
}

impl MarkType {
    /// Whether typing at the right edge of the mark extends it.
    pub fn is_inclusive(self) -> bool {
        !matches!(self, MarkType::Link | MarkType::Mention)
    }

    /// Point annotations are the only marks allowed to be zero-width.
    pub fn is_point(self) -> bool {
        matches!(self, MarkType::Mention)
    }

    /// Types whose attrs are a single value per position (one link target, one colour).
    /// Adding such a mark replaces whatever the range carried before.
    pub fn is_exclusive(self) -> bool {
        matches!(
            self,
            MarkType::Link | MarkType::Highlight | MarkType::TextColor
        )
    }
}

/// Offset-ranged formatting over a block's content.
///
/// The range is half-open, `[from, to)`, in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineMark {
    #[serde(rename = "type")]
    pub mark_type: MarkType,
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: MarkAttrs,
}

impl InlineMark {
    pub fn new(mark_type: MarkType, from: usize, to: usize) -> Self {
        Self {
            mark_type,
            from,
            to,
            attrs: MarkAttrs::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: MarkAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Convenience for a `link` mark pointing at `href`.
    pub fn link(from: usize, to: usize, href: impl Into<String>) -> Self {
        let mut attrs = MarkAttrs::new();
        attrs.insert("href".to_string(), Value::String(href.into()));
        Self::new(MarkType::Link, from, to).with_attrs(attrs)
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Same type and same attrs: the two marks are interchangeable over a range.
    pub fn same_identity(&self, other: &InlineMark) -> bool {
        self.mark_type == other.mark_type && self.attrs == other.attrs
    }

    /// Copy of this mark moved to `[from, to)`.
    pub fn with_range(&self, from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            ..self.clone()
        }
    }

    /// Whether `[from, to)` intersects this mark.
    pub fn overlaps(&self, from: usize, to: usize) -> bool {
        self.from < to && from < self.to
    }

    pub(crate) fn sort_key(&self) -> (MarkType, usize, usize) {
        (self.mark_type, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mark_serializes_with_type_key() {
        let mark = InlineMark::new(MarkType::Bold, 0, 5);
        let json = serde_json::to_value(&mark).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bold", "from": 0, "to": 5}));
    }

    #[test]
    fn test_link_attrs_roundtrip_through_json() {
        let mark = InlineMark::link(2, 4, "https://example.com");
        let json = serde_json::to_string(&mark).unwrap();
        let back: InlineMark = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mark);
    }

    #[test]
    fn test_identity_ignores_range() {
        let a = InlineMark::link(0, 2, "a");
        let b = InlineMark::link(5, 9, "a");
        let c = InlineMark::link(0, 2, "c");
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let mark = InlineMark::new(MarkType::Italic, 3, 6);
        assert!(mark.overlaps(5, 8));
        assert!(!mark.overlaps(6, 8));
        assert!(!mark.overlaps(0, 3));
    }

    #[test]
    fn test_type_flags() {
        assert!(MarkType::Bold.is_inclusive());
        assert!(!MarkType::Link.is_inclusive());
        assert!(MarkType::Mention.is_point());
        assert!(MarkType::TextColor.is_exclusive());
        assert!(!MarkType::Bold.is_exclusive());
    }
}
