use serde::{Deserialize, Serialize};

/// What Tree→Flat conversion returns for a document with no block nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDocument {
    /// Return an empty block list; the caller substitutes its default block.
    #[default]
    Omit,
    /// Return a single empty paragraph block.
    EmptyParagraph,
}

/// Knobs shared by both conversion directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub empty_document: EmptyDocument,
    /// Give childless column containers one empty paragraph so the editor's
    /// `block+` content rule holds.
    pub placeholder_children: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            empty_document: EmptyDocument::Omit,
            placeholder_children: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"empty_document": "empty_paragraph"}"#).unwrap();
        assert_eq!(options.empty_document, EmptyDocument::EmptyParagraph);
        assert!(options.placeholder_children);
    }
}
