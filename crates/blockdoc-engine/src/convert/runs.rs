//! # Mark-Run Codec
//!
//! Translates between a block's `content + marks` and the sequence of text runs
//! the tree uses, where each run is a maximal substring sharing one exact set of
//! active marks.
//!
//! Point marks (mentions) become empty-text runs positioned at their offset.

use std::collections::BTreeSet;

use crate::editing::marks::{clamp_marks, resolve_overlaps};
use crate::models::{InlineMark, MarkAttrs, MarkType, text};

/// One mark active over a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMark {
    pub mark_type: MarkType,
    pub attrs: MarkAttrs,
}

impl RunMark {
    pub fn new(mark_type: MarkType) -> Self {
        Self {
            mark_type,
            attrs: MarkAttrs::new(),
        }
    }

    fn from_mark(mark: &InlineMark) -> Self {
        Self {
            mark_type: mark.mark_type,
            attrs: mark.attrs.clone(),
        }
    }
}

/// A text run with its active marks. An empty `text` denotes a point annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub marks: Vec<RunMark>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn is_point(&self) -> bool {
        self.text.is_empty()
    }
}

/// Content and offset-ranged marks rebuilt from runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkedText {
    pub content: String,
    pub marks: Vec<InlineMark>,
}

/// Split `content` into the minimal run sequence for `marks`.
///
/// Marks are clipped to the content and merged first, so out-of-range or
/// unmerged input still yields well-formed runs.
pub fn to_runs(content: &str, marks: &[InlineMark]) -> Vec<Run> {
    let len = text::utf16_len(content);
    let marks = resolve_overlaps(&clamp_marks(marks, len));

    let mut boundaries = BTreeSet::from([0, len]);
    for mark in &marks {
        boundaries.insert(mark.from);
        boundaries.insert(mark.to);
    }
    let boundaries: Vec<usize> = boundaries.into_iter().collect();

    let mut runs = Vec::new();
    for (i, &start) in boundaries.iter().enumerate() {
        runs.extend(
            marks
                .iter()
                .filter(|m| m.is_empty() && m.from == start)
                .map(|m| Run {
                    text: String::new(),
                    marks: vec![RunMark::from_mark(m)],
                }),
        );

        let Some(&end) = boundaries.get(i + 1) else {
            break;
        };
        if start < end {
            runs.push(Run {
                text: text::slice(content, start, end).to_string(),
                marks: marks
                    .iter()
                    .filter(|m| !m.is_empty() && m.from <= start && end <= m.to)
                    .map(RunMark::from_mark)
                    .collect(),
            });
        }
    }
    runs
}

/// Concatenate runs back into content plus merged marks.
///
/// Adjacent runs carrying the same mark type and attrs collapse into one mark,
/// regardless of how the runs were split up.
pub fn from_runs(runs: &[Run]) -> MarkedText {
    let mut content = String::new();
    let mut marks = Vec::new();
    let mut offset = 0;

    for run in runs {
        let end = offset + text::utf16_len(&run.text);
        marks.extend(run.marks.iter().map(|m| {
            InlineMark::new(m.mark_type, offset, end).with_attrs(m.attrs.clone())
        }));
        content.push_str(&run.text);
        offset = end;
    }

    MarkedText {
        content,
        marks: resolve_overlaps(&marks),
    }
}
