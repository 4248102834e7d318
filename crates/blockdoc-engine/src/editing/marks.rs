//! # Mark Algebra
//!
//! Pure functions over offset-ranged [`InlineMark`]s. Nothing here mutates its
//! input; every operation returns a fresh mark list.
//!
//! Marks of the same identity (type plus attrs) must never overlap or touch once
//! they leave this module. Every entry point that adds marks finishes with
//! [`resolve_overlaps`], and the coverage query normalises its input first, so
//! callers cannot observe an unmerged set.

use crate::models::{InlineMark, MarkAttrs, MarkType};

/// Merge overlapping or adjacent marks of the same type and attrs.
///
/// The result is sorted by type then start offset. Zero-width marks survive only
/// for point types (mentions), which never merge since each stands for one
/// inline node. Inverted ranges are dropped.
pub fn resolve_overlaps(marks: &[InlineMark]) -> Vec<InlineMark> {
    let mut sorted: Vec<InlineMark> = marks
        .iter()
        .filter(|m| m.from < m.to || (m.from == m.to && m.mark_type.is_point()))
        .cloned()
        .collect();
    sorted.sort_by_key(InlineMark::sort_key);

    let mut merged: Vec<InlineMark> = Vec::with_capacity(sorted.len());
    for mark in sorted {
        if mark.mark_type.is_point() {
            merged.push(mark);
            continue;
        }
        // Same-identity marks arrive in start order, so only the latest one can touch.
        if let Some(prev) = merged.iter_mut().rev().find(|m| m.same_identity(&mark))
            && mark.from <= prev.to
        {
            prev.to = prev.to.max(mark.to);
            continue;
        }
        merged.push(mark);
    }
    merged
}

/// Add `new_mark` and re-merge.
///
/// For exclusive types (link, highlight, text colour) the new mark replaces any
/// mark of that type already covering part of its range.
pub fn add_mark(marks: &[InlineMark], new_mark: InlineMark) -> Vec<InlineMark> {
    let mut out = if new_mark.mark_type.is_exclusive() {
        remove_mark(marks, new_mark.mark_type, new_mark.from, new_mark.to)
    } else {
        marks.to_vec()
    };
    out.push(new_mark);
    resolve_overlaps(&out)
}

/// Strip `mark_type` from `[from, to)`.
///
/// Marks partially inside the range keep the pieces outside it; marks fully
/// inside vanish; other types pass through untouched.
pub fn remove_mark(
    marks: &[InlineMark],
    mark_type: MarkType,
    from: usize,
    to: usize,
) -> Vec<InlineMark> {
    let mut out = Vec::with_capacity(marks.len() + 1);
    for mark in marks {
        if mark.mark_type != mark_type {
            out.push(mark.clone());
            continue;
        }
        if mark.is_empty() {
            if !(from <= mark.from && mark.from < to) {
                out.push(mark.clone());
            }
            continue;
        }
        if !mark.overlaps(from, to) {
            out.push(mark.clone());
            continue;
        }
        if mark.from < from {
            out.push(mark.with_range(mark.from, from));
        }
        if to < mark.to {
            out.push(mark.with_range(to, mark.to));
        }
    }
    out
}

/// Whether marks of `mark_type` cover `[from, to)` with no gap.
///
/// An empty range is covered when its position lies inside such a mark, matching
/// [`get_marks_at_position`].
pub fn has_mark_in_range(marks: &[InlineMark], mark_type: MarkType, from: usize, to: usize) -> bool {
    let mut same: Vec<&InlineMark> = marks
        .iter()
        .filter(|m| m.mark_type == mark_type && m.from < m.to)
        .collect();

    if from >= to {
        return same.iter().any(|m| m.from <= from && from < m.to);
    }

    same.sort_by_key(|m| m.from);
    let mut cursor = from;
    for mark in same {
        if mark.from > cursor {
            break;
        }
        cursor = cursor.max(mark.to);
        if cursor >= to {
            return true;
        }
    }
    false
}

/// Remove `mark_type` from the range if it is fully covered, otherwise apply it.
pub fn toggle_mark(
    marks: &[InlineMark],
    mark_type: MarkType,
    from: usize,
    to: usize,
    attrs: Option<MarkAttrs>,
) -> Vec<InlineMark> {
    let marks = resolve_overlaps(marks);
    if has_mark_in_range(&marks, mark_type, from, to) {
        remove_mark(&marks, mark_type, from, to)
    } else {
        let mark = InlineMark::new(mark_type, from, to).with_attrs(attrs.unwrap_or_default());
        add_mark(&marks, mark)
    }
}

/// Marks active at `position` (`from <= position < to`).
pub fn get_marks_at_position(marks: &[InlineMark], position: usize) -> Vec<InlineMark> {
    marks
        .iter()
        .filter(|m| m.from <= position && position < m.to)
        .cloned()
        .collect()
}

/// Clip every mark to `[0, len]`, dropping the ones that end up empty.
pub fn clamp_marks(marks: &[InlineMark], len: usize) -> Vec<InlineMark> {
    marks
        .iter()
        .filter_map(|m| {
            let from = m.from.min(len);
            let to = m.to.min(len);
            if from < to || (from == to && m.mark_type.is_point() && m.from <= len) {
                Some(m.with_range(from, to))
            } else {
                None
            }
        })
        .collect()
}
