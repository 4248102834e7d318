//! UTF-16 offset helpers.
//!
//! Block content is stored as a Rust `String`, but every offset in the document
//! model (mark ranges, split points, caret positions) counts UTF-16 code units so
//! that offsets agree with the rich-text editor on the other side of the tree
//! conversion. These helpers translate between the two.

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index in `s` for a UTF-16 offset.
///
/// Offsets past the end clamp to `s.len()`. An offset that falls between the two
/// halves of a surrogate pair snaps back to the start of that character.
pub fn byte_index(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return idx;
        }
        units = next;
    }
    s.len()
}

/// Nearest character boundary at or before `offset`, in UTF-16 units.
pub fn snap(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for ch in s.chars() {
        let next = units + ch.len_utf16();
        if next > offset {
            break;
        }
        units = next;
    }
    units
}

/// Substring of `s` covering UTF-16 units `[from, to)`, clamped to the content.
pub fn slice(s: &str, from: usize, to: usize) -> &str {
    let start = byte_index(s, from);
    let end = byte_index(s, to.max(from));
    &s[start..end]
}

/// Split `s` into `(s[..offset], s[offset..])` by UTF-16 offset.
pub fn split_at(s: &str, offset: usize) -> (&str, &str) {
    s.split_at(byte_index(s, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ascii_len_matches_bytes() {
        assert_eq!(utf16_len("Hello world"), 11);
    }

    #[test]
    fn test_astral_chars_count_two_units() {
        // U+1F600 is outside the BMP
        assert_eq!(utf16_len("a😀b"), 4);
        assert_eq!(slice("a😀b", 1, 3), "😀");
        assert_eq!(slice("a😀b", 3, 4), "b");
    }

    #[test]
    fn test_offset_inside_surrogate_pair_snaps_back() {
        assert_eq!(byte_index("a😀b", 2), 1);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 3)]
    #[case(9, 4)]
    fn test_snap_to_char_boundary(#[case] offset: usize, #[case] expected: usize) {
        assert_eq!(snap("a😀b", offset), expected);
    }

    #[rstest]
    #[case(0, ("", "héllo"))]
    #[case(2, ("hé", "llo"))]
    #[case(5, ("héllo", ""))]
    #[case(99, ("héllo", ""))]
    fn test_split_at(#[case] offset: usize, #[case] expected: (&str, &str)) {
        assert_eq!(split_at("héllo", offset), expected);
    }

    #[test]
    fn test_slice_with_reversed_range_is_empty() {
        assert_eq!(slice("hello", 4, 2), "");
    }
}
