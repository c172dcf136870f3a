//! UTF-16 offset helpers
//!
//! Block offsets count UTF-16 code units, matching the interchange format.
//! Rust strings are indexed by bytes, so every slice goes through here.

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte index for a UTF-16 offset, snapped down to a char boundary
///
/// Returns `(byte_index, utf16_offset)` where the second value is the offset
/// actually used after snapping. Offsets past the end clamp to the end.
pub fn utf16_to_byte(text: &str, offset: usize) -> (usize, usize) {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return (idx, units);
        }
        units = next;
    }
    (text.len(), units)
}
