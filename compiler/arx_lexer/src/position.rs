//! Incremental line/column tracking.
//!
//! Tokens arrive in increasing offset order, so the tracker only scans the
//! bytes between the previous token and the next one. Newlines are found
//! with `memchr`; columns are counted in characters from the last anchor on
//! the current line.

use arx_ir::Position;

pub(crate) struct LineTracker {
    line: u32,
    /// Byte offset and column of the last position handed out on `line`.
    anchor_offset: usize,
    anchor_column: u32,
}

impl LineTracker {
    pub(crate) fn new() -> Self {
        LineTracker {
            line: 1,
            anchor_offset: 0,
            anchor_column: 1,
        }
    }

    /// Position of byte `offset`. Offsets must be non-decreasing between
    /// calls.
    pub(crate) fn position_at(&mut self, source: &str, offset: usize) -> Position {
        let offset = offset.min(source.len());
        let gap = source.as_bytes().get(self.anchor_offset..offset).unwrap_or(&[]);

        let newlines = memchr::memchr_iter(b'\n', gap).count();
        if newlines > 0 {
            let last = memchr::memrchr(b'\n', gap).unwrap_or(0);
            self.line = self
                .line
                .saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX));
            self.anchor_offset += last + 1;
            self.anchor_column = 1;
        }

        let columns = source
            .get(self.anchor_offset..offset)
            .map_or(0, |text| text.chars().count());
        self.anchor_column = self
            .anchor_column
            .saturating_add(u32::try_from(columns).unwrap_or(u32::MAX));
        self.anchor_offset = offset;

        Position {
            offset: u32::try_from(offset).unwrap_or(u32::MAX),
            line: self.line,
            column: self.anchor_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line_col(pos: Position) -> (u32, u32) {
        (pos.line, pos.column)
    }

    #[test]
    fn test_positions_across_lines() {
        let source = "ab\n  cd\n\nef";
        let mut tracker = LineTracker::new();
        assert_eq!(line_col(tracker.position_at(source, 0)), (1, 1));
        assert_eq!(line_col(tracker.position_at(source, 1)), (1, 2));
        assert_eq!(line_col(tracker.position_at(source, 5)), (2, 3));
        assert_eq!(line_col(tracker.position_at(source, 9)), (4, 1));
    }

    #[test]
    fn test_repeated_offset_is_stable() {
        let source = "x y";
        let mut tracker = LineTracker::new();
        let first = tracker.position_at(source, 2);
        let second = tracker.position_at(source, 2);
        assert_eq!(first, second);
        assert_eq!(line_col(first), (1, 3));
    }

    #[test]
    fn test_multibyte_characters_count_once() {
        let source = "é x";
        let mut tracker = LineTracker::new();
        assert_eq!(line_col(tracker.position_at(source, 3)), (1, 3));
    }
}
