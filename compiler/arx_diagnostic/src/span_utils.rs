//! Line and column lookup for rendering spans.
//!
//! ## Performance
//!
//! [`LineOffsetTable`] pre-computes line start offsets once per source so
//! each lookup is a binary search instead of a rescan.

use arx_ir::Span;

/// Pre-computed line offset table for line/column lookup.
///
/// # Example
///
/// ```
/// use arx_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "def f(x)\n  x + 1;";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 11), (2, 3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line number containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column) for `offset`; columns count characters.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.line_start_offset(line).unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = source
            .get(line_start..end)
            .map_or(0, |prefix| prefix.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Byte offset where a 1-based line starts.
    pub fn line_start_offset(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.offsets.get((line - 1) as usize).copied()
    }

    /// Text of a 1-based line, without its trailing newline.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> Option<&'s str> {
        let start = self.line_start_offset(line)? as usize;
        let end = self
            .line_start_offset(line + 1)
            .map_or(source.len(), |next| next as usize);
        source
            .get(start..end)
            .map(|text| text.trim_end_matches(['\n', '\r']))
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    /// Line and column of the start of `span`.
    pub fn span_start(&self, source: &str, span: Span) -> (u32, u32) {
        self.offset_to_line_col(source, span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_line() {
        let source = "1 + 2";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_count(), 1);
        assert_eq!(table.offset_to_line_col(source, 4), (1, 5));
    }

    #[test]
    fn test_offset_at_newline_belongs_to_its_line() {
        let source = "ab\ncd\n";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 2), (1, 3));
        assert_eq!(table.offset_to_line_col(source, 3), (2, 1));
        assert_eq!(table.line_count(), 3);
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "# héllo\nx";
        let table = LineOffsetTable::build(source);
        // "# héllo" is 7 characters but 8 bytes.
        assert_eq!(table.offset_to_line_col(source, 8), (1, 8));
        assert_eq!(table.offset_to_line_col(source, 9), (2, 1));
    }

    #[test]
    fn test_line_text() {
        let source = "def f(x)\r\n  x;\n";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_text(source, 1), Some("def f(x)"));
        assert_eq!(table.line_text(source, 2), Some("  x;"));
        assert_eq!(table.line_text(source, 3), Some(""));
        assert_eq!(table.line_text(source, 9), None);
    }

    #[test]
    fn test_line_start_offset_out_of_range() {
        let table = LineOffsetTable::build("a\nb");
        assert_eq!(table.line_start_offset(0), None);
        assert_eq!(table.line_start_offset(2), Some(2));
        assert_eq!(table.line_start_offset(3), None);
    }
}
