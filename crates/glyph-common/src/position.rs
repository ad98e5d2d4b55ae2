//! Line/column lookup, backing the opt-in `source_map` program option.
//!
//! This is deliberately a thin line-index, not a source-map-v3 emitter: mapping
//! resolved elements back to original text is in scope, generating a mapping
//! file for a downstream bundler is not.

use crate::span::Span;

/// A 1-based line, 0-based column position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Maps byte offsets within one source file's text to `Position`s.
pub struct LineMap {
    /// Byte offset of the start of each line.
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    pub fn position_of(&self, offset: u32) -> Position {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => Position { line: line as u32 + 1, column: 0 },
            Err(insert_at) => {
                let line = insert_at - 1;
                let column = offset - self.line_starts[line];
                Position { line: line as u32 + 1, column }
            }
        }
    }

    pub fn span_positions(&self, span: Span) -> (Position, Position) {
        (self.position_of(span.start), self.position_of(span.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_line_and_column() {
        let map = LineMap::new("abc\ndef\nghi");
        assert_eq!(map.position_of(0), Position { line: 1, column: 0 });
        assert_eq!(map.position_of(4), Position { line: 2, column: 0 });
        assert_eq!(map.position_of(9), Position { line: 3, column: 1 });
    }
}
