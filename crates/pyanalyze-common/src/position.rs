//! Position and range utilities for hover/definition/completion output.
//!
//! The checker and driver work in byte offsets (`Span`); a future LSP
//! front-end needs line/column positions instead. This module converts
//! between the two without either side depending on the other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file_path: String,
    pub range: Range,
}

impl Location {
    #[must_use]
    pub fn new(file_path: String, range: Range) -> Self {
        Self { file_path, range }
    }
}

/// Maps byte offsets to line/column positions in O(log n).
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        Self { line_starts }
    }

    #[must_use]
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        Position {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            character: offset.saturating_sub(line_start),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Inverse of `offset_to_position`. Clamps an out-of-range line/column
    /// to the nearest valid offset rather than panicking, since positions
    /// reported by an editor can momentarily lag a file's latest edit.
    #[must_use]
    pub fn position_to_offset(&self, position: Position) -> u32 {
        let line = position.line as usize;
        let line_start = self.line_starts.get(line).copied().unwrap_or_else(|| self.line_starts.last().copied().unwrap_or(0));
        line_start + position.character
    }
}

#[cfg(test)]
#[path = "tests/position.rs"]
mod tests;
