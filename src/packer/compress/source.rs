// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use std::ops::Range;

/// File content split into lines exactly once.
///
/// Line views have a trailing `\r` removed; byte offsets always refer to the
/// original content so the lexer can run from any `(row, column)` position.
#[derive(Debug)]
pub struct SourceText<'a> {
    content: &'a str,
    lines: Vec<&'a str>,
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut line_starts = Vec::new();
        let mut start = 0;
        for line in content.split('\n') {
            line_starts.push(start);
            lines.push(line.strip_suffix('\r').unwrap_or(line));
            start += line.len() + 1;
        }
        Self {
            content,
            lines,
            line_starts,
        }
    }

    pub const fn content(&self) -> &'a str {
        self.content
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, row: usize) -> Option<&'a str> {
        self.lines.get(row).copied()
    }

    /// Lines `first..=last`, clamped to the end of the file.
    pub fn lines(&self, first: usize, last: usize) -> &[&'a str] {
        let end = last.saturating_add(1).min(self.lines.len());
        self.lines.get(first..end).unwrap_or_default()
    }

    /// Byte offset of a `(row, column)` position; `None` when out of range.
    pub fn offset(&self, row: usize, column: usize) -> Option<usize> {
        let start = *self.line_starts.get(row)?;
        let line = self.lines.get(row)?;
        (column <= line.len()).then_some(start + column)
    }

    /// Byte offset one past the last byte of `row` (excluding `\r`).
    pub fn line_end_offset(&self, row: usize) -> Option<usize> {
        Some(*self.line_starts.get(row)? + self.lines.get(row)?.len())
    }

    /// The `(row, column)` of a byte offset.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(insert) => insert.saturating_sub(1),
        };
        let start = self.line_starts.get(row).copied().unwrap_or_default();
        (row, offset.saturating_sub(start))
    }

    pub fn slice(&self, range: Range<usize>) -> Option<&'a str> {
        self.content.get(range)
    }
}
