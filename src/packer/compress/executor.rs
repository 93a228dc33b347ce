// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsing and query execution.
//!
//! A [`Tree`] produced here belongs to a single compression call. It is never
//! cached or sent to another thread.

use super::error::CompressionError;
use super::source::SourceText;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

/// One labelled region of the syntax tree, with zero-based positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'q> {
    pub label: &'q str,
    pub start_row: usize,
    pub start_column: usize,
    pub end_row: usize,
    pub end_column: usize,
}

impl<'q> Capture<'q> {
    fn from_node(label: &'q str, node: Node<'_>, source: &SourceText<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        let mut capture = Self {
            label,
            start_row: start.row,
            start_column: start.column,
            end_row: end.row,
            end_column: end.column,
        };
        // Some grammars end comment nodes after the newline.
        if capture.end_column == 0 && capture.end_row > capture.start_row {
            capture.end_row -= 1;
            capture.end_column = source.line(capture.end_row).map_or(0, str::len);
        }
        capture
    }
}

/// Parse `content` with `grammar`.
///
/// A tree that contains syntax errors is rejected: compressing a file the
/// grammar does not understand would silently drop declarations.
pub fn parse(content: &str, grammar: &Language, language: &str) -> Result<Tree, CompressionError> {
    let mut parser = Parser::new();
    parser
        .set_language(grammar)
        .map_err(|e| CompressionError::parse(language, format!("incompatible grammar: {e}")))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| CompressionError::parse(language, "parser produced no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let row = first_error(root).map_or(root.start_position().row, |n| n.start_position().row);
        return Err(CompressionError::parse(
            language,
            format!("syntax error near line {}", row + 1),
        ));
    }

    Ok(tree)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).find_map(first_error)
}

/// Run `query` over `tree` and return every capture ordered by start position.
///
/// Overlapping captures are all kept. The sort is stable, so captures that
/// start at the same position keep the order the query produced them in.
pub fn run_query<'q>(tree: &Tree, query: &'q Query, source: &SourceText<'_>) -> Vec<Capture<'q>> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.captures(query, tree.root_node(), source.content().as_bytes());

    let mut captures = Vec::new();
    while let Some((query_match, index)) = matches.next() {
        let Some(capture) = query_match.captures.get(*index) else {
            continue;
        };
        let Some(label) = usize::try_from(capture.index)
            .ok()
            .and_then(|i| names.get(i).copied())
        else {
            continue;
        };
        captures.push(Capture::from_node(label, capture.node, source));
    }

    captures.sort_by_key(|c| (c.start_row, c.start_column));
    captures
}
