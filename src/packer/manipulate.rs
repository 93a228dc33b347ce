// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Text transforms applied to a file before or after compression.

use super::lexer::{Lexer, Lexicon, TokenKind};
use std::path::Path;

/// Characters that leave a Python expression open at the end of a line.
const CONTINUATION: &[char] = &[
    '\\', '(', '[', '{', ',', '=', '+', '-', '*', '/', '%', '|', '&', '<', '>',
];

/// Strip comments using the lexicon chosen by the file extension.
///
/// Directive comments (`//go:build`, `# type:`, `#!` and friends) are kept.
/// For Python, a bare triple-quoted string statement is treated as a
/// docstring and removed; prefixed literals such as f-strings stay. Files
/// with no known lexicon are returned unchanged.
pub fn remove_comments(content: &str, path: &Path) -> String {
    let Some(lexicon) = Lexicon::for_path(path) else {
        return content.to_string();
    };

    let mut out = String::with_capacity(content.len());
    let mut depth = 0usize;

    for token in Lexer::new(content, lexicon) {
        let Some(text) = content.get(token.start..token.end) else {
            continue;
        };
        let after = content.get(token.end..).unwrap_or_default();
        match token.kind {
            TokenKind::LineComment | TokenKind::BlockComment => {
                if lexicon.is_directive(text) {
                    out.push_str(text);
                } else {
                    trim_trailing_blanks(&mut out);
                }
            }
            TokenKind::Literal { triple: true }
                if depth == 0 && is_docstring(&out, after, lexicon) =>
            {
                trim_trailing_blanks(&mut out);
            }
            TokenKind::Code(ch) => {
                match ch {
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
                out.push(ch);
            }
            TokenKind::Literal { .. } => out.push_str(text),
        }
    }

    out
}

fn trim_trailing_blanks(out: &mut String) {
    let kept = out.trim_end_matches([' ', '\t']).len();
    out.truncate(kept);
}

/// A triple-quoted literal is a docstring when it is the only thing on its
/// line and the previous line does not leave an expression open.
fn is_docstring(before: &str, after: &str, lexicon: &Lexicon) -> bool {
    let (previous, line_prefix) = match before.rfind('\n') {
        Some(i) => (&before[..i], &before[i + 1..]),
        None => ("", before),
    };
    if !line_prefix.trim().is_empty() {
        return false;
    }
    if previous
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| CONTINUATION.contains(&c))
    {
        return false;
    }
    let rest = after.split('\n').next().unwrap_or_default().trim();
    rest.is_empty() || lexicon.starts_line_comment(rest)
}

/// Drop lines that are empty or whitespace only.
pub fn remove_empty_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every line with its 1-based number, right-aligned to the widest
/// number in the file.
pub fn add_line_numbers(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_comments_c_like() {
        let src = "int a = 1; // one\n/* block\n   comment */\nint b = 2;\n";
        let out = remove_comments(src, Path::new("a.c"));
        assert_eq!(out, "int a = 1;\n\nint b = 2;\n");
    }

    #[test]
    fn test_remove_comments_keeps_strings() {
        let src = "const url = \"http://example.com\"; // home\n";
        let out = remove_comments(src, Path::new("a.ts"));
        assert_eq!(out, "const url = \"http://example.com\";\n");
    }

    #[test]
    fn test_remove_comments_keeps_go_directives() {
        let src = "//go:build linux\n// +build linux\n\n// Package p does things.\npackage p\n";
        let out = remove_comments(src, Path::new("p.go"));
        assert_eq!(out, "//go:build linux\n// +build linux\n\n\npackage p\n");
    }

    #[test]
    fn test_remove_comments_python_docstring_and_fstring() {
        let src = "def f(x):\n    \"\"\"Docs.\"\"\"\n    y = f\"\"\"{x}\"\"\"  # note\n    return y\n";
        let out = remove_comments(src, Path::new("m.py"));
        assert_eq!(
            out,
            "def f(x):\n\n    y = f\"\"\"{x}\"\"\"\n    return y\n"
        );
    }

    #[test]
    fn test_remove_comments_python_assigned_triple_string_kept() {
        let src = "SQL = (\n    \"\"\"select 1\"\"\"\n)\n";
        let out = remove_comments(src, Path::new("q.py"));
        assert_eq!(out, src);
    }

    #[test]
    fn test_remove_comments_unknown_extension() {
        let src = "# not a comment here\n";
        assert_eq!(remove_comments(src, Path::new("notes.txt")), src);
    }

    #[test]
    fn test_remove_empty_lines() {
        assert_eq!(remove_empty_lines("a\n\n  \n\tb\n"), "a\n\tb");
    }

    #[test]
    fn test_line_numbers_are_right_aligned() {
        let content = (1..=10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let out = add_line_numbers(&content);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 1: l1");
        assert_eq!(lines[9], "10: l10");
    }
}
