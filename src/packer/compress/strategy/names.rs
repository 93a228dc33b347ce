// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Line-level identifier extraction.
//!
//! Names only feed deduplication keys, so a miss degrades to text-only
//! deduplication rather than a wrong fragment.

use super::dialect::Dialect;
use crate::packer::compress::source::SourceText;
use regex::Regex;
use std::sync::LazyLock;

static FUNCTION_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"=\s*(?:async\s+)?(?:function\b|\(|[A-Za-z_$][\w$]*\s*=>)")
        .expect("function value pattern is invalid")
});

static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:declare\s+)?(?:const|let|var)\b")
        .expect("binding pattern is invalid")
});

static FUNCTION_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)=>|\bfunction\b|^\s*(?:(?:async|static|get|set)\s+)*\*?\s*[A-Za-z_$][\w$]*\s*\([^)]*\)\s*(?::[^{\n]*)?\{",
    )
    .expect("function member pattern is invalid")
});

static GO_FUNC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*var\s+[^=\n]*=\s*func\s*\(").expect("func literal pattern is invalid")
});

/// A declaration name and, for methods, the type that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub owner: Option<String>,
}

/// Find the declared name in a signature.
///
/// Annotation lines are tried last. Each line is matched against the dialect's
/// patterns in order; the first acceptable match wins.
pub fn extract_identifier(dialect: &Dialect, signature: &str) -> Option<Identifier> {
    let (annotations, declarations): (Vec<&str>, Vec<&str>) = signature
        .lines()
        .partition(|line| dialect.is_annotation(line));

    for line in declarations.into_iter().chain(annotations) {
        for pattern in &dialect.function_names {
            for caps in pattern.captures_iter(line) {
                let Some(name) = caps.name("name") else {
                    continue;
                };
                let preceded_by_at = line
                    .get(..name.start())
                    .is_some_and(|before| before.ends_with('@'));
                if preceded_by_at || dialect.keywords.contains(&name.as_str()) {
                    continue;
                }
                return Some(Identifier {
                    name: name.as_str().to_string(),
                    owner: caps.name("owner").map(|m| m.as_str().to_string()),
                });
            }
        }
    }
    None
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_scope_noise(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed == "{"
        || ["//", "#", "/*", "*"]
            .iter()
            .any(|marker| trimmed.starts_with(marker))
}

/// The scope that owns the declaration on `row`, found by walking up to the
/// nearest less-indented line that matches the dialect's owner pattern.
pub fn enclosing_owner(dialect: &Dialect, source: &SourceText<'_>, row: usize) -> Option<String> {
    let pattern = dialect.owner_pattern.as_ref()?;
    let mut indent = indentation(source.line(row)?);

    for candidate_row in (0..row).rev() {
        if indent == 0 {
            return None;
        }
        let candidate = source.line(candidate_row)?;
        if is_scope_noise(candidate.trim()) {
            continue;
        }
        let candidate_indent = indentation(candidate);
        if candidate_indent >= indent {
            continue;
        }
        if let Some(caps) = pattern.captures(candidate) {
            return caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().trim().to_string())
                .find(|owner| !owner.is_empty());
        }
        indent = candidate_indent;
    }
    None
}

/// Whether a JavaScript or TypeScript declaration assigns a function value.
pub fn is_function_value(text: &str) -> bool {
    FUNCTION_VALUE.is_match(text)
}

/// Whether a JavaScript or TypeScript declaration is a `const`, `let` or
/// `var` binding rather than a function declaration.
pub fn is_binding(text: &str) -> bool {
    BINDING.is_match(text)
}

/// Whether the value of a binding spanning several lines defines functions
/// below its first line, such as object methods or arrow properties.
pub fn holds_function_members(text: &str) -> bool {
    text.split_once('\n')
        .is_some_and(|(_, rest)| FUNCTION_MEMBER.is_match(rest))
}

/// Whether a Go `var` declaration binds a function literal.
pub fn is_go_func_literal(text: &str) -> bool {
    GO_FUNC_LITERAL.is_match(text)
}
