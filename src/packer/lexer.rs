// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Literal- and comment-aware lexing shared by the compression strategies and
//! the comment-removal transform.
//!
//! The lexer does not understand any grammar. It only splits text into code
//! characters, comments, and string/char literals so that callers can look
//! for delimiters (`{`, `:`, `=>`, `;`) without being fooled by a `//` inside
//! a URL string, a `'{'` rune, or a lifetime that looks like a char literal.

use std::path::Path;

/// A line-comment marker, optionally suppressed when followed by a character
/// (PHP `#[Attribute]` is not a comment).
#[derive(Debug, Clone, Copy)]
pub struct LineComment {
    pub marker: &'static str,
    pub unless_next: Option<char>,
}

impl LineComment {
    const fn new(marker: &'static str) -> Self {
        Self {
            marker,
            unless_next: None,
        }
    }
}

/// How a single quote is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleQuote {
    /// `'` opens a string or char literal (`'a'`, `'\n'`, `'text'`).
    Delimiter,
    /// `'` opens a char literal only when it looks like one; otherwise it is a
    /// lifetime or label (`'a`, `'static`).
    CharOrLifetime,
    /// `'` is an ordinary character.
    Plain,
}

/// How a backtick is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backtick {
    Plain,
    /// Multi-line literal without escapes (Go raw strings).
    Raw,
    /// Multi-line literal with escapes (JavaScript template strings).
    Template,
}

/// Lexical conventions of one language family.
#[derive(Debug)]
pub struct Lexicon {
    pub name: &'static str,
    pub line_comments: &'static [LineComment],
    pub block_comment: Option<(&'static str, &'static str)>,
    pub double_quote: bool,
    pub single_quote: SingleQuote,
    pub backtick: Backtick,
    pub triple_quotes: bool,
    /// Comment prefixes that carry meaning for a compiler, build tool, or
    /// linter. Matched against the comment text with leading whitespace removed.
    pub directives: &'static [&'static str],
}

const SLASH_SLASH: &[LineComment] = &[LineComment::new("//")];
const HASH: &[LineComment] = &[LineComment::new("#")];
const C_BLOCK: Option<(&str, &str)> = Some(("/*", "*/"));

pub static C_LIKE: Lexicon = Lexicon {
    name: "c-like",
    line_comments: SLASH_SLASH,
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &[
        "// NOLINT",
        "//NOLINT",
        "// clang-format",
        "/* clang-format",
        "// ReSharper",
        "// @formatter:",
        "//CHECKSTYLE",
        "// CHECKSTYLE",
    ],
};

pub static JAVASCRIPT: Lexicon = Lexicon {
    name: "javascript",
    line_comments: SLASH_SLASH,
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Template,
    triple_quotes: false,
    directives: &[
        "/// <reference",
        "/// <amd-",
        "// @ts-",
        "/* @ts-",
        "// eslint-",
        "/* eslint",
        "// prettier-ignore",
        "// biome-ignore",
        "/* istanbul ignore",
        "/* c8 ignore",
        "// @jsx",
        "/** @jsx",
        "/* webpackChunkName",
        "// #region",
        "// #endregion",
    ],
};

pub static GO: Lexicon = Lexicon {
    name: "go",
    line_comments: SLASH_SLASH,
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Raw,
    triple_quotes: false,
    directives: &[
        "//go:",
        "// +build",
        "//+build",
        "//nolint",
        "// nolint",
        "//lint:",
        "//export ",
        "//extern ",
        "//line ",
        "/*line ",
        "//sys ",
        "//sysnb ",
    ],
};

pub static RUST: Lexicon = Lexicon {
    name: "rust",
    line_comments: SLASH_SLASH,
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::CharOrLifetime,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &["// rustfmt::skip"],
};

pub static PYTHON: Lexicon = Lexicon {
    name: "python",
    line_comments: HASH,
    block_comment: None,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: true,
    directives: &[
        "#!",
        "# -*-",
        "# vim:",
        "# type:",
        "# noqa",
        "# pylint:",
        "# mypy:",
        "# pyright:",
        "# fmt:",
        "# isort:",
        "# pragma:",
    ],
};

pub static RUBY: Lexicon = Lexicon {
    name: "ruby",
    line_comments: HASH,
    block_comment: Some(("=begin", "=end")),
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &[
        "#!",
        "# frozen_string_literal:",
        "# encoding:",
        "# -*-",
        "# rubocop:",
        "# typed:",
    ],
};

pub static PHP: Lexicon = Lexicon {
    name: "php",
    line_comments: &[
        LineComment::new("//"),
        LineComment {
            marker: "#",
            unless_next: Some('['),
        },
    ],
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &["// phpcs:", "// @phpstan-", "/** @phpstan-", "// @codingStandardsIgnore"],
};

pub static CSS: Lexicon = Lexicon {
    name: "css",
    line_comments: &[],
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &["/* stylelint-", "/*! "],
};

pub static SCSS: Lexicon = Lexicon {
    name: "scss",
    line_comments: SLASH_SLASH,
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &["/* stylelint-", "// stylelint-", "/*! "],
};

pub static SHELL: Lexicon = Lexicon {
    name: "shell",
    line_comments: HASH,
    block_comment: None,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &["#!", "# shellcheck"],
};

pub static MARKUP: Lexicon = Lexicon {
    name: "markup",
    line_comments: &[],
    block_comment: Some(("<!--", "-->")),
    double_quote: false,
    single_quote: SingleQuote::Plain,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &["<!--[if", "<!-- prettier-ignore"],
};

pub static SQL: Lexicon = Lexicon {
    name: "sql",
    line_comments: &[LineComment::new("--")],
    block_comment: C_BLOCK,
    double_quote: true,
    single_quote: SingleQuote::Delimiter,
    backtick: Backtick::Plain,
    triple_quotes: false,
    directives: &["-- +migrate", "-- +goose", "-- name:"],
};

impl Lexicon {
    /// Lexicon used for comment removal, chosen by file extension.
    pub fn for_path(path: &Path) -> Option<&'static Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let lexicon = match ext.as_str() {
            "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" | "java" | "cs" | "kt"
            | "kts" | "swift" | "dart" | "scala" | "sol" | "proto" => &C_LIKE,
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts" => &JAVASCRIPT,
            "go" => &GO,
            "rs" => &RUST,
            "py" | "pyw" | "pyi" => &PYTHON,
            "rb" => &RUBY,
            "php" => &PHP,
            "css" => &CSS,
            "scss" | "sass" | "less" => &SCSS,
            "sh" | "bash" | "zsh" | "yml" | "yaml" | "toml" | "r" | "pl" => &SHELL,
            "html" | "htm" | "xml" | "svg" | "vue" | "svelte" => &MARKUP,
            "sql" => &SQL,
            _ => return None,
        };
        Some(lexicon)
    }

    /// Whether a comment is a directive that must be kept verbatim.
    pub fn is_directive(&self, comment: &str) -> bool {
        let text = comment.trim_start();
        self.directives.iter().any(|prefix| text.starts_with(prefix))
    }

    /// Whether `text` starts with one of the line-comment markers.
    pub fn starts_line_comment(&self, text: &str) -> bool {
        self.line_comments.iter().any(|lc| {
            text.strip_prefix(lc.marker).is_some_and(|after| {
                lc.unless_next
                    .is_none_or(|next| !after.starts_with(next))
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Code(char),
    LineComment,
    BlockComment,
    Literal { triple: bool },
}

/// One lexical unit. `start..end` is a byte range into the lexed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Iterator over the tokens of `src`.
///
/// Comments and literals are returned whole; everything else is returned one
/// character at a time. Unterminated constructs end at end of input, and a
/// non-multiline literal ends at the end of its line.
pub struct Lexer<'a> {
    src: &'a str,
    lexicon: &'a Lexicon,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, lexicon: &'a Lexicon) -> Self {
        Self {
            src,
            lexicon,
            pos: 0,
        }
    }

    fn quote_at(&self, rest: &str, ch: char) -> Option<Quote> {
        match ch {
            '"' if self.lexicon.double_quote => Some(Quote::simple('"')),
            '\'' => match self.lexicon.single_quote {
                SingleQuote::Delimiter => Some(Quote::simple('\'')),
                SingleQuote::CharOrLifetime if looks_like_char_literal(rest) => {
                    Some(Quote::simple('\''))
                }
                SingleQuote::CharOrLifetime | SingleQuote::Plain => None,
            },
            '`' => match self.lexicon.backtick {
                Backtick::Plain => None,
                Backtick::Raw => Some(Quote {
                    delim: '`',
                    multiline: true,
                    escapes: false,
                }),
                Backtick::Template => Some(Quote {
                    delim: '`',
                    multiline: true,
                    escapes: true,
                }),
            },
            _ => None,
        }
    }

    fn end_of_line(&self, from: usize) -> usize {
        self.src
            .get(from..)
            .and_then(|rest| rest.find('\n'))
            .map_or(self.src.len(), |i| from + i)
    }

    fn scan_literal(&self, body_start: usize, quote: Quote) -> usize {
        let Some(body) = self.src.get(body_start..) else {
            return self.src.len();
        };
        let mut chars = body.char_indices();
        while let Some((i, c)) = chars.next() {
            if quote.escapes && c == '\\' {
                chars.next();
            } else if c == quote.delim {
                return body_start + i + c.len_utf8();
            } else if c == '\n' && !quote.multiline {
                return body_start + i;
            }
        }
        self.src.len()
    }

    fn scan_triple(&self, body_start: usize, delim: &str) -> usize {
        let Some(body) = self.src.get(body_start..) else {
            return self.src.len();
        };
        let mut chars = body.char_indices();
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                chars.next();
            } else if body.get(i..).is_some_and(|r| r.starts_with(delim)) {
                return body_start + i + delim.len();
            }
        }
        self.src.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct Quote {
    delim: char,
    multiline: bool,
    escapes: bool,
}

impl Quote {
    const fn simple(delim: char) -> Self {
        Self {
            delim,
            multiline: false,
            escapes: true,
        }
    }
}

/// `'x'`, `'\n'`, `'\u{1F600}'` are char literals; `'a` and `'static` are not.
fn looks_like_char_literal(rest: &str) -> bool {
    let mut chars = rest.chars().skip(1);
    match (chars.next(), chars.next()) {
        (Some('\\'), _) => true,
        (Some(c), Some('\'')) => c != '\'',
        _ => false,
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let start = self.pos;
        let rest = self.src.get(start..)?;
        let ch = rest.chars().next()?;

        let (kind, end) = if self.lexicon.starts_line_comment(rest) {
            (TokenKind::LineComment, self.end_of_line(start))
        } else if let Some((open, close)) = self
            .lexicon
            .block_comment
            .filter(|(open, _)| rest.starts_with(open))
        {
            let body_start = start + open.len();
            let end = self
                .src
                .get(body_start..)
                .and_then(|body| body.find(close))
                .map_or(self.src.len(), |i| body_start + i + close.len());
            (TokenKind::BlockComment, end)
        } else if self.lexicon.triple_quotes
            && (rest.starts_with("\"\"\"") || rest.starts_with("'''"))
        {
            let delim = if rest.starts_with('"') { "\"\"\"" } else { "'''" };
            (
                TokenKind::Literal { triple: true },
                self.scan_triple(start + 3, delim),
            )
        } else if let Some(quote) = self.quote_at(rest, ch) {
            (
                TokenKind::Literal { triple: false },
                self.scan_literal(start + ch.len_utf8(), quote),
            )
        } else {
            (TokenKind::Code(ch), start + ch.len_utf8())
        };

        // Always make progress, even on an empty match at end of input.
        self.pos = end.max(start + ch.len_utf8());
        Some(Token {
            kind,
            start,
            end: self.pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str, lexicon: &Lexicon) -> Vec<(TokenKind, String)> {
        Lexer::new(src, lexicon)
            .filter(|t| !matches!(t.kind, TokenKind::Code(c) if c.is_whitespace()))
            .map(|t| (t.kind, src[t.start..t.end].to_string()))
            .collect()
    }

    #[test]
    fn test_url_in_string_is_not_a_comment() {
        let tokens = kinds(r#"u := "http://example.com" // real"#, &GO);
        assert!(tokens.contains(&(
            TokenKind::Literal { triple: false },
            "\"http://example.com\"".to_string()
        )));
        assert_eq!(
            tokens.last(),
            Some(&(TokenKind::LineComment, "// real".to_string()))
        );
    }

    #[test]
    fn test_go_rune_and_raw_string() {
        let src = "r := '{'\ns := `a\n// not a comment\n}`";
        let comments = Lexer::new(src, &GO)
            .filter(|t| t.kind == TokenKind::LineComment)
            .count();
        assert_eq!(comments, 0, "raw string content must not lex as a comment");
        let braces = Lexer::new(src, &GO)
            .filter(|t| matches!(t.kind, TokenKind::Code('{') | TokenKind::Code('}')))
            .count();
        assert_eq!(braces, 0, "braces inside literals are not code");
    }

    #[test]
    fn test_rust_lifetime_is_code() {
        let src = "fn f<'a>(x: &'a str) -> char { '{' }";
        let open_braces: Vec<usize> = Lexer::new(src, &RUST)
            .filter(|t| t.kind == TokenKind::Code('{'))
            .map(|t| t.start)
            .collect();
        assert_eq!(open_braces, vec![src.find("{ ").unwrap()]);
    }

    #[test]
    fn test_python_triple_quotes_span_lines() {
        let src = "x = f\"\"\"\n# not a comment\n\"\"\"\n# comment";
        let tokens = kinds(src, &PYTHON);
        assert_eq!(
            tokens
                .iter()
                .filter(|(k, _)| *k == TokenKind::LineComment)
                .count(),
            1
        );
        assert!(
            tokens
                .iter()
                .any(|(k, text)| *k == TokenKind::Literal { triple: true }
                    && text.contains("# not a comment"))
        );
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let src = "a = \"open\nb = 1 // tail";
        let tokens = kinds(src, &C_LIKE);
        assert_eq!(
            tokens.last(),
            Some(&(TokenKind::LineComment, "// tail".to_string()))
        );
    }

    #[test]
    fn test_php_attribute_is_not_a_comment() {
        let src = "#[Route('/x')]\n# real comment";
        let comments: Vec<String> = Lexer::new(src, &PHP)
            .filter(|t| t.kind == TokenKind::LineComment)
            .map(|t| src[t.start..t.end].to_string())
            .collect();
        assert_eq!(comments, vec!["# real comment".to_string()]);
    }

    #[test]
    fn test_directive_detection() {
        assert!(GO.is_directive("//go:build linux"));
        assert!(GO.is_directive("   // +build ignore"));
        assert!(!GO.is_directive("// go build is not a directive"));
        assert!(PYTHON.is_directive("# type: ignore"));
        assert!(JAVASCRIPT.is_directive("// @ts-expect-error"));
    }

    #[test]
    fn test_for_path() {
        assert_eq!(Lexicon::for_path(Path::new("a/b.go")).map(|l| l.name), Some("go"));
        assert_eq!(
            Lexicon::for_path(Path::new("x.TSX")).map(|l| l.name),
            Some("javascript")
        );
        assert!(Lexicon::for_path(Path::new("README")).is_none());
    }
}
