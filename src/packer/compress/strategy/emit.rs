// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Building blocks shared by the parse strategies.
//!
//! Every helper turns one capture into an [`Emission`]: the text to keep, the
//! row it starts on, and the identity keys used for deduplication. None of them
//! look at the syntax tree; they work on the source text with the lexer so that
//! delimiters inside literals and comments are never mistaken for structure.

use super::ClassifyContext;
use super::dialect::BodyStyle;
use super::names;
use crate::packer::compress::executor::Capture;
use crate::packer::compress::source::SourceText;
use crate::packer::lexer::{Lexer, TokenKind};

/// A candidate fragment and the keys that identify it within one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub text: String,
    pub row: usize,
    pub keys: Vec<String>,
    /// Rows already rendered in full by this emission.
    pub covers: Option<(usize, usize)>,
}

impl Emission {
    /// An emission identified by its own text.
    pub fn keyed_by_text(text: String, row: usize) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            keys: vec![text.clone()],
            text,
            row,
            covers: None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    Function,
    Method,
    /// Class-like headers never end at `=>`.
    Header,
}

fn start_offset(capture: &Capture<'_>, source: &SourceText<'_>) -> Option<usize> {
    source.offset(capture.start_row, capture.start_column)
}

fn end_offset(capture: &Capture<'_>, source: &SourceText<'_>) -> usize {
    source
        .offset(capture.end_row, capture.end_column)
        .or_else(|| source.line_end_offset(capture.end_row))
        .unwrap_or(source.content().len())
}

fn joined(lines: &[&str]) -> String {
    lines.join("\n")
}

/// Whether nothing but whitespace precedes `column` on `row`.
fn is_standalone(source: &SourceText<'_>, row: usize, column: usize) -> bool {
    source
        .line(row)
        .and_then(|line| line.get(..column))
        .is_some_and(|prefix| prefix.trim().is_empty())
}

/// The whole lines spanned by the capture.
pub fn node_lines(capture: &Capture<'_>, source: &SourceText<'_>) -> Option<Emission> {
    let text = joined(source.lines(capture.start_row, capture.end_row));
    Emission::keyed_by_text(text.trim().to_string(), capture.start_row)
}

/// The first line of the capture only.
pub fn first_line(capture: &Capture<'_>, source: &SourceText<'_>) -> Option<Emission> {
    let text = source.line(capture.start_row)?.trim().to_string();
    Emission::keyed_by_text(text, capture.start_row)
}

fn is_plain_line_comment(line: &str, ctx: &ClassifyContext<'_>) -> bool {
    let trimmed = line.trim_start();
    ctx.lexicon.starts_line_comment(trimmed) && !ctx.lexicon.is_directive(trimmed)
}

/// A comment capture.
///
/// Directives are kept verbatim under a positional key so that two identical
/// directives on different lines both survive. A run of standalone line
/// comments is emitted once, as a single block, by its first line.
pub fn comment(
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    let start = start_offset(capture, source)?;
    let text = source
        .slice(start..end_offset(capture, source))?
        .trim()
        .to_string();
    if text.is_empty() {
        return None;
    }

    if ctx.lexicon.is_directive(&text) {
        return Some(Emission {
            keys: vec![format!(
                "directive:{}:{}",
                capture.start_row, capture.start_column
            )],
            text,
            row: capture.start_row,
            covers: None,
        });
    }

    let standalone = is_standalone(source, capture.start_row, capture.start_column);
    if !standalone || !ctx.lexicon.starts_line_comment(&text) {
        return Emission::keyed_by_text(text, capture.start_row);
    }

    if capture.start_row > 0
        && source
            .line(capture.start_row - 1)
            .is_some_and(|previous| is_plain_line_comment(previous, ctx))
    {
        return None;
    }

    let mut last = capture.start_row;
    while source
        .line(last + 1)
        .is_some_and(|next| is_plain_line_comment(next, ctx))
    {
        last += 1;
    }

    let text = source
        .lines(capture.start_row, last)
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");
    Emission::keyed_by_text(text, capture.start_row)
}

/// How far above a declaration an annotation spanning several lines may start.
const MAX_ANNOTATION_ROWS: usize = 64;

/// Whether `text` is one annotation whose brackets stay open from its first
/// line until its last.
fn is_single_annotation(text: &str, ctx: &ClassifyContext<'_>) -> bool {
    let mut depth = 0usize;
    for token in Lexer::new(text, ctx.lexicon) {
        let TokenKind::Code(c) = token.kind else {
            continue;
        };
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                let Some(inner) = depth.checked_sub(1) else {
                    return false;
                };
                depth = inner;
            }
            '\n' if depth == 0 => return false,
            _ => {}
        }
    }
    depth == 0
}

/// The row an annotation ending on `last` starts on.
fn annotation_start(source: &SourceText<'_>, ctx: &ClassifyContext<'_>, last: usize) -> Option<usize> {
    let mut row = last;
    loop {
        let line = source.line(row)?;
        if line.trim().is_empty() {
            return None;
        }
        if ctx.dialect.is_annotation(line)
            && is_single_annotation(&source.lines(row, last).join("\n"), ctx)
        {
            return Some(row);
        }
        if row == 0 || last - row >= MAX_ANNOTATION_ROWS {
            return None;
        }
        row -= 1;
    }
}

/// Annotation lines directly above `row`, and the row the first one is on.
///
/// An annotation may continue over several lines while its brackets are
/// open. Each annotation is dedented by the indentation of its first line.
fn leading_annotations<'a>(
    source: &SourceText<'a>,
    ctx: &ClassifyContext<'_>,
    row: usize,
) -> (usize, Vec<&'a str>) {
    let mut first = row;
    let mut groups = Vec::new();
    while first > 0
        && let Some(start) = annotation_start(source, ctx, first - 1)
    {
        groups.push((start, first - 1));
        first = start;
    }

    let mut annotations = Vec::new();
    for &(start, last) in groups.iter().rev() {
        let lines = source.lines(start, last);
        let indent = lines
            .first()
            .map_or(0, |line| line.len() - line.trim_start().len());
        annotations.extend(lines.iter().copied().map(|line| dedent(line, indent)));
    }
    (first, annotations)
}

fn dedent(line: &str, indent: usize) -> &str {
    match (line.get(..indent), line.get(indent..)) {
        (Some(prefix), Some(rest)) if prefix.trim().is_empty() => rest.trim_end(),
        _ => line.trim(),
    }
}

fn with_annotations(annotations: Vec<&str>, body: &str) -> String {
    let mut lines = annotations;
    lines.push(body);
    lines.join("\n")
}

/// Offset of the delimiter that closes the first body opened by one of the
/// dialect's block openers, scanning `from..limit`.
fn matching_close(
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
    from: usize,
    limit: usize,
) -> Option<usize> {
    let text = source.slice(from..limit)?;
    let mut stack: Vec<char> = Vec::new();
    let mut opened = false;

    for token in Lexer::new(text, ctx.lexicon) {
        let TokenKind::Code(c) = token.kind else {
            continue;
        };
        match c {
            '(' | '[' | '{' => {
                if stack.is_empty() && ctx.dialect.block_openers.contains(&c) {
                    opened = true;
                }
                stack.push(c);
            }
            ')' | ']' | '}' => {
                stack.pop();
                if opened && stack.is_empty() {
                    return Some(from + token.start);
                }
            }
            _ => {}
        }
    }
    None
}

/// A declaration kept whole, from its first line to the line holding the
/// delimiter that closes its body.
pub fn block(
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    let start = start_offset(capture, source)?;
    let end_row = matching_close(source, ctx, start, end_offset(capture, source))
        .map_or(capture.end_row, |close| source.position(close).0)
        .min(capture.end_row);

    let (first_row, annotations) = leading_annotations(source, ctx, capture.start_row);
    let body = joined(source.lines(capture.start_row, end_row));
    let text = with_annotations(annotations, body.trim());
    Emission::keyed_by_text(text.trim().to_string(), first_row).map(|emission| Emission {
        covers: Some((capture.start_row, end_row)),
        ..emission
    })
}

/// Where a signature stops.
struct Cut {
    end: usize,
}

/// Scan a declaration header from `from` until the opening body delimiter.
///
/// Brackets are balanced and angle brackets are tracked at depth zero for
/// dialects with generics. The returned end excludes the body delimiter and
/// trailing comments; a terminating `;` or an arrow is kept.
fn cut_signature(
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
    from: usize,
    limit: usize,
    allow_arrow: bool,
) -> Cut {
    let dialect = ctx.dialect;
    let Some(text) = source.slice(from..limit) else {
        return Cut { end: limit };
    };

    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut code_end = from;
    let mut last_code: Option<char> = None;
    let mut previous: Option<(char, usize)> = None;
    let mut pending_assign: Option<usize> = None;
    let mut seen_assign = false;
    let mut seen_colon = false;

    for token in Lexer::new(text, ctx.lexicon) {
        let start = from + token.start;
        let end = from + token.end;
        let c = match token.kind {
            TokenKind::Code(c) => c,
            TokenKind::Literal { .. } => {
                code_end = end;
                last_code = Some('"');
                previous = None;
                continue;
            }
            TokenKind::LineComment | TokenKind::BlockComment => continue,
        };

        let adjacent = previous.filter(|(_, at)| *at == start).map(|(p, _)| p);
        previous = Some((c, end));

        if c.is_whitespace() {
            if c == '\n' && depth == 0 && angle == 0 && dialect.body == BodyStyle::LineEnd {
                return Cut { end: code_end };
            }
            continue;
        }

        let arrow = c == '>' && adjacent == Some('=');
        if let Some(at) = pending_assign.take()
            && !(arrow && at == start)
        {
            seen_assign = true;
        }

        let top = depth == 0 && angle == 0;
        match c {
            '{' if top
                && dialect.body == BodyStyle::Brace
                && !matches!(last_code, Some(':' | '|' | '&')) =>
            {
                return Cut { end: code_end };
            }
            ':' if top && dialect.body == BodyStyle::Colon => {
                return Cut { end: code_end };
            }
            ';' if top => return Cut { end },
            '>' if arrow => {
                if allow_arrow
                    && dialect.arrow_bodies
                    && depth == 0
                    && (seen_assign || !seen_colon)
                {
                    return Cut { end };
                }
            }
            '>' if adjacent == Some('-') => {}
            '>' if depth == 0 && angle > 0 => angle -= 1,
            '<' if depth == 0 && dialect.angle_generics => angle += 1,
            '=' if depth == 0 && !matches!(adjacent, Some('=' | '!' | '<' | '>')) => {
                pending_assign = Some(end);
            }
            ':' if top => seen_colon = true,
            '(' => {
                if depth == 0 {
                    angle = 0;
                }
                depth += 1;
            }
            '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }

        code_end = end;
        last_code = Some(c);
    }

    Cut { end: code_end }
}

/// The text of a declaration header, with annotation lines above it.
///
/// Returns the text and the row it starts on.
fn header_text(
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
    allow_arrow: bool,
) -> Option<(String, usize)> {
    let start = start_offset(capture, source)?;
    let line = source.line(capture.start_row)?;
    let prefix = line.get(..capture.start_column)?;
    let emit_from = if prefix
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || c == '_')
    {
        source.offset(capture.start_row, 0)?
    } else {
        start
    };

    let cut = cut_signature(source, ctx, start, end_offset(capture, source), allow_arrow);
    let body = source.slice(emit_from..cut.end.max(emit_from))?.trim();
    if body.is_empty() {
        return None;
    }

    let (first_row, annotations) = leading_annotations(source, ctx, capture.start_row);
    Some((with_annotations(annotations, body), first_row))
}

/// A class, module or namespace header without its body.
pub fn header(
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    let (text, row) = header_text(capture, source, ctx, false)?;
    Emission::keyed_by_text(text, row)
}

/// A function or method signature without its body.
///
/// Keys are the signature text, scoped by the owning type when there is one,
/// and a semantic key naming the function unless the dialect allows
/// overloading.
pub fn signature(
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
    kind: SignatureKind,
) -> Option<Emission> {
    let allow_arrow = kind != SignatureKind::Header;
    let (text, row) = header_text(capture, source, ctx, allow_arrow)?;

    let identifier = names::extract_identifier(ctx.dialect, &text);
    let owner = identifier
        .as_ref()
        .and_then(|id| id.owner.clone())
        .or_else(|| names::enclosing_owner(ctx.dialect, source, capture.start_row));

    let mut keys = vec![match &owner {
        Some(owner) => format!("{owner}::{text}"),
        None => text.clone(),
    }];
    if !ctx.dialect.overloading
        && let Some(id) = &identifier
    {
        keys.push(match (&owner, kind) {
            (Some(owner), _) => format!("method:{owner}.{}", id.name),
            (None, SignatureKind::Method) => format!("method:{}", id.name),
            (None, _) => format!("func:{}", id.name),
        });
    }

    Some(Emission {
        text,
        row,
        keys,
        covers: None,
    })
}

/// A rule's selector list, up to the opening brace.
pub fn selector(capture: &Capture<'_>, source: &SourceText<'_>) -> Option<Emission> {
    let from = start_offset(capture, source)?;
    let text = source.slice(from..end_offset(capture, source))?;
    let text = text.split('{').next().unwrap_or_default().trim().to_string();
    Emission::keyed_by_text(text, capture.start_row)
}

#[cfg(test)]
mod tests {
    use super::super::dialect;
    use super::*;
    use crate::packer::lexer;

    fn capture(start: (usize, usize), end: (usize, usize)) -> Capture<'static> {
        Capture {
            label: "definition.function",
            start_row: start.0,
            start_column: start.1,
            end_row: end.0,
            end_column: end.1,
        }
    }

    fn ctx(dialect: &'static dialect::Dialect, lexicon: &'static lexer::Lexicon) -> ClassifyContext<'static> {
        ClassifyContext {
            language: dialect.name,
            dialect,
            lexicon,
        }
    }

    fn last(source: &SourceText<'_>) -> (usize, usize) {
        let row = source.line_count() - 1;
        (row, source.line(row).unwrap().len())
    }

    #[test]
    fn test_signature_stops_at_body_brace() {
        let src = "func Fetch(url string, opts map[string]int) (string, error) {\n\treturn \"{\", nil\n}";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((0, 0), last(&source)),
            &source,
            &ctx(&dialect::GO, &lexer::GO),
            SignatureKind::Function,
        )
        .unwrap();
        assert_eq!(
            emission.text,
            "func Fetch(url string, opts map[string]int) (string, error)"
        );
        assert!(emission.keys.contains(&"func:Fetch".to_string()));
    }

    #[test]
    fn test_signature_ignores_braces_in_runes_and_strings() {
        let src = "func f(r rune /* { */, s string) bool {\n\treturn r == '{'\n}";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((0, 0), last(&source)),
            &source,
            &ctx(&dialect::GO, &lexer::GO),
            SignatureKind::Function,
        )
        .unwrap();
        assert_eq!(emission.text, "func f(r rune /* { */, s string) bool");
    }

    #[test]
    fn test_python_signature_with_annotations_and_decorators() {
        let src = "@app.route(\"/\")\ndef index(x: Dict[str, int] = {}) -> Optional[str]:\n    return None";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((1, 0), last(&source)),
            &source,
            &ctx(&dialect::PYTHON, &lexer::PYTHON),
            SignatureKind::Function,
        )
        .unwrap();
        assert_eq!(
            emission.text,
            "@app.route(\"/\")\ndef index(x: Dict[str, int] = {}) -> Optional[str]"
        );
        assert_eq!(emission.row, 0);
    }

    #[test]
    fn test_decorator_spanning_lines() {
        let src = "@app.route(\n    \"/\",\n    methods=[\"GET\"],\n)\ndef index():\n    return None";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((4, 0), last(&source)),
            &source,
            &ctx(&dialect::PYTHON, &lexer::PYTHON),
            SignatureKind::Function,
        )
        .unwrap();
        assert_eq!(
            emission.text,
            "@app.route(\n    \"/\",\n    methods=[\"GET\"],\n)\ndef index()"
        );
        assert_eq!(emission.row, 0);
    }

    #[test]
    fn test_code_between_decorator_and_declaration_is_not_an_annotation() {
        let src = "@dec\nx = foo(\n)\ndef f():\n    pass";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((3, 0), last(&source)),
            &source,
            &ctx(&dialect::PYTHON, &lexer::PYTHON),
            SignatureKind::Function,
        )
        .unwrap();
        assert_eq!(emission.text, "def f()");
        assert_eq!(emission.row, 3);
    }

    #[test]
    fn test_typescript_arrow_after_typed_binding() {
        let src = "const run: (n: number) => void = async (n) => {\n  go(n);\n};";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((0, 0), last(&source)),
            &source,
            &ctx(&dialect::TYPESCRIPT, &lexer::JAVASCRIPT),
            SignatureKind::Function,
        )
        .unwrap();
        assert_eq!(
            emission.text,
            "const run: (n: number) => void = async (n) =>"
        );
        assert!(emission.keys.contains(&"func:run".to_string()));
    }

    #[test]
    fn test_rust_generics_and_return_arrow() {
        let src = "pub fn parse<'a, T: From<&'a str>>(s: &'a str) -> Vec<T>\nwhere\n    T: Clone,\n{\n    vec![]\n}";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((0, 0), last(&source)),
            &source,
            &ctx(&dialect::RUST, &lexer::RUST),
            SignatureKind::Function,
        )
        .unwrap();
        assert_eq!(
            emission.text,
            "pub fn parse<'a, T: From<&'a str>>(s: &'a str) -> Vec<T>\nwhere\n    T: Clone,"
        );
    }

    #[test]
    fn test_bodyless_declaration_keeps_semicolon() {
        let src = "    fn len(&self) -> usize;";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((0, 4), last(&source)),
            &source,
            &ctx(&dialect::RUST, &lexer::RUST),
            SignatureKind::Method,
        )
        .unwrap();
        assert_eq!(emission.text, "fn len(&self) -> usize;");
    }

    #[test]
    fn test_ruby_signature_ends_at_line() {
        let src = "  def greet(name,\n            greeting = \"hi\") # says hi\n    puts name\n  end";
        let source = SourceText::new(src);
        let emission = signature(
            &capture((0, 2), last(&source)),
            &source,
            &ctx(&dialect::RUBY, &lexer::RUBY),
            SignatureKind::Method,
        )
        .unwrap();
        assert_eq!(
            emission.text,
            "def greet(name,\n            greeting = \"hi\")"
        );
    }

    #[test]
    fn test_block_keeps_closing_delimiter() {
        let src = "type Config struct {\n\tName string `json:\"}\"`\n}";
        let source = SourceText::new(src);
        let emission = block(
            &capture((0, 0), last(&source)),
            &source,
            &ctx(&dialect::GO, &lexer::GO),
        )
        .unwrap();
        assert_eq!(emission.text, src);
        assert_eq!(emission.covers, Some((0, 2)));
    }

    #[test]
    fn test_block_includes_attributes() {
        let src = "#[derive(Debug)]\n#[serde(rename_all = \"camelCase\")]\npub struct A {\n    b: u8,\n}";
        let source = SourceText::new(src);
        let emission = block(
            &capture((2, 0), last(&source)),
            &source,
            &ctx(&dialect::RUST, &lexer::RUST),
        )
        .unwrap();
        assert_eq!(emission.text, src);
        assert_eq!(emission.row, 0);
    }

    #[test]
    fn test_consecutive_line_comments_merge() {
        let src = "// Package x does things.\n// It is small.\n//go:generate stringer\npackage x";
        let source = SourceText::new(src);
        let context = ctx(&dialect::GO, &lexer::GO);

        let first = comment(&capture((0, 0), (0, 25)), &source, &context).unwrap();
        assert_eq!(first.text, "// Package x does things.\n// It is small.");
        assert!(comment(&capture((1, 0), (1, 15)), &source, &context).is_none());

        let directive = comment(&capture((2, 0), (2, 22)), &source, &context).unwrap();
        assert_eq!(directive.text, "//go:generate stringer");
        assert_eq!(directive.keys, vec!["directive:2:0".to_string()]);
    }

    #[test]
    fn test_trailing_comment_is_text_only() {
        let src = "x := 1 // the answer";
        let source = SourceText::new(src);
        let emission = comment(
            &capture((0, 7), last(&source)),
            &source,
            &ctx(&dialect::GO, &lexer::GO),
        )
        .unwrap();
        assert_eq!(emission.text, "// the answer");
    }

    #[test]
    fn test_owner_scoped_keys() {
        let src = "class A:\n    def run(self):\n        pass\nclass B:\n    def run(self):\n        pass";
        let source = SourceText::new(src);
        let context = ctx(&dialect::PYTHON, &lexer::PYTHON);
        let a = signature(&capture((1, 4), (2, 12)), &source, &context, SignatureKind::Function).unwrap();
        let b = signature(&capture((4, 4), (5, 12)), &source, &context, SignatureKind::Function).unwrap();
        assert_eq!(a.text, b.text);
        assert!(a.keys.contains(&"method:A.run".to_string()));
        assert!(b.keys.contains(&"method:B.run".to_string()));
        assert_ne!(a.keys, b.keys);
    }
}
