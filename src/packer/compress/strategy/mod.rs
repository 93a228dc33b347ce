// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Capture classification.
//!
//! A [`ParseStrategy`] decides, for one capture, whether it produces a
//! [`Fragment`] and what that fragment's text is. Strategies are a closed set
//! selected per language by the registry; they share the helpers in
//! [`emit`] and differ only in how each category is rendered.

mod css;
mod default;
pub mod dialect;
pub mod emit;
mod go;
pub mod names;
mod python;
mod typescript;

use super::error::CompressionError;
use super::executor::Capture;
use super::source::SourceText;
use crate::packer::lexer::Lexicon;
use dialect::Dialect;
pub use emit::Emission;
use std::collections::HashSet;

/// What a capture label names, independent of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Comment,
    Docstring,
    Import,
    Package,
    Module,
    Class,
    Interface,
    Struct,
    Enum,
    Type,
    Function,
    Method,
    Variable,
    Constant,
    Property,
    Macro,
    Selector,
    AtRule,
    Unknown,
}

impl Category {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "docstring" => Self::Docstring,
            "definition.import" => Self::Import,
            "definition.package" => Self::Package,
            "definition.module" => Self::Module,
            "definition.class" => Self::Class,
            "definition.interface" => Self::Interface,
            "definition.struct" => Self::Struct,
            "definition.enum" => Self::Enum,
            "definition.type" => Self::Type,
            "definition.function" => Self::Function,
            "definition.method" => Self::Method,
            "definition.variable" => Self::Variable,
            "definition.constant" => Self::Constant,
            "definition.property" => Self::Property,
            "definition.macro" => Self::Macro,
            "definition.selector" => Self::Selector,
            "definition.at_rule" => Self::AtRule,
            tag if tag == "comment" || tag.starts_with("comment.") => Self::Comment,
            _ => Self::Unknown,
        }
    }
}

/// A parsed capture label. `name.definition.function` is the name inside a
/// `definition.function` capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureKind {
    pub category: Category,
    pub is_name: bool,
}

impl CaptureKind {
    pub fn parse(label: &str) -> Self {
        match label.strip_prefix("name.") {
            Some(rest) => Self {
                category: Category::from_tag(rest),
                is_name: true,
            },
            None => Self {
                category: Category::from_tag(label),
                is_name: false,
            },
        }
    }
}

/// One line range of compressed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub row: usize,
}

/// Identity keys already emitted for the current file, and the row ranges
/// already rendered in full by block emissions.
#[derive(Debug, Default)]
pub struct DedupSet {
    keys: HashSet<String>,
    covered: Vec<(usize, usize)>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether `row` lies inside a block that was already emitted whole.
    pub fn is_covered(&self, row: usize) -> bool {
        self.covered
            .iter()
            .any(|&(first, last)| (first..=last).contains(&row))
    }

    /// Accept an emission unless one of its keys was already emitted; on
    /// acceptance every key is recorded.
    pub fn claim(&mut self, emission: Emission) -> Option<Fragment> {
        if emission.keys.iter().any(|key| self.keys.contains(key)) {
            return None;
        }
        self.keys.extend(emission.keys);
        self.covered.extend(emission.covers);
        Some(Fragment {
            text: emission.text,
            row: emission.row,
        })
    }
}

/// Language facts a strategy needs besides the capture itself.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub language: &'a str,
    pub dialect: &'a Dialect,
    pub lexicon: &'a Lexicon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Default,
    TypeScript,
    Python,
    Go,
    Css,
}

impl ParseStrategy {
    /// Classify one capture.
    ///
    /// Name captures, unknown labels, rows outside the file or inside a block
    /// emitted whole, and already emitted keys all yield `Ok(None)`. A capture
    /// that ends before it starts is an error.
    pub fn classify(
        self,
        capture: &Capture<'_>,
        source: &SourceText<'_>,
        dedup: &mut DedupSet,
        ctx: &ClassifyContext<'_>,
    ) -> Result<Option<Fragment>, CompressionError> {
        if (capture.end_row, capture.end_column) < (capture.start_row, capture.start_column) {
            return Err(CompressionError::StrategyClassification {
                label: capture.label.to_string(),
                row: capture.start_row + 1,
                message: format!(
                    "capture ends at {}:{} before it starts at {}:{}",
                    capture.end_row + 1,
                    capture.end_column,
                    capture.start_row + 1,
                    capture.start_column
                ),
            });
        }
        if capture.start_row >= source.line_count() {
            return Ok(None);
        }

        let kind = CaptureKind::parse(capture.label);
        if kind.is_name
            || kind.category == Category::Unknown
            || dedup.is_covered(capture.start_row)
        {
            return Ok(None);
        }

        let emission = match self {
            Self::Default => default::emit(kind.category, capture, source, ctx),
            Self::TypeScript => typescript::emit(kind.category, capture, source, ctx),
            Self::Python => python::emit(kind.category, capture, source, ctx),
            Self::Go => go::emit(kind.category, capture, source, ctx),
            Self::Css => css::emit(kind.category, capture, source, ctx),
        };

        Ok(emission.and_then(|emission| dedup.claim(emission)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::lexer;

    fn ctx() -> ClassifyContext<'static> {
        ClassifyContext {
            language: "go",
            dialect: &dialect::GO,
            lexicon: &lexer::GO,
        }
    }

    #[test]
    fn test_capture_kind_parsing() {
        assert_eq!(
            CaptureKind::parse("name.definition.function"),
            CaptureKind {
                category: Category::Function,
                is_name: true
            }
        );
        assert_eq!(CaptureKind::parse("comment").category, Category::Comment);
        assert_eq!(CaptureKind::parse("definition.at_rule").category, Category::AtRule);
        assert_eq!(CaptureKind::parse("reference.call").category, Category::Unknown);
    }

    #[test]
    fn test_dedup_claims_all_keys() {
        let mut dedup = DedupSet::new();
        let first = Emission {
            text: "func main()".into(),
            row: 0,
            keys: vec!["func main()".into(), "func:main".into()],
            covers: None,
        };
        assert!(dedup.claim(first.clone()).is_some());
        assert!(dedup.contains("func:main"));

        let renamed_text = Emission {
            text: "func  main()".into(),
            row: 4,
            keys: vec!["func  main()".into(), "func:main".into()],
            covers: None,
        };
        assert!(dedup.claim(renamed_text).is_none());
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_rows_inside_emitted_block_are_covered() {
        let mut dedup = DedupSet::new();
        let block = Emission {
            text: "type T struct {\n\t// field\n\tA int\n}".into(),
            row: 2,
            keys: vec!["type T".into()],
            covers: Some((2, 5)),
        };
        assert!(dedup.claim(block).is_some());
        assert!(dedup.is_covered(3));
        assert!(!dedup.is_covered(6));

        let source = SourceText::new("package p\n\ntype T struct {\n\t// field\n\tA int\n}\n");
        let comment = Capture {
            label: "comment",
            start_row: 3,
            start_column: 1,
            end_row: 3,
            end_column: 9,
        };
        assert_eq!(
            ParseStrategy::Go.classify(&comment, &source, &mut dedup, &ctx()),
            Ok(None)
        );
    }

    #[test]
    fn test_inverted_capture_is_an_error() {
        let source = SourceText::new("package main\nfunc main() {}\n");
        let capture = Capture {
            label: "definition.function",
            start_row: 1,
            start_column: 5,
            end_row: 0,
            end_column: 0,
        };
        let err = ParseStrategy::Go
            .classify(&capture, &source, &mut DedupSet::new(), &ctx())
            .unwrap_err();
        assert!(matches!(err, CompressionError::StrategyClassification { .. }));
    }

    #[test]
    fn test_out_of_range_and_name_captures_are_skipped() {
        let source = SourceText::new("package main");
        let mut dedup = DedupSet::new();
        let beyond = Capture {
            label: "definition.function",
            start_row: 9,
            start_column: 0,
            end_row: 9,
            end_column: 1,
        };
        assert_eq!(
            ParseStrategy::Default.classify(&beyond, &source, &mut dedup, &ctx()),
            Ok(None)
        );

        let name = Capture {
            label: "name.definition.package",
            start_row: 0,
            start_column: 8,
            end_row: 0,
            end_column: 12,
        };
        assert_eq!(
            ParseStrategy::Go.classify(&name, &source, &mut dedup, &ctx()),
            Ok(None)
        );
        assert!(dedup.is_empty());
    }
}
