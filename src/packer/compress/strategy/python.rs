// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use super::emit::{self, Emission, SignatureKind};
use super::{Category, ClassifyContext};
use crate::packer::compress::executor::Capture;
use crate::packer::compress::source::SourceText;

/// A bare string statement is a docstring unless it is an f-string or shares
/// its line with earlier code.
fn is_docstring(capture: &Capture<'_>, source: &SourceText<'_>) -> bool {
    let Some(line) = source.line(capture.start_row) else {
        return false;
    };
    let (Some(before), Some(literal)) = (
        line.get(..capture.start_column),
        line.get(capture.start_column..),
    ) else {
        return false;
    };
    let prefix: String = literal
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    before.trim().is_empty() && !prefix.contains(['f', 'F'])
}

pub(super) fn emit(
    category: Category,
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    match category {
        Category::Comment => emit::comment(capture, source, ctx),
        Category::Docstring if is_docstring(capture, source) => {
            emit::node_lines(capture, source)
        }
        Category::Import | Category::Variable | Category::Constant => {
            emit::node_lines(capture, source)
        }
        Category::Function => emit::signature(capture, source, ctx, SignatureKind::Function),
        Category::Method => emit::signature(capture, source, ctx, SignatureKind::Method),
        Category::Class => emit::header(capture, source, ctx),
        Category::Docstring
        | Category::Package
        | Category::Module
        | Category::Interface
        | Category::Struct
        | Category::Enum
        | Category::Type
        | Category::Property
        | Category::Macro
        | Category::Selector
        | Category::AtRule
        | Category::Unknown => None,
    }
}
