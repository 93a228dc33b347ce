// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use super::emit::{self, Emission, SignatureKind};
use super::names;
use super::{Category, ClassifyContext};
use crate::packer::compress::executor::Capture;
use crate::packer::compress::source::SourceText;

fn capture_text(capture: &Capture<'_>, source: &SourceText<'_>) -> String {
    source.lines(capture.start_row, capture.end_row).join("\n")
}

/// A binding kept whole. Rows below the first are covered so comments and
/// members inside the value are not emitted again.
fn whole_binding(capture: &Capture<'_>, source: &SourceText<'_>) -> Option<Emission> {
    let covers =
        (capture.end_row > capture.start_row).then_some((capture.start_row + 1, capture.end_row));
    emit::node_lines(capture, source).map(|emission| Emission { covers, ..emission })
}

/// TypeScript, TSX and JavaScript.
///
/// Variables and class fields holding a function value are rendered as
/// signatures. A binding whose value defines functions, such as an object
/// with methods, is cut at the value's opening brace and its members follow
/// as signatures; any other binding is kept whole.
pub(super) fn emit(
    category: Category,
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    match category {
        Category::Comment => emit::comment(capture, source, ctx),
        Category::Import | Category::Package => emit::node_lines(capture, source),
        Category::Function => {
            let text = capture_text(capture, source);
            if names::is_binding(&text) && !names::is_function_value(&text) {
                return None;
            }
            emit::signature(capture, source, ctx, SignatureKind::Function)
        }
        Category::Method => emit::signature(capture, source, ctx, SignatureKind::Method),
        Category::Class | Category::Module => emit::header(capture, source, ctx),
        Category::Interface | Category::Type | Category::Enum | Category::Struct => {
            emit::block(capture, source, ctx)
        }
        Category::Variable | Category::Constant | Category::Property => {
            let text = capture_text(capture, source);
            if names::is_function_value(&text) {
                let kind = if category == Category::Property {
                    SignatureKind::Method
                } else {
                    SignatureKind::Function
                };
                emit::signature(capture, source, ctx, kind)
            } else if names::holds_function_members(&text) {
                emit::header(capture, source, ctx)
            } else {
                whole_binding(capture, source)
            }
        }
        Category::Docstring
        | Category::Macro
        | Category::Selector
        | Category::AtRule
        | Category::Unknown => None,
    }
}
