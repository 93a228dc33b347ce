// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use super::emit::{self, Emission, SignatureKind};
use super::{Category, ClassifyContext};
use crate::packer::compress::executor::Capture;
use crate::packer::compress::source::SourceText;

/// Rendering shared by the brace and `end` languages without special cases.
pub(super) fn emit(
    category: Category,
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    match category {
        Category::Comment | Category::Docstring => emit::comment(capture, source, ctx),
        Category::Import | Category::Package | Category::Constant | Category::Variable => {
            emit::node_lines(capture, source)
        }
        Category::Property if capture.start_row == capture.end_row => {
            emit::first_line(capture, source)
        }
        Category::Property | Category::Function => {
            emit::signature(capture, source, ctx, SignatureKind::Function)
        }
        Category::Method => emit::signature(capture, source, ctx, SignatureKind::Method),
        Category::Class | Category::Module | Category::Macro => {
            emit::header(capture, source, ctx)
        }
        Category::Struct | Category::Interface | Category::Enum | Category::Type => {
            emit::block(capture, source, ctx)
        }
        Category::Selector | Category::AtRule | Category::Unknown => None,
    }
}
