// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use super::emit::{self, Emission, SignatureKind};
use super::names;
use super::{Category, ClassifyContext};
use crate::packer::compress::executor::Capture;
use crate::packer::compress::source::SourceText;

/// Go declarations.
///
/// Grouped declarations (`import (...)`, `var (...)`, `type (...)`) are kept
/// whole; methods are keyed by their receiver type. A `var` bound to a
/// function literal is rendered as a signature.
pub(super) fn emit(
    category: Category,
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    match category {
        Category::Comment => emit::comment(capture, source, ctx),
        Category::Package => emit::first_line(capture, source),
        Category::Variable
            if names::is_go_func_literal(source.line(capture.start_row).unwrap_or_default()) =>
        {
            emit::signature(capture, source, ctx, SignatureKind::Function)
        }
        Category::Import
        | Category::Variable
        | Category::Constant
        | Category::Type
        | Category::Struct
        | Category::Interface => emit::block(capture, source, ctx),
        Category::Function => emit::signature(capture, source, ctx, SignatureKind::Function),
        Category::Method => emit::signature(capture, source, ctx, SignatureKind::Method),
        Category::Docstring
        | Category::Module
        | Category::Class
        | Category::Enum
        | Category::Property
        | Category::Macro
        | Category::Selector
        | Category::AtRule
        | Category::Unknown => None,
    }
}
