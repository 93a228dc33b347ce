// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use super::emit::{self, Emission};
use super::{Category, ClassifyContext};
use crate::packer::compress::executor::Capture;
use crate::packer::compress::source::SourceText;

/// Stylesheets keep selectors and at-rule headers; declarations are dropped.
pub(super) fn emit(
    category: Category,
    capture: &Capture<'_>,
    source: &SourceText<'_>,
    ctx: &ClassifyContext<'_>,
) -> Option<Emission> {
    match category {
        Category::Comment => emit::comment(capture, source, ctx),
        Category::Selector => emit::selector(capture, source),
        Category::AtRule => emit::header(capture, source, ctx),
        Category::Import => emit::node_lines(capture, source),
        Category::Docstring
        | Category::Package
        | Category::Module
        | Category::Class
        | Category::Interface
        | Category::Struct
        | Category::Enum
        | Category::Type
        | Category::Function
        | Category::Method
        | Category::Variable
        | Category::Constant
        | Category::Property
        | Category::Macro
        | Category::Unknown => None,
    }
}
