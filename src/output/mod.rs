// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Rendering a [`PackedCodebase`] into a single document.

pub mod json;
pub mod markdown;
pub mod plain;
pub mod writer;
pub mod xml;

use crate::packer::PackedCodebase;
use crate::utils::error::StructpackError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use writer::{OutputResult, write_output};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Plain,
    Markdown,
    Xml,
    Json,
}

impl OutputStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStyle::Plain => "plain",
            OutputStyle::Markdown => "markdown",
            OutputStyle::Xml => "xml",
            OutputStyle::Json => "json",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, StructpackError> {
        match name.to_ascii_lowercase().as_str() {
            "plain" | "txt" => Ok(OutputStyle::Plain),
            "markdown" | "md" => Ok(OutputStyle::Markdown),
            "xml" => Ok(OutputStyle::Xml),
            "json" => Ok(OutputStyle::Json),
            _ => Err(StructpackError::invalid_style(name)),
        }
    }
}

pub trait OutputFormatter {
    fn format(&self, packed: &PackedCodebase) -> Result<String, StructpackError>;
}

pub fn get_formatter(style: OutputStyle) -> Box<dyn OutputFormatter> {
    match style {
        OutputStyle::Plain => Box::new(plain::PlainFormatter),
        OutputStyle::Markdown => Box::new(markdown::MarkdownFormatter),
        OutputStyle::Xml => Box::new(xml::XmlFormatter),
        OutputStyle::Json => Box::new(json::JsonFormatter),
    }
}

/// Render `packed` in the given style.
pub fn render(packed: &PackedCodebase, style: OutputStyle) -> Result<String, StructpackError> {
    get_formatter(style).format(packed)
}

/// Forward-slash path as shown in packed output.
pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// One-line description of the pack shared by the text styles.
pub(crate) fn header_line(packed: &PackedCodebase) -> String {
    let meta = &packed.metadata;
    let mut line = format!(
        "This file is a packed representation of {} files.",
        meta.total_files
    );
    if meta.compressed_files > 0 {
        line.push_str(&format!(
            " {} files were reduced to their declarations, comments and imports.",
            meta.compressed_files
        ));
    }
    line
}
