// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! The per-file pipeline.
//!
//! Stages run in a fixed order, each one only when enabled:
//! remove comments, remove empty lines, compress, add line numbers.
//! When compression leaves a file alone (no grammar, or a failure) the output
//! of the previous stage flows on unchanged.

use super::CompressionMethod;
use super::compress::{CompressOutcome, Compressor};
use super::manipulate;
use serde::Serialize;
use std::path::PathBuf;

/// A file as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// Path relative to the packed root
    pub path: PathBuf,
    pub content: String,
}

impl RawFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A file after the pipeline ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub content: String,
    /// Size of the content as read, in bytes
    pub original_size: usize,
    pub compression: CompressionMethod,
    /// Registered language name, if any
    pub language: Option<&'static str>,
}

impl ProcessedFile {
    /// The file with its content untouched.
    pub fn passthrough(file: &RawFile, language: Option<&'static str>) -> Self {
        Self {
            path: file.path.clone(),
            content: file.content.clone(),
            original_size: file.content.len(),
            compression: CompressionMethod::None,
            language,
        }
    }
}

/// Which stages run for every file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    pub remove_comments: bool,
    pub remove_empty_lines: bool,
    pub compress: bool,
    pub show_line_numbers: bool,
}

/// Run the enabled stages over one file.
pub fn process_file(
    file: &RawFile,
    options: &ProcessOptions,
    compressor: &Compressor<'_>,
) -> ProcessedFile {
    let language = compressor
        .registry()
        .resolve_path(&file.path)
        .map(|spec| spec.name);

    let mut content = file.content.clone();

    if options.remove_comments {
        content = manipulate::remove_comments(&content, &file.path);
    }
    if options.remove_empty_lines {
        content = manipulate::remove_empty_lines(&content);
    }

    let mut compression = CompressionMethod::None;
    if options.compress {
        let outcome = compressor.compress(&content, &file.path);
        compression = match &outcome {
            CompressOutcome::Compressed(_) => CompressionMethod::TreeSitter,
            CompressOutcome::Unsupported => CompressionMethod::Unsupported,
            CompressOutcome::Fallback(_) => CompressionMethod::Fallback,
        };
        content = outcome.into_content(&content);
    }

    if options.show_line_numbers {
        content = manipulate::add_line_numbers(&content);
    }

    ProcessedFile {
        path: file.path.clone(),
        content,
        original_size: file.content.len(),
        compression,
        language,
    }
}
