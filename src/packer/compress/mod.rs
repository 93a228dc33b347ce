// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Structural compression.
//!
//! A source file is parsed with the tree-sitter grammar registered for its
//! extension, a declarative query labels the interesting regions, and the
//! language's [`ParseStrategy`] turns each label into a fragment of text.
//! The result keeps declarations, signatures, comments and imports and drops
//! implementation bodies.
//!
//! Compression never fails a run: unsupported files are returned unchanged and
//! any error while compressing a supported file falls back to the original
//! content with a warning.

pub mod error;
pub mod executor;
pub mod registry;
pub mod source;
pub mod strategy;

pub use error::CompressionError;
pub use registry::{GrammarRegistry, LanguageSpec};
pub use strategy::{DedupSet, Fragment, ParseStrategy};

use source::SourceText;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressOutcome {
    /// The file was compressed. The text may be empty when the file has no
    /// declarations.
    Compressed(String),
    /// No grammar is registered for the file's extension.
    Unsupported,
    /// Compression was attempted and failed; the original content applies.
    Fallback(CompressionError),
}

impl CompressOutcome {
    /// The content to use downstream: the compressed text, or `original` when
    /// the file was not compressed.
    pub fn into_content(self, original: &str) -> String {
        match self {
            Self::Compressed(text) => text,
            Self::Unsupported | Self::Fallback(_) => original.to_string(),
        }
    }
}

/// Compresses files using a [`GrammarRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Compressor<'r> {
    registry: &'r GrammarRegistry,
}

impl Default for Compressor<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'r> Compressor<'r> {
    pub const fn new(registry: &'r GrammarRegistry) -> Self {
        Self { registry }
    }

    /// A compressor over the built-in languages.
    pub fn global() -> Compressor<'static> {
        Compressor::new(GrammarRegistry::global())
    }

    pub const fn registry(&self) -> &'r GrammarRegistry {
        self.registry
    }

    pub fn supports(&self, path: &Path) -> bool {
        self.registry.resolve_path(path).is_some()
    }

    /// Compress `content`, returning every failure to the caller.
    pub fn try_compress(&self, content: &str, path: &Path) -> Result<String, CompressionError> {
        let spec = self.registry.resolve_path(path).ok_or_else(|| {
            CompressionError::UnsupportedLanguage {
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }
        })?;

        let grammar = spec.compiled()?;
        let tree = executor::parse(content, &grammar.language, spec.name)?;
        let source = SourceText::new(content);
        let captures = executor::run_query(&tree, &grammar.query, &source);

        let ctx = spec.context();
        let mut dedup = DedupSet::new();
        let mut fragments = Vec::new();
        for capture in &captures {
            if let Some(fragment) = spec.strategy.classify(capture, &source, &mut dedup, &ctx)? {
                fragments.push(fragment);
            }
        }

        tracing::trace!(
            path = %path.display(),
            captures = captures.len(),
            fragments = fragments.len(),
            "Compressed file"
        );

        Ok(fragments
            .iter()
            .map(|fragment| fragment.text.trim())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Compress `content`, isolating every failure to this file.
    pub fn compress(&self, content: &str, path: &Path) -> CompressOutcome {
        if !self.supports(path) {
            tracing::debug!(path = %path.display(), "No grammar registered, leaving file as is");
            return CompressOutcome::Unsupported;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.try_compress(content, path)))
            .unwrap_or_else(|payload| Err(CompressionError::Internal(panic_message(&*payload))));

        match result {
            Ok(text) => CompressOutcome::Compressed(text),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Compression failed, keeping original content");
                CompressOutcome::Fallback(error)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
