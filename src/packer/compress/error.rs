// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failures inside the compression engine.
///
/// None of these leave [`super::Compressor::compress`]; they are turned into a
/// fallback to the uncompressed content for the affected file only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompressionError {
    #[error("No grammar registered for extension '{extension}'")]
    UnsupportedLanguage { extension: String },

    #[error("Failed to parse {language} source: {message}")]
    ParseFailure { language: String, message: String },

    #[error("Query execution failed for {language}: {message}")]
    QueryExecutionFailure { language: String, message: String },

    #[error("Cannot classify capture '{label}' at line {row}: {message}")]
    StrategyClassification {
        label: String,
        row: usize,
        message: String,
    },

    #[error("Compression panicked: {0}")]
    Internal(String),
}

impl CompressionError {
    pub fn parse(language: &str, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            language: language.to_string(),
            message: message.into(),
        }
    }

    pub fn query(language: &str, message: impl Into<String>) -> Self {
        Self::QueryExecutionFailure {
            language: language.to_string(),
            message: message.into(),
        }
    }
}
