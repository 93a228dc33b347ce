// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use console::style;
use thiserror::Error;

/// Run-level failures. Per-file compression problems never surface here;
/// they fall back to the original content inside the compressor.
#[derive(Debug, Error)]
pub enum StructpackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Output format error: {0}")]
    OutputFormat(String),

    #[error("Parse error: {message}")]
    ParseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Validation error: {message}\nSuggestion: {suggestion}")]
    ValidationError { message: String, suggestion: String },
}

impl StructpackError {
    pub fn missing_path(path: &std::path::Path) -> Self {
        StructpackError::ValidationError {
            message: format!("Path does not exist: {}", path.display()),
            suggestion: "Pass an existing directory to pack".to_string(),
        }
    }

    pub fn invalid_workers(workers: usize) -> Self {
        StructpackError::ValidationError {
            message: format!("Invalid worker count: {}", workers),
            suggestion: "Use at least one worker".to_string(),
        }
    }

    pub fn invalid_style(style: &str) -> Self {
        StructpackError::ValidationError {
            message: format!("Invalid output style: '{}'", style),
            suggestion: "Valid styles are: plain, markdown, xml, json".to_string(),
        }
    }
}

impl From<serde_json::Error> for StructpackError {
    fn from(err: serde_json::Error) -> Self {
        StructpackError::ParseError {
            message: "Failed to serialize JSON output".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<config::ConfigError> for StructpackError {
    fn from(err: config::ConfigError) -> Self {
        StructpackError::Config(err.to_string())
    }
}

/// Render an error for the terminal, with its source chain in verbose mode.
pub fn format_error(error: &StructpackError, verbose: bool) -> String {
    let mut out = format!("\n{} {}", style("\u{26a0} Error:").red().bold(), error);

    if verbose {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            out.push_str(&format!("\n  {} {}", style("\u{2514}\u{2500}").dim(), cause));
            source = cause.source();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_includes_suggestion() {
        let msg = StructpackError::invalid_style("yaml").to_string();
        assert!(msg.contains("'yaml'"));
        assert!(msg.contains("plain, markdown, xml, json"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: StructpackError = config::ConfigError::NotFound("output.style".into()).into();
        assert!(matches!(err, StructpackError::Config(_)));
        assert!(err.to_string().contains("output.style"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: StructpackError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, StructpackError::FileSystem(_)));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_format_error_shows_chain_when_verbose() {
        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = StructpackError::from(json_err);
        let quiet = format_error(&err, false);
        let verbose = format_error(&err, true);
        assert!(quiet.contains("Failed to serialize JSON output"));
        assert!(verbose.len() > quiet.len());
    }
}
