// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

pub mod compress;
pub mod lexer;
pub mod manipulate;
pub mod pool;
pub mod process;
pub mod walker;

pub use process::{ProcessOptions, ProcessedFile, RawFile};
pub use walker::{FileEntry, read_files, scan_files};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What the compression stage did to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionMethod {
    /// Reduced to its structure with tree-sitter
    TreeSitter,
    /// Compression was requested but no grammar is registered for the file
    Unsupported,
    /// Compression failed and the file was kept as is
    Fallback,
    /// Compression was not requested
    None,
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TreeSitter => write!(f, "tree-sitter"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Fallback => write!(f, "fallback"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Metadata about the entire packed codebase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodebaseMetadata {
    /// Total number of files packed
    pub total_files: usize,
    /// Total size of original content in bytes
    pub total_original_size: usize,
    /// Total size of packed content in bytes
    pub total_processed_size: usize,
    /// File count breakdown by language
    pub languages: BTreeMap<String, usize>,
    /// Packed size over original size (0.0 to 1.0, where lower is smaller)
    pub compression_ratio: f32,
    /// Files reduced by tree-sitter
    pub compressed_files: usize,
    /// Files with no registered grammar while compression was on
    pub unsupported_files: usize,
    /// Files whose compression failed
    pub fallback_files: usize,
}

impl CodebaseMetadata {
    /// Calculate compression ratio from sizes.
    pub fn calculate_compression_ratio(original_size: usize, processed_size: usize) -> f32 {
        if original_size == 0 {
            return 0.0;
        }
        (processed_size as f32) / (original_size as f32)
    }
}

/// All processed files of a run, in walk order, with their metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PackedCodebase {
    pub files: Vec<ProcessedFile>,
    pub metadata: CodebaseMetadata,
}

impl PackedCodebase {
    /// Create a packed codebase and compute its metadata.
    pub fn new(files: Vec<ProcessedFile>) -> Self {
        let mut metadata = CodebaseMetadata {
            total_files: files.len(),
            ..CodebaseMetadata::default()
        };

        for file in &files {
            metadata.total_original_size += file.original_size;
            metadata.total_processed_size += file.content.len();
            if let Some(language) = file.language {
                *metadata.languages.entry(language.to_string()).or_insert(0) += 1;
            }
            match file.compression {
                CompressionMethod::TreeSitter => metadata.compressed_files += 1,
                CompressionMethod::Unsupported => metadata.unsupported_files += 1,
                CompressionMethod::Fallback => metadata.fallback_files += 1,
                CompressionMethod::None => {}
            }
        }

        metadata.compression_ratio = CodebaseMetadata::calculate_compression_ratio(
            metadata.total_original_size,
            metadata.total_processed_size,
        );

        Self { files, metadata }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(path: &str, original: usize, content: &str, method: CompressionMethod) -> ProcessedFile {
        ProcessedFile {
            path: PathBuf::from(path),
            content: content.to_string(),
            original_size: original,
            compression: method,
            language: path.ends_with(".go").then_some("go"),
        }
    }

    #[test]
    fn test_metadata_counts() {
        let packed = PackedCodebase::new(vec![
            file("a.go", 100, "func a()", CompressionMethod::TreeSitter),
            file("b.go", 50, &"x".repeat(50), CompressionMethod::Fallback),
            file("c.txt", 42, &"y".repeat(42), CompressionMethod::Unsupported),
        ]);
        let meta = &packed.metadata;
        assert_eq!(meta.total_files, 3);
        assert_eq!(meta.total_original_size, 192);
        assert_eq!(meta.total_processed_size, 100);
        assert_eq!(meta.languages.get("go"), Some(&2));
        assert_eq!(
            (meta.compressed_files, meta.fallback_files, meta.unsupported_files),
            (1, 1, 1)
        );
        assert!((meta.compression_ratio - 100.0 / 192.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ratio_of_empty_codebase() {
        assert_eq!(CodebaseMetadata::calculate_compression_ratio(0, 0), 0.0);
        assert_eq!(PackedCodebase::new(Vec::new()).metadata.total_files, 0);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(CompressionMethod::TreeSitter.to_string(), "tree-sitter");
        assert_eq!(CompressionMethod::Fallback.to_string(), "fallback");
    }
}
