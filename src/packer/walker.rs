// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use super::process::RawFile;
use crate::MergedConfig;
use crate::utils::error::StructpackError;
use globset::{GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Bytes inspected when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 8000;

/// Represents a file discovered during directory scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute or root-joined path used for reading
    pub path: PathBuf,
    /// Path relative to the scanned root
    pub relative: PathBuf,
    /// Size of the file in bytes
    pub size: u64,
}

/// Build a GlobSet from a list of patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet, StructpackError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = globset::Glob::new(pattern).map_err(|e| {
            StructpackError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| StructpackError::Config(format!("Failed to build glob set: {}", e)))
}

/// Normalize path to a forward-slash separated string for glob matching.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Scan files under `root`, honouring `.gitignore`, the include/exclude
/// patterns, and the size limit. Entries are sorted by relative path.
pub fn scan_files(root: &Path, config: &MergedConfig) -> Result<Vec<FileEntry>, StructpackError> {
    let include_set = build_globset(&config.include)?;
    let exclude_set = build_globset(&config.exclude)?;

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .follow_links(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut entries = Vec::new();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error walking directory: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if entry.path_is_symlink() {
            tracing::debug!("Skipping symlink: {}", path.display());
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let normalized_path = normalize_path(&relative);

        if !config.include.is_empty() && !include_set.is_match(&normalized_path) {
            continue;
        }
        if exclude_set.is_match(&normalized_path) {
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::warn!("Failed to read metadata for {}: {}", path.display(), e);
                continue;
            }
        };
        if size > config.max_file_size {
            tracing::debug!(
                "Skipping {} ({} bytes exceeds limit of {})",
                relative.display(),
                size,
                config.max_file_size
            );
            continue;
        }

        entries.push(FileEntry {
            path: path.to_path_buf(),
            relative,
            size,
        });
    }

    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    tracing::info!("Scanned {} files", entries.len());
    Ok(entries)
}

/// Read every entry as UTF-8 text. Binary and non-UTF-8 files are skipped.
pub async fn read_files(entries: &[FileEntry]) -> Result<Vec<RawFile>, StructpackError> {
    let mut files = Vec::with_capacity(entries.len());

    for entry in entries {
        let bytes = match tokio::fs::read(&entry.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                tracing::warn!("Permission denied: {}", entry.path.display());
                continue;
            }
            Err(e) => return Err(StructpackError::FileSystem(e)),
        };

        if is_binary(&bytes) {
            tracing::debug!("Skipping binary file: {}", entry.relative.display());
            continue;
        }

        match String::from_utf8(bytes) {
            Ok(content) => files.push(RawFile::new(entry.relative.clone(), content)),
            Err(_) => {
                tracing::debug!("Skipping non-UTF-8 file: {}", entry.relative.display());
            }
        }
    }

    Ok(files)
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0)
}
