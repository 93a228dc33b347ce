// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Writing the rendered pack to a file or stdout.

use crate::utils::error::StructpackError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the pack went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputResult {
    /// `None` when written to stdout
    pub path: Option<PathBuf>,
    pub bytes: usize,
    /// Whether the file was newly created (vs overwritten)
    pub is_new: bool,
}

/// Write `content` to `path`, creating parent directories, or to stdout when
/// no path is given.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<OutputResult, StructpackError> {
    let Some(path) = path else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        return Ok(OutputResult {
            path: None,
            bytes: content.len(),
            is_new: false,
        });
    };

    let is_new = !path.exists();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            StructpackError::OutputFormat(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    std::fs::write(path, content).map_err(|e| {
        StructpackError::OutputFormat(format!("Failed to write {}: {}", path.display(), e))
    })?;

    tracing::info!("Wrote {} bytes to {}", content.len(), path.display());

    Ok(OutputResult {
        path: Some(path.to_path_buf()),
        bytes: content.len(),
        is_new,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/nested/pack.md");

        let result = write_output("hello", Some(&path)).unwrap();

        assert!(result.is_new);
        assert_eq!(result.bytes, 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pack.txt");
        fs::write(&path, "old").unwrap();

        let result = write_output("new", Some(&path)).unwrap();

        assert!(!result.is_new);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
