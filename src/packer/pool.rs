// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Runs the per-file pipeline on tokio's blocking pool.
//!
//! At most `workers` files are in flight at once. Tasks are submitted lazily
//! as earlier ones finish, results are tagged with their input index, and
//! the output is returned in input order regardless of completion order.

use super::compress::Compressor;
use super::process::{ProcessOptions, ProcessedFile, RawFile, process_file};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::sync::Arc;

/// Process every file with the built-in grammars.
pub async fn process_files(
    files: Vec<RawFile>,
    options: ProcessOptions,
    workers: usize,
    progress: Option<ProgressBar>,
) -> Vec<ProcessedFile> {
    let compressor = Compressor::global();
    process_files_with(files, workers, progress, move |file| {
        process_file(file, &options, &compressor)
    })
    .await
}

/// Process every file with `job`.
///
/// A task that panics yields the file's raw content, logged as an error.
pub async fn process_files_with<F>(
    files: Vec<RawFile>,
    workers: usize,
    progress: Option<ProgressBar>,
    job: F,
) -> Vec<ProcessedFile>
where
    F: Fn(&RawFile) -> ProcessedFile + Send + Sync + 'static,
{
    let job = Arc::new(job);
    let total = files.len();

    let mut results: Vec<(usize, ProcessedFile)> =
        stream::iter(files.into_iter().enumerate().map(|(index, file)| {
            let job = Arc::clone(&job);
            let file = Arc::new(file);
            async move {
                let task_file = Arc::clone(&file);
                let processed =
                    match tokio::task::spawn_blocking(move || job(&task_file)).await {
                        Ok(processed) => processed,
                        Err(e) => {
                            tracing::error!(
                                path = %file.path.display(),
                                error = %e,
                                "Worker task failed, keeping original content"
                            );
                            ProcessedFile::passthrough(&file, None)
                        }
                    };
                (index, processed)
            }
        }))
        .buffer_unordered(workers.max(1))
        .inspect(|(_, processed)| {
            if let Some(pb) = &progress {
                pb.set_message(processed.path.display().to_string());
                pb.inc(1);
            }
        })
        .collect()
        .await;

    results.sort_unstable_by_key(|(index, _)| *index);
    tracing::debug!("Processed {total} files with {} workers", workers.max(1));
    results.into_iter().map(|(_, processed)| processed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::CompressionMethod;
    use std::time::Duration;

    fn files(n: usize) -> Vec<RawFile> {
        (0..n)
            .map(|i| RawFile::new(format!("f{i}.txt"), format!("content {i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        for workers in [1, 2, 8] {
            let out = process_files_with(files(12), workers, None, |file| {
                // Earlier files finish later.
                let index: u64 = file.content["content ".len()..].parse().unwrap_or(0);
                std::thread::sleep(Duration::from_millis(24 - 2 * index));
                ProcessedFile::passthrough(file, None)
            })
            .await;
            let paths: Vec<String> = out.iter().map(|f| f.path.display().to_string()).collect();
            let expected: Vec<String> = (0..12).map(|i| format!("f{i}.txt")).collect();
            assert_eq!(paths, expected, "workers = {workers}");
        }
    }

    #[tokio::test]
    async fn test_panicking_task_passes_file_through() {
        let out = process_files_with(files(3), 2, None, |file| {
            if file.path.to_string_lossy() == "f1.txt" {
                panic!("boom");
            }
            ProcessedFile {
                content: file.content.to_uppercase(),
                ..ProcessedFile::passthrough(file, None)
            }
        })
        .await;
        assert_eq!(out[0].content, "CONTENT 0");
        assert_eq!(out[1].content, "content 1");
        assert_eq!(out[1].compression, CompressionMethod::None);
        assert_eq!(out[2].content, "CONTENT 2");
    }

    #[tokio::test]
    async fn test_progress_counts_every_file() {
        let pb = ProgressBar::hidden();
        pb.set_length(5);
        let out = process_files(files(5), ProcessOptions::default(), 3, Some(pb.clone())).await;
        assert_eq!(out.len(), 5);
        assert_eq!(pb.position(), 5);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let out = process_files(Vec::new(), ProcessOptions::default(), 0, None).await;
        assert!(out.is_empty());
    }
}
