// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Basic usage example for the structpack library.
//!
//! Packs a directory with structural compression and prints it as Markdown.
//!
//! Run with: `cargo run --example basic_usage -- [path]`

use anyhow::Result;
use std::path::PathBuf;
use structpack::output::{self, OutputStyle};
use structpack::packer::ProcessOptions;
use structpack::{MergedConfig, init_logging, pack};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(0, false);

    let target_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    tracing::info!("Packing directory: {}", target_dir.display());

    let config = MergedConfig {
        path: target_dir,
        exclude: vec!["target/**".to_string()],
        process: ProcessOptions {
            remove_empty_lines: true,
            compress: true,
            ..ProcessOptions::default()
        },
        ..MergedConfig::default()
    };

    let packed = pack(&config).await?;
    let rendered = output::render(&packed, OutputStyle::Markdown)?;
    output::write_output(&rendered, None)?;

    tracing::info!(
        "Packed {} files ({} compressed, ratio {:.2})",
        packed.metadata.total_files,
        packed.metadata.compressed_files,
        packed.metadata.compression_ratio
    );

    Ok(())
}
