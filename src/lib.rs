// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! # structpack
//!
//! Packs a source repository into one document for AI tools. A run goes
//! through these stages:
//!
//! 1. **Init** - Configuration validation and grammar warm-up
//! 2. **Scanning** - File discovery and reading
//! 3. **Processing** - Per-file pipeline on a bounded worker pool: comment
//!    removal, empty-line removal, structural compression, line numbers
//! 4. **Rendering** - Formatting the pack in the chosen output style
//! 5. **Writing** - Writing to the output file or stdout
//! 6. **Reporting** - Run summary
//! 7. **Complete**
//!
//! Structural compression reduces each supported source file to its
//! declarations, signatures, comments and imports (see
//! [`packer::compress`]). Files it cannot handle keep their content.
//!
//! Configuration follows hierarchical precedence:
//! 1. User config (~/.config/structpack/config.toml)
//! 2. Git root (structpack.toml)
//! 3. Current directory (structpack.toml)
//! 4. Explicit --config path
//! 5. Environment variables (STRUCTPACK__*)
//! 6. CLI flags (highest precedence)

pub mod cli;
pub mod output;
pub mod packer;
pub mod utils;

use anyhow::{Context, Result};
use output::OutputStyle;
use packer::compress::GrammarRegistry;
use packer::{PackedCodebase, ProcessOptions, RawFile, pool};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use utils::error::StructpackError;
use utils::progress::{ProgressManager, stages};
use utils::tokens::{TokenCounter, TokenStats, count_all};

/// Final resolved configuration after merging all sources (CLI, env, config files).
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Directory to pack
    pub path: PathBuf,
    /// Output file; stdout when `None`
    pub output: Option<PathBuf>,
    pub style: OutputStyle,
    /// File include patterns, relative to `path`
    pub include: Vec<String>,
    /// File exclude patterns, relative to `path`
    pub exclude: Vec<String>,
    /// Per-file pipeline stages
    pub process: ProcessOptions,
    /// Files processed in parallel
    pub workers: usize,
    /// Files above this size in bytes are skipped
    pub max_file_size: u64,
    /// Count tokens for the summary
    pub token_count: bool,
    /// List files without processing them
    pub dry_run: bool,
    /// Verbosity level (0-2)
    pub verbose: u8,
    /// Only print errors
    pub quiet: bool,
}

impl Default for MergedConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            output: None,
            style: OutputStyle::default(),
            include: Vec::new(),
            exclude: Vec::new(),
            process: ProcessOptions::default(),
            workers: cli::config::default_workers(),
            max_file_size: cli::config::DEFAULT_MAX_FILE_SIZE,
            token_count: true,
            dry_run: false,
            verbose: 0,
            quiet: false,
        }
    }
}

/// Tracks the current stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    Scanning,
    Processing,
    Rendering,
    Writing,
    Reporting,
    Complete,
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-q` logs warnings only, the default
/// is `info`, `-v` is `debug` and `-vv` is `trace`.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A subscriber may already be installed (tests, embedding applications).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn validate(config: &MergedConfig) -> Result<(), StructpackError> {
    if !config.path.is_dir() {
        return Err(StructpackError::missing_path(&config.path));
    }
    if config.workers == 0 {
        return Err(StructpackError::invalid_workers(config.workers));
    }
    Ok(())
}

/// Discover and read the files a run would pack.
pub async fn collect(config: &MergedConfig) -> Result<Vec<RawFile>> {
    validate(config)?;
    let entries = packer::scan_files(&config.path, config)
        .with_context(|| format!("Failed to scan {}", config.path.display()))?;
    let files = packer::read_files(&entries)
        .await
        .context("Failed to read files")?;
    Ok(files)
}

/// Collect and process every file, without progress display or output.
pub async fn pack(config: &MergedConfig) -> Result<PackedCodebase> {
    let files = collect(config).await?;
    let processed = pool::process_files(files, config.process, config.workers, None).await;
    Ok(PackedCodebase::new(processed))
}

/// Run the whole pipeline. Ctrl-C cancels outstanding work.
pub async fn run(config: MergedConfig) -> Result<()> {
    tracing::info!("structpack v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: path={}, style={}, process={:?}, workers={}",
        config.path.display(),
        config.style.as_str(),
        config.process,
        config.workers
    );

    let mut progress = if config.quiet {
        ProgressManager::hidden()
    } else {
        ProgressManager::new()
    };

    tokio::select! {
        result = execute(&config, &mut progress) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, discarding partial results");
            Err(StructpackError::Cancelled.into())
        }
    }
}

async fn execute(config: &MergedConfig, progress: &mut ProgressManager) -> Result<()> {
    let started = Instant::now();

    tracing::info!("Pipeline stage: {:?}", PipelineStage::Init);
    validate(config)?;
    if config.process.compress {
        tokio::task::spawn_blocking(|| GrammarRegistry::global().precompile())
            .await
            .context("Failed to prepare grammars")?;
    }

    tracing::info!("Pipeline stage: {:?}", PipelineStage::Scanning);
    if config.dry_run {
        let entries = packer::scan_files(&config.path, config)?;
        display_dry_run(config, &entries);
        return Ok(());
    }
    let spinner = progress.add_spinner(stages::SCANNING);
    spinner.set_message(config.path.display().to_string());
    let files = collect(config).await?;
    progress.finish(stages::SCANNING, &format!("Found {} files", files.len()));

    let counter = if config.token_count {
        match TokenCounter::new() {
            Ok(counter) => Some(counter),
            Err(e) => {
                tracing::warn!("Token counting unavailable: {e}");
                None
            }
        }
    } else {
        None
    };
    let original_tokens = counter
        .as_ref()
        .map(|c| count_all(c, files.iter().map(|f| f.content.as_str())));

    tracing::info!("Pipeline stage: {:?}", PipelineStage::Processing);
    let bar = progress.add_stage(stages::PROCESSING, files.len() as u64);
    let processed = pool::process_files(files, config.process, config.workers, Some(bar)).await;
    let packed = PackedCodebase::new(processed);
    progress.finish(
        stages::PROCESSING,
        &format!("Processed {} files", packed.metadata.total_files),
    );

    tracing::info!("Pipeline stage: {:?}", PipelineStage::Rendering);
    let rendered = output::render(&packed, config.style)?;

    tracing::info!("Pipeline stage: {:?}", PipelineStage::Writing);
    output::write_output(&rendered, config.output.as_deref())?;

    tracing::info!("Pipeline stage: {:?}", PipelineStage::Reporting);
    let tokens = counter.as_ref().zip(original_tokens).map(|(c, original)| TokenStats {
        original,
        processed: count_all(c, packed.files.iter().map(|f| f.content.as_str())),
    });
    utils::summary::display_summary(
        &packed,
        tokens,
        config.output.as_deref(),
        config.process.compress,
        started.elapsed(),
        config.quiet,
    )?;

    tracing::info!("Pipeline stage: {:?}", PipelineStage::Complete);
    Ok(())
}

/// List the files a run would pack and whether each has a grammar.
#[allow(clippy::print_stdout)]
fn display_dry_run(config: &MergedConfig, entries: &[packer::FileEntry]) {
    let registry = GrammarRegistry::global();

    println!("Dry Run Mode - {} files", entries.len());
    println!("=====================================");
    for entry in entries {
        let language = registry
            .resolve_path(&entry.relative)
            .map_or("-", |spec| spec.name);
        println!(
            "{:<12} {:>10}  {}",
            language,
            entry.size,
            output::display_path(&entry.relative)
        );
    }
    println!();
    println!("Style:        {}", config.style.as_str());
    println!("Compress:     {}", config.process.compress);
    println!(
        "Output:       {}",
        config
            .output
            .as_ref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
    );
}
