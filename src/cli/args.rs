// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use crate::output::OutputStyle;
use clap::Parser;
use std::path::PathBuf;

/// CLI argument parsing with environment variable support.
///
/// Environment variables follow the pattern `STRUCTPACK_*` and are overridden
/// by CLI flags. Example: `STRUCTPACK_STYLE=xml` is overridden by
/// `--style markdown`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "structpack")]
#[command(about = "Pack a repository into one AI-ready document, optionally reduced to its structure")]
#[command(version)]
pub struct Args {
    /// Directory to pack
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output file path (stdout when omitted)
    #[arg(short, long, env = "STRUCTPACK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output style
    #[arg(long, value_enum, env = "STRUCTPACK_STYLE")]
    pub style: Option<OutputStyle>,

    /// Reduce supported source files to declarations, comments and imports
    #[arg(long, env = "STRUCTPACK_COMPRESS")]
    pub compress: bool,

    /// Strip comments before packing
    #[arg(long, env = "STRUCTPACK_REMOVE_COMMENTS")]
    pub remove_comments: bool,

    /// Drop blank lines before packing
    #[arg(long, env = "STRUCTPACK_REMOVE_EMPTY_LINES")]
    pub remove_empty_lines: bool,

    /// Prefix every line with its number
    #[arg(long, env = "STRUCTPACK_LINE_NUMBERS")]
    pub line_numbers: bool,

    /// Include only matching files (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude matching files (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Number of files processed in parallel
    #[arg(long, env = "STRUCTPACK_WORKERS")]
    pub workers: Option<usize>,

    /// Skip files larger than this many bytes
    #[arg(long, env = "STRUCTPACK_MAX_FILE_SIZE")]
    pub max_file_size: Option<u64>,

    /// Skip token counting in the summary
    #[arg(long)]
    pub no_token_count: bool,

    /// List the files that would be packed without processing them
    #[arg(long, env = "STRUCTPACK_DRY_RUN")]
    pub dry_run: bool,

    /// Config file path
    #[arg(short, long, env = "STRUCTPACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
