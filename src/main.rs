// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use structpack::utils::error::{StructpackError, format_error};
use structpack::{cli, run};

#[tokio::main]
async fn main() {
    // Verbosity is not known yet when argument parsing itself fails.
    let verbose = std::env::args().any(|arg| arg == "-v" || arg == "--verbose");

    if let Err(e) = run_main().await {
        display_error(&e, verbose);
        std::process::exit(1);
    }
}

/// Display an error with contextual formatting.
///
/// Tries to downcast to `StructpackError` for rich formatting, falls back to
/// anyhow's error chain display for other errors.
fn display_error(error: &anyhow::Error, verbose: bool) {
    if let Some(structpack_error) = error.downcast_ref::<StructpackError>() {
        eprintln!("{}", format_error(structpack_error, verbose));
        return;
    }

    eprintln!("\n\u{26a0} Error: {}", error);

    let causes: Vec<_> = error.chain().skip(1).collect();
    if !causes.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            let prefix = if i == causes.len() - 1 {
                "\u{2514}\u{2500}"
            } else {
                "\u{251c}\u{2500}"
            };
            eprintln!("{} {}", prefix, cause);
        }
    }

    if verbose {
        let backtrace = error.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:\n{}", backtrace);
        }
    }
}

async fn run_main() -> Result<()> {
    let args = cli::args::parse();
    let config = cli::config::load(&args)?;
    let merged_config = cli::config::merge_config(&args, config);

    structpack::init_logging(merged_config.verbose, merged_config.quiet);

    run(merged_config).await
}
