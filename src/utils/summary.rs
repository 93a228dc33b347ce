// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! End-of-run summary.
//!
//! Written to stderr so it never mixes with a pack written to stdout.

use crate::packer::PackedCodebase;
use crate::utils::tokens::TokenStats;
use anyhow::Result;
use console::{Term, style};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Display the run summary.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn display_summary(
    packed: &PackedCodebase,
    tokens: Option<TokenStats>,
    output: Option<&Path>,
    compress: bool,
    elapsed: Duration,
    quiet: bool,
) -> Result<()> {
    if quiet {
        return Ok(());
    }
    let mut term = Term::stderr();
    for line in summary_lines(packed, tokens, output, compress, elapsed) {
        writeln!(term, "{line}")?;
    }
    Ok(())
}

fn summary_lines(
    packed: &PackedCodebase,
    tokens: Option<TokenStats>,
    output: Option<&Path>,
    compress: bool,
    elapsed: Duration,
) -> Vec<String> {
    let meta = &packed.metadata;
    let mut rows = vec![format!("Files packed: {}", format_number(meta.total_files))];

    if compress {
        rows.push(format!(
            "Compression: {} compressed, {} unsupported, {} fallback",
            meta.compressed_files, meta.unsupported_files, meta.fallback_files
        ));
    }

    rows.push(format!(
        "Size: {} \u{2192} {}{}",
        format_size(meta.total_original_size as u64),
        format_size(meta.total_processed_size as u64),
        reduction_suffix(meta.compression_ratio)
    ));

    if let Some(stats) = tokens {
        let suffix = stats
            .reduction()
            .map(|r| format!(" ({}% fewer)", (r * 100.0).round() as u32))
            .unwrap_or_default();
        rows.push(format!(
            "Tokens: {} \u{2192} {}{}",
            format_number(stats.original),
            format_number(stats.processed),
            suffix
        ));
    }

    if !meta.languages.is_empty() {
        let languages = meta
            .languages
            .iter()
            .map(|(name, count)| format!("{name} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(format!("Languages: {languages}"));
    }

    rows.push(format!(
        "Output: {}",
        output.map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
    ));
    rows.push(format!("Time: {}", format_duration(elapsed)));

    let mut lines = vec![
        String::new(),
        format!(
            "{} {}",
            style("\u{2713}").green().bold(),
            style("Pack complete").bold()
        ),
    ];
    let last = rows.len().saturating_sub(1);
    for (i, row) in rows.into_iter().enumerate() {
        let prefix = if i == last {
            "\u{2514}\u{2500}"
        } else {
            "\u{251c}\u{2500}"
        };
        lines.push(format!("{} {}", style(prefix).dim(), row));
    }
    lines
}

fn reduction_suffix(ratio: f32) -> String {
    if ratio > 0.0 && ratio < 1.0 {
        format!(" ({}% reduction)", ((1.0 - ratio) * 100.0).round() as u32)
    } else {
        String::new()
    }
}

/// Format a number with thousand separators.
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a byte count for display (e.g., "3.2 KB").
fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a duration for display (e.g., "12.3s" or "1m 23.0s").
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 60.0 {
        let mins = (secs / 60.0).floor() as u64;
        format!("{}m {:.1}s", mins, secs - (mins as f64 * 60.0))
    } else {
        format!("{:.1}s", secs)
    }
}
