// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use crate::output::{OutputFormatter, display_path, header_line};
use crate::packer::PackedCodebase;
use crate::utils::error::StructpackError;
use std::path::Path;

pub struct MarkdownFormatter;

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, packed: &PackedCodebase) -> Result<String, StructpackError> {
        let mut out = format!("# Packed repository\n\n{}\n", header_line(packed));

        for file in &packed.files {
            let fence = fence_for(&file.content);
            let hint = file
                .language
                .map(str::to_string)
                .unwrap_or_else(|| extension_hint(&file.path));
            out.push_str(&format!(
                "\n## File: {}\n{fence}{hint}\n{}\n{fence}\n",
                display_path(&file.path),
                file.content.trim_end_matches('\n')
            ));
        }

        Ok(out)
    }
}

/// A backtick fence longer than any backtick run inside `content`.
fn fence_for(content: &str) -> String {
    let longest = content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn extension_hint(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}
