// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use crate::output::{OutputFormatter, display_path, header_line};
use crate::packer::PackedCodebase;
use crate::utils::error::StructpackError;

const SEPARATOR: &str = "================";

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format(&self, packed: &PackedCodebase) -> Result<String, StructpackError> {
        let mut out = header_line(packed);
        out.push('\n');

        for file in &packed.files {
            out.push_str(&format!(
                "\n{SEPARATOR}\nFile: {}\n{SEPARATOR}\n{}\n",
                display_path(&file.path),
                file.content.trim_end_matches('\n')
            ));
        }

        Ok(out)
    }
}
