// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use crate::output::{OutputFormatter, display_path, header_line};
use crate::packer::PackedCodebase;
use crate::utils::error::StructpackError;
use quick_xml::escape::escape;

pub struct XmlFormatter;

impl OutputFormatter for XmlFormatter {
    fn format(&self, packed: &PackedCodebase) -> Result<String, StructpackError> {
        let mut out = format!(
            "<summary>{}</summary>\n<files>\n",
            escape(header_line(packed).as_str())
        );

        for file in &packed.files {
            out.push_str(&format!(
                "<file path=\"{}\" compression=\"{}\">\n{}\n</file>\n",
                escape(display_path(&file.path).as_str()),
                file.compression,
                escape(file.content.trim_end_matches('\n'))
            ));
        }

        out.push_str("</files>\n");
        Ok(out)
    }
}
