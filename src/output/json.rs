// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

use crate::output::OutputFormatter;
use crate::packer::PackedCodebase;
use crate::utils::error::StructpackError;

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, packed: &PackedCodebase) -> Result<String, StructpackError> {
        Ok(serde_json::to_string_pretty(packed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample;

    #[test]
    fn test_json_shape() {
        let out = JsonFormatter.format(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["metadata"]["total_files"], 2);
        assert_eq!(value["files"][0]["path"], "src/main.go");
        assert_eq!(value["files"][0]["compression"], "tree-sitter");
        assert_eq!(value["files"][1]["language"], serde_json::Value::Null);
    }
}
