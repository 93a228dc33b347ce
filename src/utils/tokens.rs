// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Token counting for packed output.
//!
//! Counts use the `cl100k_base` encoding, a reasonable approximation for the
//! models packed output is usually fed to.

use crate::utils::error::StructpackError;
use tiktoken_rs::{CoreBPE, cl100k_base};

pub struct TokenCounter {
    encoding: CoreBPE,
}

impl TokenCounter {
    /// # Errors
    ///
    /// Returns an error if the encoding cannot be loaded.
    pub fn new() -> Result<Self, StructpackError> {
        let encoding = cl100k_base().map_err(|e| StructpackError::Config(e.to_string()))?;
        Ok(Self { encoding })
    }

    pub fn count(&self, text: &str) -> usize {
        self.encoding.encode_with_special_tokens(text).len()
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter").finish_non_exhaustive()
    }
}

/// Token totals before and after processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStats {
    pub original: usize,
    pub processed: usize,
}

impl TokenStats {
    /// Fraction of tokens removed, if any were.
    pub fn reduction(&self) -> Option<f32> {
        if self.original == 0 || self.processed >= self.original {
            return None;
        }
        Some(1.0 - self.processed as f32 / self.original as f32)
    }
}

/// Total tokens over a set of texts.
pub fn count_all<'a>(counter: &TokenCounter, texts: impl IntoIterator<Item = &'a str>) -> usize {
    texts.into_iter().map(|text| counter.count(text)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens() {
        let counter = TokenCounter::new().unwrap();
        assert_eq!(counter.count(""), 0);
        let short = counter.count("fn main() {}");
        let long = counter.count("fn main() { println!(\"hello, world\"); }");
        assert!(short > 0);
        assert!(long > short);
    }

    #[test]
    fn test_count_all_sums_texts() {
        let counter = TokenCounter::new().unwrap();
        let texts = ["package main", "func main()"];
        let expected = counter.count(texts[0]) + counter.count(texts[1]);
        assert_eq!(count_all(&counter, texts), expected);
        assert_eq!(count_all(&counter, []), 0);
    }

    #[test]
    fn test_reduction() {
        let stats = TokenStats {
            original: 200,
            processed: 50,
        };
        assert_eq!(stats.reduction(), Some(0.75));
        assert_eq!(TokenStats::default().reduction(), None);
        assert_eq!(
            TokenStats {
                original: 10,
                processed: 10
            }
            .reduction(),
            None
        );
    }
}
