// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress display for the scanning and processing stages.
//!
//! Everything is drawn on stderr. When stderr is not a terminal every bar is
//! hidden, so piping a pack to another program never interleaves bar output.

use std::collections::HashMap;
use std::time::Duration;

use console::Term;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

pub mod stages {
    /// File discovery and reading; indeterminate.
    pub const SCANNING: &str = "scanning";
    /// Per-file pipeline; one tick per finished file.
    pub const PROCESSING: &str = "processing";
}

const SPINNER_TICK: Duration = Duration::from_millis(100);

pub struct ProgressManager {
    multi: MultiProgress,
    bars: HashMap<&'static str, ProgressBar>,
    visible: bool,
}

impl ProgressManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_visibility(Term::stderr().is_term())
    }

    /// A manager whose bars are always hidden.
    #[must_use]
    pub fn hidden() -> Self {
        Self::with_visibility(false)
    }

    fn with_visibility(visible: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: HashMap::new(),
            visible,
        }
    }

    /// A spinner for a stage whose length is not known up front.
    #[must_use]
    pub fn add_spinner(&mut self, stage: &'static str) -> ProgressBar {
        let pb = if self.visible {
            let spinner = self.multi.add(ProgressBar::new_spinner());
            spinner.enable_steady_tick(SPINNER_TICK);
            spinner
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(style_for_stage(stage));
        self.bars.insert(stage, pb.clone());
        pb
    }

    /// A bar counting `total` items for `stage`.
    #[must_use]
    pub fn add_stage(&mut self, stage: &'static str, total: u64) -> ProgressBar {
        let pb = if self.visible {
            self.multi.add(ProgressBar::new(total))
        } else {
            ProgressBar::hidden()
        };
        pb.set_length(total);
        pb.set_style(style_for_stage(stage));
        self.bars.insert(stage, pb.clone());
        pb
    }

    /// Clear the stage's bar and leave `message` in its place. Unknown stages
    /// are ignored.
    pub fn finish(&mut self, stage: &str, message: &str) {
        if let Some(pb) = self.bars.remove(stage) {
            pb.finish_and_clear();
            if self.visible {
                let _ = self.multi.println(message);
            }
        }
    }
}

fn style_for_stage(stage: &str) -> ProgressStyle {
    let (template, spinner) = match stage {
        stages::SCANNING => ("{spinner:.green} Scanning {msg}", true),
        stages::PROCESSING => ("[{bar:40.cyan/blue}] {pos}/{len} {wide_msg}", false),
        _ => ("[{bar:40.cyan/blue}] {pos}/{len} {msg}", false),
    };
    let base = if spinner {
        ProgressStyle::default_spinner()
    } else {
        ProgressStyle::default_bar()
    };

    base.clone()
        .template(template)
        .unwrap_or_else(|e| {
            tracing::warn!("Invalid progress template for stage '{stage}': {e}");
            base
        })
        .progress_chars("#>-")
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressManager")
            .field("stages", &self.bars.keys().collect::<Vec<_>>())
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}
