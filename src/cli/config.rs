// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** (and their `STRUCTPACK_*` env fallbacks)
//! 2. **Environment variables** via `STRUCTPACK__SECTION__KEY`
//! 3. **Config files**
//!
//! ## Config File Discovery (in merge order, later overrides earlier):
//! 1. `~/.config/structpack/config.toml`
//! 2. `structpack.toml` in the git repository root
//! 3. `./structpack.toml` in the current directory
//! 4. Explicit `--config` path
//!
//! ## Example file
//! ```toml
//! [output]
//! style = "markdown"
//! compress = true
//!
//! [exclude]
//! patterns = ["**/*.lock"]
//!
//! [processing]
//! workers = 4
//! ```

use crate::MergedConfig;
use crate::cli::args::Args;
use crate::output::OutputStyle;
use crate::packer::ProcessOptions;
use crate::utils::error::StructpackError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "structpack.toml";

/// Default upper bound on the size of a packed file.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub include: IncludeConfig,
    #[serde(default)]
    pub exclude: ExcludeConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub style: Option<OutputStyle>,
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub compress: bool,
    #[serde(default)]
    pub remove_comments: bool,
    #[serde(default)]
    pub remove_empty_lines: bool,
    #[serde(default)]
    pub show_line_numbers: bool,
    #[serde(default = "default_true")]
    pub token_count: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            style: None,
            file: None,
            compress: false,
            remove_comments: false,
            remove_empty_lines: false,
            show_line_numbers: false,
            token_count: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// File inclusion patterns.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IncludeConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// File exclusion patterns.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExcludeConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProcessingConfig {
    pub workers: Option<usize>,
    pub max_file_size: Option<u64>,
}

fn discover_config_paths(explicit_path: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    if let Some(git_root) = find_git_root() {
        let git_config = git_root.join(CONFIG_FILE_NAME);
        if git_config.exists() {
            paths.push(git_config);
        }
    }

    let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_dir_config.exists() && !paths.iter().any(|p| same_file(p, &current_dir_config)) {
        paths.push(current_dir_config);
    }

    if let Some(explicit) = explicit_path {
        paths.push(explicit.to_path_buf());
    }

    paths
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn find_git_root() -> Option<PathBuf> {
    git2::Repository::discover(".")
        .ok()
        .and_then(|repo| repo.workdir().map(|p| p.to_path_buf()))
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("structpack").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
///
/// An explicit `--config` path that does not exist is an error; discovered
/// files are only used when present.
pub fn load(args: &Args) -> Result<Config, StructpackError> {
    if let Some(explicit) = &args.config
        && !explicit.exists()
    {
        return Err(StructpackError::Config(format!(
            "Config file not found: {}",
            explicit.display()
        )));
    }
    load_from(&discover_config_paths(args.config.as_deref()))
}

/// Build the configuration from `paths` (later wins) plus the environment.
pub fn load_from(paths: &[PathBuf]) -> Result<Config, StructpackError> {
    let mut builder = config::Config::builder();

    for config_path in paths {
        tracing::debug!("Loading config from {}", config_path.display());
        builder = builder.add_source(config::File::from(config_path.as_path()));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("STRUCTPACK")
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("include.patterns")
            .with_list_parse_key("exclude.patterns")
            .try_parsing(true),
    );

    Ok(builder.build()?.try_deserialize()?)
}

/// Merge CLI arguments over the loaded configuration.
///
/// Values given on the command line replace file values and boolean flags can
/// only switch a stage on. Include/exclude patterns from both are combined.
/// Without an explicit style, the output file's extension picks one.
pub fn merge_config(args: &Args, config: Config) -> MergedConfig {
    let workers = args
        .workers
        .or(config.processing.workers)
        .unwrap_or_else(default_workers);

    let mut include = config.include.patterns;
    include.extend(args.include.iter().cloned());
    let mut exclude = config.exclude.patterns;
    exclude.extend(args.exclude.iter().cloned());

    let output = args.output.clone().or(config.output.file);
    let style = args
        .style
        .or(config.output.style)
        .or_else(|| output.as_deref().and_then(style_from_extension))
        .unwrap_or_default();

    MergedConfig {
        path: args.path.clone(),
        output,
        style,
        include,
        exclude,
        process: ProcessOptions {
            remove_comments: args.remove_comments || config.output.remove_comments,
            remove_empty_lines: args.remove_empty_lines || config.output.remove_empty_lines,
            compress: args.compress || config.output.compress,
            show_line_numbers: args.line_numbers || config.output.show_line_numbers,
        },
        workers,
        max_file_size: args
            .max_file_size
            .or(config.processing.max_file_size)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE),
        token_count: config.output.token_count && !args.no_token_count,
        dry_run: args.dry_run,
        verbose: args.verbose,
        quiet: args.quiet,
    }
}

/// The style implied by an output file name such as `pack.md`.
fn style_from_extension(path: &Path) -> Option<OutputStyle> {
    let extension = path.extension()?.to_str()?;
    OutputStyle::from_name(extension).ok()
}

/// One worker per available core.
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_later_file_wins() {
        let dir = TempDir::new().unwrap();
        let base = write_config(
            &dir,
            "base.toml",
            "[output]\nstyle = \"xml\"\ncompress = true\n\n[processing]\nworkers = 2\n",
        );
        let local = write_config(&dir, "local.toml", "[output]\nstyle = \"markdown\"\n");

        let config = load_from(&[base, local]).unwrap();
        assert_eq!(config.output.style, Some(OutputStyle::Markdown));
        assert!(config.output.compress);
        assert!(config.output.token_count);
        assert_eq!(config.processing.workers, Some(2));
    }

    #[test]
    fn test_invalid_style_is_rejected() {
        let dir = TempDir::new().unwrap();
        let bad = write_config(&dir, "bad.toml", "[output]\nstyle = \"yaml\"\n");
        assert!(load_from(&[bad]).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/structpack.toml")),
            ..Args::default()
        };
        let err = load(&args).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let config = Config {
            output: OutputConfig {
                style: Some(OutputStyle::Json),
                file: Some(PathBuf::from("from-file.json")),
                remove_comments: true,
                ..OutputConfig::default()
            },
            include: IncludeConfig {
                patterns: vec!["src/**".into()],
            },
            processing: ProcessingConfig {
                workers: Some(3),
                max_file_size: None,
            },
            ..Config::default()
        };
        let args = Args {
            path: PathBuf::from("repo"),
            style: Some(OutputStyle::Plain),
            compress: true,
            include: vec!["lib/**".into()],
            no_token_count: true,
            ..Args::default()
        };

        let merged = merge_config(&args, config);
        assert_eq!(merged.style, OutputStyle::Plain);
        assert_eq!(merged.output, Some(PathBuf::from("from-file.json")));
        assert_eq!(merged.include, ["src/**", "lib/**"]);
        assert!(merged.process.compress);
        assert!(merged.process.remove_comments);
        assert!(!merged.process.show_line_numbers);
        assert_eq!(merged.workers, 3);
        assert_eq!(merged.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(!merged.token_count);
    }

    #[test]
    fn test_style_inferred_from_output_extension() {
        let args = Args {
            output: Some(PathBuf::from("out/pack.md")),
            ..Args::default()
        };
        assert_eq!(
            merge_config(&args, Config::default()).style,
            OutputStyle::Markdown
        );

        let unknown = Args {
            output: Some(PathBuf::from("pack.out")),
            ..Args::default()
        };
        assert_eq!(
            merge_config(&unknown, Config::default()).style,
            OutputStyle::Plain
        );

        let explicit = Args {
            output: Some(PathBuf::from("pack.md")),
            style: Some(OutputStyle::Xml),
            ..Args::default()
        };
        assert_eq!(merge_config(&explicit, Config::default()).style, OutputStyle::Xml);
    }
}
