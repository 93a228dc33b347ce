// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Extension-keyed table of supported languages.
//!
//! Each [`LanguageSpec`] bundles everything the compressor needs for one
//! language: the tree-sitter grammar, its capture query, the parse strategy,
//! and the lexical and syntactic conventions used when cutting fragments.
//! Grammars and queries are compiled lazily, once per process, and shared
//! read-only between workers.

use super::error::CompressionError;
use super::strategy::dialect::{self, Dialect};
use super::strategy::{ClassifyContext, ParseStrategy};
use crate::packer::lexer::{self, Lexicon};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};
use tree_sitter::{Language, Query};

/// A grammar together with its compiled capture query.
pub struct CompiledGrammar {
    pub language: Language,
    pub query: Query,
}

/// Everything needed to compress one language.
pub struct LanguageSpec {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub grammar: fn() -> Language,
    pub query: &'static str,
    pub strategy: ParseStrategy,
    pub dialect: &'static Dialect,
    pub lexicon: &'static Lexicon,
    compiled: OnceLock<Result<CompiledGrammar, CompressionError>>,
}

impl fmt::Debug for LanguageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageSpec")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("strategy", &self.strategy)
            .field("compiled", &self.compiled.get().map(Result::is_ok))
            .finish_non_exhaustive()
    }
}

impl LanguageSpec {
    pub fn new(
        name: &'static str,
        extensions: &'static [&'static str],
        grammar: fn() -> Language,
        query: &'static str,
        strategy: ParseStrategy,
        dialect: &'static Dialect,
        lexicon: &'static Lexicon,
    ) -> Self {
        Self {
            name,
            extensions,
            grammar,
            query,
            strategy,
            dialect,
            lexicon,
            compiled: OnceLock::new(),
        }
    }

    /// The compiled grammar and query, built on first use.
    ///
    /// A query that fails to compile is remembered, so every later file of
    /// this language falls back without retrying.
    pub fn compiled(&self) -> Result<&CompiledGrammar, CompressionError> {
        self.compiled
            .get_or_init(|| {
                let language = (self.grammar)();
                Query::new(&language, self.query)
                    .map(|query| CompiledGrammar { language, query })
                    .map_err(|e| CompressionError::query(self.name, e.to_string()))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn context(&self) -> ClassifyContext<'_> {
        ClassifyContext {
            language: self.name,
            dialect: self.dialect,
            lexicon: self.lexicon,
        }
    }
}

static GLOBAL: LazyLock<GrammarRegistry> = LazyLock::new(GrammarRegistry::builtin);

/// Lookup table from file extension to [`LanguageSpec`].
#[derive(Debug, Default)]
pub struct GrammarRegistry {
    languages: Vec<LanguageSpec>,
    by_extension: HashMap<String, usize>,
}

impl GrammarRegistry {
    /// A registry with no languages.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every language enabled through the `compression-*` features.
    #[allow(unused_mut)]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        #[cfg(feature = "compression-typescript")]
        {
            registry.register(LanguageSpec::new(
                "typescript",
                &["ts", "mts", "cts"],
                || tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
                include_str!("queries/typescript.scm"),
                ParseStrategy::TypeScript,
                &dialect::TYPESCRIPT,
                &lexer::JAVASCRIPT,
            ));
            registry.register(LanguageSpec::new(
                "tsx",
                &["tsx"],
                || tree_sitter_typescript::LANGUAGE_TSX.into(),
                include_str!("queries/typescript.scm"),
                ParseStrategy::TypeScript,
                &dialect::TYPESCRIPT,
                &lexer::JAVASCRIPT,
            ));
        }

        #[cfg(feature = "compression-javascript")]
        registry.register(LanguageSpec::new(
            "javascript",
            &["js", "jsx", "mjs", "cjs"],
            || tree_sitter_javascript::LANGUAGE.into(),
            include_str!("queries/javascript.scm"),
            ParseStrategy::TypeScript,
            &dialect::TYPESCRIPT,
            &lexer::JAVASCRIPT,
        ));

        #[cfg(feature = "compression-python")]
        registry.register(LanguageSpec::new(
            "python",
            &["py", "pyw", "pyi"],
            || tree_sitter_python::LANGUAGE.into(),
            include_str!("queries/python.scm"),
            ParseStrategy::Python,
            &dialect::PYTHON,
            &lexer::PYTHON,
        ));

        #[cfg(feature = "compression-go")]
        registry.register(LanguageSpec::new(
            "go",
            &["go"],
            || tree_sitter_go::LANGUAGE.into(),
            include_str!("queries/go.scm"),
            ParseStrategy::Go,
            &dialect::GO,
            &lexer::GO,
        ));

        #[cfg(feature = "compression-rust")]
        registry.register(LanguageSpec::new(
            "rust",
            &["rs"],
            || tree_sitter_rust::LANGUAGE.into(),
            include_str!("queries/rust.scm"),
            ParseStrategy::Default,
            &dialect::RUST,
            &lexer::RUST,
        ));

        #[cfg(feature = "compression-java")]
        registry.register(LanguageSpec::new(
            "java",
            &["java"],
            || tree_sitter_java::LANGUAGE.into(),
            include_str!("queries/java.scm"),
            ParseStrategy::Default,
            &dialect::JAVA,
            &lexer::C_LIKE,
        ));

        #[cfg(feature = "compression-c")]
        registry.register(LanguageSpec::new(
            "c",
            &["c", "h"],
            || tree_sitter_c::LANGUAGE.into(),
            include_str!("queries/c.scm"),
            ParseStrategy::Default,
            &dialect::C,
            &lexer::C_LIKE,
        ));

        #[cfg(feature = "compression-cpp")]
        registry.register(LanguageSpec::new(
            "cpp",
            &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            || tree_sitter_cpp::LANGUAGE.into(),
            include_str!("queries/cpp.scm"),
            ParseStrategy::Default,
            &dialect::CPP,
            &lexer::C_LIKE,
        ));

        #[cfg(feature = "compression-csharp")]
        registry.register(LanguageSpec::new(
            "csharp",
            &["cs"],
            || tree_sitter_c_sharp::LANGUAGE.into(),
            include_str!("queries/csharp.scm"),
            ParseStrategy::Default,
            &dialect::CSHARP,
            &lexer::C_LIKE,
        ));

        #[cfg(feature = "compression-ruby")]
        registry.register(LanguageSpec::new(
            "ruby",
            &["rb"],
            || tree_sitter_ruby::LANGUAGE.into(),
            include_str!("queries/ruby.scm"),
            ParseStrategy::Default,
            &dialect::RUBY,
            &lexer::RUBY,
        ));

        #[cfg(feature = "compression-php")]
        registry.register(LanguageSpec::new(
            "php",
            &["php"],
            || tree_sitter_php::LANGUAGE_PHP.into(),
            include_str!("queries/php.scm"),
            ParseStrategy::Default,
            &dialect::PHP,
            &lexer::PHP,
        ));

        #[cfg(feature = "compression-css")]
        registry.register(LanguageSpec::new(
            "css",
            &["css"],
            || tree_sitter_css::LANGUAGE.into(),
            include_str!("queries/css.scm"),
            ParseStrategy::Css,
            &dialect::CSS,
            &lexer::CSS,
        ));

        registry
    }

    /// The process-wide registry of built-in languages.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Add a language. Extensions already claimed by an earlier registration
    /// now resolve to this one.
    pub fn register(&mut self, spec: LanguageSpec) {
        let index = self.languages.len();
        for extension in spec.extensions {
            self.by_extension
                .insert(extension.to_ascii_lowercase(), index);
        }
        self.languages.push(spec);
    }

    /// Look up a language by extension, without the leading dot.
    pub fn resolve(&self, extension: &str) -> Option<&LanguageSpec> {
        let index = self.by_extension.get(&extension.to_ascii_lowercase())?;
        self.languages.get(*index)
    }

    pub fn resolve_path(&self, path: &Path) -> Option<&LanguageSpec> {
        self.resolve(path.extension()?.to_str()?)
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageSpec> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Compile every grammar up front, logging the ones that fail.
    ///
    /// Returns the number of languages that compiled.
    pub fn precompile(&self) -> usize {
        let mut ready = 0;
        for spec in &self.languages {
            match spec.compiled() {
                Ok(_) => ready += 1,
                Err(e) => tracing::warn!(language = spec.name, error = %e, "Grammar unavailable"),
            }
        }
        tracing::debug!("Compiled {ready} of {} grammars", self.languages.len());
        ready
    }
}
