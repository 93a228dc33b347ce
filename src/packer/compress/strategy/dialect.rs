// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-language surface syntax used when cutting signatures and blocks.

use regex::Regex;
use std::sync::LazyLock;

/// How a function or class body is introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    /// `{` (C family, Go, Rust, JavaScript, PHP, CSS)
    Brace,
    /// `:` at the end of the header (Python)
    Colon,
    /// End of the header line (Ruby)
    LineEnd,
}

#[derive(Debug)]
pub struct Dialect {
    pub name: &'static str,
    pub body: BodyStyle,
    /// `=>` may introduce a body (arrow functions, expression-bodied members).
    pub arrow_bodies: bool,
    /// `<...>` brackets generic parameters in headers.
    pub angle_generics: bool,
    /// Functions may share a name with different parameter lists, so the name
    /// alone does not identify a declaration.
    pub overloading: bool,
    /// Characters that open the body of a block declaration.
    pub block_openers: &'static [char],
    /// Line prefixes of annotations, decorators and attributes that belong to
    /// the declaration below them.
    pub annotation_prefixes: &'static [&'static str],
    /// Line-level patterns with a `name` group and an optional `owner` group.
    pub function_names: Vec<Regex>,
    /// Lines that open a scope owning the declarations indented below them.
    pub owner_pattern: Option<Regex>,
    /// Identifiers a call-shaped pattern must never report as a name.
    pub keywords: &'static [&'static str],
}

impl Dialect {
    /// Whether `line` is an annotation, decorator or attribute line.
    pub fn is_annotation(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        self.annotation_prefixes
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
    }
}

/// Compile a list of static patterns.
///
/// The patterns are literals checked by the tests in this module.
fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|source| Regex::new(source).expect("static dialect pattern is invalid"))
        .collect()
}

fn owner(source: &str) -> Option<Regex> {
    Some(Regex::new(source).expect("static owner pattern is invalid"))
}

const C_KEYWORDS: &[&str] = &[
    "if",
    "else",
    "elif",
    "for",
    "foreach",
    "while",
    "do",
    "switch",
    "case",
    "return",
    "sizeof",
    "alignof",
    "decltype",
    "typeof",
    "nameof",
    "catch",
    "new",
    "throw",
    "using",
    "lock",
    "defined",
    "static_assert",
    "synchronized",
];

const C_FAMILY_NAME: &str = r"(?P<name>~?[A-Za-z_]\w*(?:::~?[A-Za-z_]\w*)*)\s*(?:<[^()<>]*>)?\s*\(";
const C_FAMILY_OWNER: &str =
    r"^[^;]*\b(?:class|interface|enum|record|struct|trait|namespace)\s+([A-Za-z_]\w*)[^;]*$";

pub static TYPESCRIPT: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "typescript",
    body: BodyStyle::Brace,
    arrow_bodies: true,
    angle_generics: true,
    overloading: false,
    block_openers: &['{'],
    annotation_prefixes: &["@"],
    function_names: patterns(&[
        r"\bfunction\b\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)",
        r"\b(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)",
        r"^\s*(?:(?:public|private|protected|static|readonly|abstract|override|async|declare|get|set|accessor)\s+)*\*?\s*(?P<name>#?[A-Za-z_$][\w$]*)\s*[?!]?\s*[<(=:]",
    ]),
    owner_pattern: owner(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?:class|interface|namespace|module|function)\s*\*?\s*([A-Za-z_$][\w$]*)",
    ),
    keywords: &["if", "for", "while", "switch", "return", "catch", "typeof"],
});

pub static PYTHON: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "python",
    body: BodyStyle::Colon,
    arrow_bodies: false,
    angle_generics: false,
    overloading: false,
    block_openers: &[],
    annotation_prefixes: &["@"],
    function_names: patterns(&[r"^\s*(?:async\s+)?def\s+(?P<name>[A-Za-z_]\w*)"]),
    owner_pattern: owner(r"^\s*(?:async\s+)?(?:class|def)\s+([A-Za-z_]\w*)"),
    keywords: &[],
});

pub static GO: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "go",
    body: BodyStyle::Brace,
    arrow_bodies: false,
    angle_generics: false,
    overloading: false,
    block_openers: &['(', '{'],
    annotation_prefixes: &[],
    function_names: patterns(&[
        r"^\s*func\s+(?:\(\s*(?:[A-Za-z_]\w*\s+)?\*?\s*(?P<owner>[A-Za-z_]\w*)(?:\[[^\]]*\])?\s*\)\s*)?(?P<name>[A-Za-z_]\w*)",
    ]),
    owner_pattern: None,
    keywords: &[],
});

pub static RUST: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "rust",
    body: BodyStyle::Brace,
    arrow_bodies: false,
    angle_generics: true,
    overloading: false,
    block_openers: &['{'],
    annotation_prefixes: &["#["],
    function_names: patterns(&[r"\bfn\s+(?P<name>[A-Za-z_]\w*)"]),
    owner_pattern: owner(
        r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?(?:(impl\b[^{]*)|trait\s+([A-Za-z_]\w*))",
    ),
    keywords: &[],
});

pub static JAVA: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "java",
    body: BodyStyle::Brace,
    arrow_bodies: false,
    angle_generics: true,
    overloading: true,
    block_openers: &['{'],
    annotation_prefixes: &["@"],
    function_names: patterns(&[C_FAMILY_NAME]),
    owner_pattern: owner(C_FAMILY_OWNER),
    keywords: C_KEYWORDS,
});

pub static C: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "c",
    body: BodyStyle::Brace,
    arrow_bodies: false,
    angle_generics: false,
    overloading: false,
    block_openers: &['{'],
    annotation_prefixes: &["__attribute__"],
    function_names: patterns(&[C_FAMILY_NAME]),
    owner_pattern: None,
    keywords: C_KEYWORDS,
});

pub static CPP: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "cpp",
    body: BodyStyle::Brace,
    arrow_bodies: false,
    angle_generics: true,
    overloading: true,
    block_openers: &['{'],
    annotation_prefixes: &["template", "[["],
    function_names: patterns(&[C_FAMILY_NAME]),
    owner_pattern: owner(C_FAMILY_OWNER),
    keywords: C_KEYWORDS,
});

pub static CSHARP: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "csharp",
    body: BodyStyle::Brace,
    arrow_bodies: true,
    angle_generics: true,
    overloading: true,
    block_openers: &['{'],
    annotation_prefixes: &["["],
    function_names: patterns(&[C_FAMILY_NAME]),
    owner_pattern: owner(C_FAMILY_OWNER),
    keywords: C_KEYWORDS,
});

pub static PHP: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "php",
    body: BodyStyle::Brace,
    arrow_bodies: false,
    angle_generics: false,
    overloading: false,
    block_openers: &['{'],
    annotation_prefixes: &["#["],
    function_names: patterns(&[r"\bfunction\s+&?\s*(?P<name>[A-Za-z_]\w*)"]),
    owner_pattern: owner(r"^[^;]*\b(?:class|interface|trait|enum)\s+([A-Za-z_]\w*)[^;]*$"),
    keywords: &[],
});

pub static RUBY: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "ruby",
    body: BodyStyle::LineEnd,
    arrow_bodies: false,
    angle_generics: false,
    overloading: false,
    block_openers: &[],
    annotation_prefixes: &[],
    function_names: patterns(&[r"^\s*def\s+(?:self\.)?(?P<name>[^\s(;]+)"]),
    owner_pattern: owner(r"^\s*(?:class|module)\s+([A-Z][\w:]*)"),
    keywords: &[],
});

pub static CSS: LazyLock<Dialect> = LazyLock::new(|| Dialect {
    name: "css",
    body: BodyStyle::Brace,
    arrow_bodies: false,
    angle_generics: false,
    overloading: false,
    block_openers: &['{'],
    annotation_prefixes: &[],
    function_names: Vec::new(),
    owner_pattern: None,
    keywords: &[],
});
