//! Supported source languages.
//!
//! Grammars come from ast-grep-language's built-in set. Each language also
//! carries the node-kind classification used for attribute extraction.

use ast_grep_language::{LanguageExt, SupportLang};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tree_sitter::Language;

/// A source language astpath can parse and convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceLang {
    Go,
    Rust,
}

/// Attribute-bearing category of a named node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// No scalar attributes beyond tag and range.
    Plain,
    /// Exposes `name`.
    Identifier,
    /// Exposes `kind` (the label carried here) and the decoded `value`.
    Literal(LiteralKind),
    /// Exposes `op`.
    Operator,
    /// Exposes `dir`.
    Channel,
    /// Exposes `text`.
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Imag,
    Char,
    String,
    Bool,
}

impl LiteralKind {
    pub fn label(self) -> &'static str {
        match self {
            LiteralKind::Int => "INT",
            LiteralKind::Float => "FLOAT",
            LiteralKind::Imag => "IMAG",
            LiteralKind::Char => "CHAR",
            LiteralKind::String => "STRING",
            LiteralKind::Bool => "BOOL",
        }
    }
}

impl SourceLang {
    pub const ALL: [SourceLang; 2] = [SourceLang::Go, SourceLang::Rust];

    pub fn name(self) -> &'static str {
        match self {
            SourceLang::Go => "go",
            SourceLang::Rust => "rust",
        }
    }

    /// File extensions (without the dot) handled by this language.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SourceLang::Go => &["go"],
            SourceLang::Rust => &["rs"],
        }
    }

    /// Pick a language from a file extension, restricted to `enabled`.
    pub fn from_path(path: &Path, enabled: &[SourceLang]) -> Option<SourceLang> {
        let ext = path.extension()?.to_str()?;
        enabled
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&ext))
    }

    pub fn ts_language(self) -> Language {
        match self {
            SourceLang::Go => SupportLang::Go.get_ts_language(),
            SourceLang::Rust => SupportLang::Rust.get_ts_language(),
        }
    }

    /// Classify a named node kind for attribute extraction.
    pub fn node_class(self, kind: &str) -> NodeClass {
        self.classified_kinds()
            .iter()
            .find(|(name, _)| *name == kind)
            .map_or(NodeClass::Plain, |&(_, class)| class)
    }

    /// Every named kind carrying attributes; all others are [`NodeClass::Plain`].
    pub fn classified_kinds(self) -> &'static [(&'static str, NodeClass)] {
        match self {
            SourceLang::Go => GO_KINDS,
            SourceLang::Rust => RUST_KINDS,
        }
    }
}

const GO_KINDS: &[(&str, NodeClass)] = &[
    ("identifier", NodeClass::Identifier),
    ("field_identifier", NodeClass::Identifier),
    ("type_identifier", NodeClass::Identifier),
    ("package_identifier", NodeClass::Identifier),
    ("label_name", NodeClass::Identifier),
    ("blank_identifier", NodeClass::Identifier),
    ("true", NodeClass::Identifier),
    ("false", NodeClass::Identifier),
    ("nil", NodeClass::Identifier),
    ("iota", NodeClass::Identifier),
    ("int_literal", NodeClass::Literal(LiteralKind::Int)),
    ("float_literal", NodeClass::Literal(LiteralKind::Float)),
    ("imaginary_literal", NodeClass::Literal(LiteralKind::Imag)),
    ("rune_literal", NodeClass::Literal(LiteralKind::Char)),
    ("interpreted_string_literal", NodeClass::Literal(LiteralKind::String)),
    ("raw_string_literal", NodeClass::Literal(LiteralKind::String)),
    ("binary_expression", NodeClass::Operator),
    ("unary_expression", NodeClass::Operator),
    ("assignment_statement", NodeClass::Operator),
    ("inc_statement", NodeClass::Operator),
    ("dec_statement", NodeClass::Operator),
    ("channel_type", NodeClass::Channel),
    ("comment", NodeClass::Comment),
];

const RUST_KINDS: &[(&str, NodeClass)] = &[
    ("identifier", NodeClass::Identifier),
    ("field_identifier", NodeClass::Identifier),
    ("type_identifier", NodeClass::Identifier),
    ("shorthand_field_identifier", NodeClass::Identifier),
    ("primitive_type", NodeClass::Identifier),
    ("metavariable", NodeClass::Identifier),
    ("integer_literal", NodeClass::Literal(LiteralKind::Int)),
    ("float_literal", NodeClass::Literal(LiteralKind::Float)),
    ("char_literal", NodeClass::Literal(LiteralKind::Char)),
    ("string_literal", NodeClass::Literal(LiteralKind::String)),
    ("raw_string_literal", NodeClass::Literal(LiteralKind::String)),
    ("boolean_literal", NodeClass::Literal(LiteralKind::Bool)),
    ("binary_expression", NodeClass::Operator),
    ("unary_expression", NodeClass::Operator),
    ("compound_assignment_expr", NodeClass::Operator),
    ("assignment_expression", NodeClass::Operator),
    ("range_expression", NodeClass::Operator),
    ("line_comment", NodeClass::Comment),
    ("block_comment", NodeClass::Comment),
];

impl fmt::Display for SourceLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
