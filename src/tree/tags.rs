//! Total node-kind to tag mapping.
//!
//! Every named, visible kind in a grammar's symbol table gets a tag: the kind
//! name in UpperCamelCase. Tables are built once per language and shared.

use crate::tree::errors::ShapeError;
use crate::ts::SourceLang;
use heck::ToUpperCamelCase;
use std::sync::{Arc, OnceLock};
use tree_sitter::Node;

static GO_TAGS: OnceLock<Result<TagTable, ShapeError>> = OnceLock::new();
static RUST_TAGS: OnceLock<Result<TagTable, ShapeError>> = OnceLock::new();

#[derive(Debug)]
pub struct TagTable {
    lang: SourceLang,
    tags: Vec<Option<Arc<str>>>,
}

impl TagTable {
    /// Build the table for `lang`, failing if any named kind cannot be tagged.
    pub fn new(lang: SourceLang) -> Result<Self, ShapeError> {
        let language = lang.ts_language();
        let mut tags = Vec::with_capacity(language.node_kind_count());

        for id in (0..language.node_kind_count()).filter_map(|i| u16::try_from(i).ok()) {
            let tag = match language.node_kind_for_id(id) {
                Some(kind)
                    if language.node_kind_is_named(id) && language.node_kind_is_visible(id) =>
                {
                    Some(derive_tag(kind)?)
                }
                _ => None,
            };
            tags.push(tag);
        }

        Ok(Self { lang, tags })
    }

    /// Shared table for `lang`.
    pub fn for_lang(lang: SourceLang) -> Result<&'static TagTable, ShapeError> {
        let cell = match lang {
            SourceLang::Go => &GO_TAGS,
            SourceLang::Rust => &RUST_TAGS,
        };
        cell.get_or_init(|| TagTable::new(lang))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn lang(&self) -> SourceLang {
        self.lang
    }

    /// Tag for a node; an unmapped kind is fatal.
    pub fn tag(&self, node: Node<'_>) -> Result<Arc<str>, ShapeError> {
        let id = node.kind_id();
        self.tags
            .get(usize::from(id))
            .and_then(Option::as_ref)
            .cloned()
            .ok_or_else(|| ShapeError::UnmappedKind {
                kind: node.kind().to_string(),
                id,
            })
    }

    /// Number of kinds carrying a tag.
    pub fn len(&self) -> usize {
        self.tags.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn derive_tag(kind: &str) -> Result<Arc<str>, ShapeError> {
    let tag = kind.to_upper_camel_case();
    if is_element_name(&tag) {
        Ok(Arc::from(tag))
    } else {
        Err(ShapeError::InvalidTag {
            kind: kind.to_string(),
            tag,
        })
    }
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
