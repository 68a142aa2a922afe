use crate::tree::attributes;
use crate::tree::errors::ShapeError;
use crate::tree::node::{ByteRange, TaggedNode, TaggedTree};
use crate::tree::tags::TagTable;
use crate::ts::{walk, ParsedSource, SourceLang, Visit};
use tree_sitter::Node;

/// Converts syntax trees of one language into tagged trees.
pub struct Converter<'a> {
    lang: SourceLang,
    tags: &'a TagTable,
}

impl<'a> Converter<'a> {
    pub fn new(tags: &'a TagTable) -> Self {
        Self {
            lang: tags.lang(),
            tags,
        }
    }

    /// Shared converter for `lang`.
    pub fn for_lang(lang: SourceLang) -> Result<Converter<'static>, ShapeError> {
        Ok(Converter::new(TagTable::for_lang(lang)?))
    }

    pub fn convert_parsed(&self, parsed: &ParsedSource) -> Result<TaggedTree, ShapeError> {
        self.convert(parsed.root_node(), &parsed.source)
    }

    /// Convert the subtree at `root`; `source` is the text it was parsed from.
    ///
    /// One depth-first pass: each enter pushes a new open node, each leave
    /// closes the top node into its parent.
    pub fn convert(&self, root: Node<'_>, source: &[u8]) -> Result<TaggedTree, ShapeError> {
        let mut open = vec![TaggedNode::document()];

        for visit in walk(root) {
            match visit {
                Visit::Enter(node) => open.push(TaggedNode {
                    tag: self.tags.tag(node)?,
                    attributes: attributes::extract(self.lang, node, source),
                    children: Vec::new(),
                    range: Some(ByteRange::from(node.byte_range())),
                }),
                Visit::Leave => {
                    let done = open.pop().ok_or(ShapeError::Unbalanced)?;
                    open.last_mut()
                        .ok_or(ShapeError::Unbalanced)?
                        .children
                        .push(done);
                }
            }
        }

        let document = match open.pop() {
            Some(document) if open.is_empty() && document.range.is_none() => document,
            _ => return Err(ShapeError::Unbalanced),
        };
        if document.children.len() != 1 {
            return Err(ShapeError::TopLevelCount {
                count: document.children.len(),
            });
        }

        Ok(TaggedTree::from_document(document))
    }
}
