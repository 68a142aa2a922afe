use serde::Serialize;
use std::sync::Arc;

/// Tag of the synthetic container wrapping a converted unit.
pub const DOCUMENT_TAG: &str = "AST";

/// Half-open `[start, end)` byte offsets into the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl From<std::ops::Range<usize>> for ByteRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// One scalar attribute of a tagged node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Generic representation of one syntax-tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedNode {
    pub tag: Arc<str>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<TaggedNode>,
    /// Absent only on the synthetic document root.
    pub range: Option<ByteRange>,
}

impl TaggedNode {
    pub(crate) fn document() -> Self {
        Self {
            tag: Arc::from(DOCUMENT_TAG),
            attributes: Vec::new(),
            children: Vec::new(),
            range: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Nodes of this subtree in pre-order, starting with `self`.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }
}

pub struct Preorder<'a> {
    stack: Vec<&'a TaggedNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a TaggedNode;

    fn next(&mut self) -> Option<&'a TaggedNode> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Converted tree of one parsed unit: a synthetic root holding exactly one
/// top-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTree {
    root: TaggedNode,
}

impl TaggedTree {
    /// Callers guarantee `root` holds exactly one child.
    pub(crate) fn from_document(root: TaggedNode) -> Self {
        debug_assert_eq!(root.children.len(), 1);
        Self { root }
    }

    /// The synthetic root.
    pub fn document(&self) -> &TaggedNode {
        &self.root
    }

    /// The single real top-level node.
    pub fn unit(&self) -> &TaggedNode {
        &self.root.children[0]
    }

    /// Number of nodes, the synthetic root included.
    pub fn node_count(&self) -> usize {
        self.root.preorder().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tag: &str, start: usize, end: usize) -> TaggedNode {
        TaggedNode {
            tag: Arc::from(tag),
            attributes: Vec::new(),
            children: Vec::new(),
            range: Some(ByteRange { start, end }),
        }
    }

    #[test]
    fn preorder_visits_parents_before_children() {
        let mut file = leaf("File", 0, 10);
        let mut call = leaf("Call", 0, 5);
        call.children.push(leaf("Ident", 0, 3));
        file.children.push(call);
        file.children.push(leaf("Lit", 6, 10));

        let mut document = TaggedNode::document();
        document.children.push(file);
        let tree = TaggedTree::from_document(document);

        let tags: Vec<&str> = tree.document().preorder().map(|n| &*n.tag).collect();
        assert_eq!(tags, ["AST", "File", "Call", "Ident", "Lit"]);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(&*tree.unit().tag, "File");
        assert!(tree.document().range.is_none());
    }

    #[test]
    fn attribute_lookup() {
        let mut node = leaf("BinaryExpression", 0, 6);
        node.attributes.push(Attribute::new("op", "!="));
        assert_eq!(node.attribute("op"), Some("!="));
        assert_eq!(node.attribute("name"), None);
    }
}
