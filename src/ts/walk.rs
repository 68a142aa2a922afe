//! Enter/leave traversal over the named nodes of a tree-sitter tree.
//!
//! Anonymous tokens are skipped together with their subtrees. Every `Enter`
//! is matched by exactly one later `Leave`, and leaves arrive in reverse
//! order of their enters.

use tree_sitter::{Node, TreeCursor};

/// One traversal signal.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'tree> {
    /// A named node is being entered; its children follow.
    Enter(Node<'tree>),
    /// The most recently entered, still open node is done.
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Descend,
    Ascend,
    Done,
}

/// Depth-first iterator of [`Visit`] signals rooted at one node.
pub struct Walk<'tree> {
    cursor: TreeCursor<'tree>,
    depth: usize,
    state: State,
}

/// Walk the named nodes of the subtree rooted at `root`.
///
/// The root itself is always entered, named or not.
pub fn walk(root: Node<'_>) -> Walk<'_> {
    Walk {
        cursor: root.walk(),
        depth: 0,
        state: State::Start,
    }
}

impl<'tree> Walk<'tree> {
    /// Move across siblings until a named node is found, or climb out.
    fn settle(&mut self) -> Option<Visit<'tree>> {
        loop {
            let node = self.cursor.node();
            if node.is_named() {
                self.state = State::Descend;
                return Some(Visit::Enter(node));
            }
            if !self.cursor.goto_next_sibling() {
                self.climb();
                return Some(Visit::Leave);
            }
        }
    }

    fn climb(&mut self) {
        self.cursor.goto_parent();
        self.depth -= 1;
        self.state = State::Ascend;
    }
}

impl<'tree> Iterator for Walk<'tree> {
    type Item = Visit<'tree>;

    fn next(&mut self) -> Option<Visit<'tree>> {
        match self.state {
            State::Start => {
                self.state = State::Descend;
                Some(Visit::Enter(self.cursor.node()))
            }
            State::Descend => {
                if self.cursor.goto_first_child() {
                    self.depth += 1;
                    self.settle()
                } else {
                    self.state = State::Ascend;
                    Some(Visit::Leave)
                }
            }
            State::Ascend => {
                if self.depth == 0 {
                    self.state = State::Done;
                    return None;
                }
                if self.cursor.goto_next_sibling() {
                    self.settle()
                } else {
                    self.climb();
                    Some(Visit::Leave)
                }
            }
            State::Done => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::{SourceLang, SourceParser};

    fn named_preorder(node: Node<'_>, out: &mut Vec<String>) {
        out.push(node.kind().to_string());
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            named_preorder(child, out);
        }
    }

    #[test]
    fn enters_and_leaves_are_balanced() {
        let mut parser = SourceParser::new(SourceLang::Go).unwrap();
        let tree = parser
            .parse(b"package main\n\nfunc f(a, b int) bool { return a != b }\n")
            .unwrap();

        let mut depth = 0i64;
        for visit in walk(tree.root_node()) {
            match visit {
                Visit::Enter(_) => depth += 1,
                Visit::Leave => {
                    depth -= 1;
                    assert!(depth >= 0, "leave without matching enter");
                }
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn enters_follow_named_preorder() {
        let mut parser = SourceParser::new(SourceLang::Rust).unwrap();
        let tree = parser
            .parse(b"fn main() { let x = 1 + 2; // done\n}")
            .unwrap();

        let entered: Vec<String> = walk(tree.root_node())
            .filter_map(|visit| match visit {
                Visit::Enter(node) => Some(node.kind().to_string()),
                Visit::Leave => None,
            })
            .collect();

        let mut expected = Vec::new();
        named_preorder(tree.root_node(), &mut expected);
        assert_eq!(entered, expected);
    }

    #[test]
    fn leaf_root_yields_one_pair() {
        let mut parser = SourceParser::new(SourceLang::Rust).unwrap();
        let tree = parser.parse(b"").unwrap();

        let visits: Vec<Visit<'_>> = walk(tree.root_node()).collect();
        assert_eq!(visits.len(), 2);
        assert!(matches!(visits[0], Visit::Enter(_)));
        assert!(matches!(visits[1], Visit::Leave));
    }
}
