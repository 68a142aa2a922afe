use crate::text::LineIndex;
use crate::ts::errors::TreeSitterError;
use crate::ts::lang::SourceLang;
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper bound to one source language.
pub struct SourceParser {
    parser: Parser,
    lang: SourceLang,
}

impl SourceParser {
    pub fn new(lang: SourceLang) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&lang.ts_language())
            .map_err(|_| TreeSitterError::LanguageSet { lang })?;

        Ok(Self { parser, lang })
    }

    pub fn lang(&self) -> SourceLang {
        self.lang
    }

    /// Parse source bytes into a tree-sitter Tree, which may contain ERROR nodes.
    pub fn parse(&mut self, source: &[u8]) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse source and reject trees with syntax errors.
    ///
    /// The returned [`ParsedSource`] owns the text together with its line
    /// table, so later stages can resolve positions without reparsing.
    pub fn parse_source(&mut self, source: Vec<u8>) -> Result<ParsedSource, TreeSitterError> {
        let tree = self.parse(&source)?;
        let parsed = ParsedSource {
            lines: LineIndex::new(&source),
            source,
            tree,
            lang: self.lang,
        };

        if let Some(error) = parsed.error_nodes().into_iter().next() {
            return Err(TreeSitterError::SyntaxError {
                line: error.start_point.row + 1,
                column: error.start_point.column + 1,
                byte_start: error.byte_start,
                byte_end: error.byte_end,
                detail: error.detail,
            });
        }

        Ok(parsed)
    }
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource {
    pub source: Vec<u8>,
    pub tree: Tree,
    pub lines: LineIndex,
    pub lang: SourceLang,
}

impl ParsedSource {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Get all ERROR and MISSING nodes in the tree, in source order.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }
}

/// Information about an ERROR or MISSING node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub detail: String,
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        let detail = if node.is_missing() {
            format!("syntax error: missing `{}`", node.kind())
        } else {
            "syntax error".to_string()
        };
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            detail,
        });
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_go() {
        let mut parser = SourceParser::new(SourceLang::Go).unwrap();
        let parsed = parser
            .parse_source(b"package main\n\nfunc main() {}\n".to_vec())
            .unwrap();

        assert!(!parsed.has_errors());
        assert_eq!(parsed.root_node().kind(), "source_file");
    }

    #[test]
    fn parse_valid_rust() {
        let mut parser = SourceParser::new(SourceLang::Rust).unwrap();
        let parsed = parser
            .parse_source(b"fn main() { println!(\"hello\"); }".to_vec())
            .unwrap();

        assert_eq!(parsed.root_node().kind(), "source_file");
        assert_eq!(parsed.lang, SourceLang::Rust);
    }

    #[test]
    fn syntax_error_is_rejected() {
        let mut parser = SourceParser::new(SourceLang::Go).unwrap();
        let result = parser.parse_source(b"package main\n\nfunc main( {\n".to_vec());

        assert!(matches!(
            result,
            Err(TreeSitterError::SyntaxError { line, .. }) if line >= 1
        ));
    }

    #[test]
    fn raw_parse_keeps_error_nodes() {
        let mut parser = SourceParser::new(SourceLang::Rust).unwrap();
        let tree = parser.parse(b"fn main( { }").unwrap();

        assert!(tree.root_node().has_error());
    }
}
