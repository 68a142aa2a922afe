use crate::query::errors::QueryError;
use crate::query::markup;
use crate::text::{Position, PositionResolver, ReadAt, ResolveError};
use crate::tree::{ByteRange, POS_END, POS_START};
use serde::Serialize;
use sxd_xpath::nodeset::Node;
use thiserror::Error;

/// One query hit.
///
/// The markup fields are always present. The derived fields are only filled
/// when the matched element carries a usable byte range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub file: String,
    pub outer_markup: String,
    pub inner_markup: String,
    pub is_root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_range: Option<ByteRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error(transparent)]
    Markup(#[from] QueryError),

    #[error("cannot recover source text: {0}")]
    Position(#[from] ResolveError),
}

/// Build the result for one matched node.
pub fn assemble<R: ReadAt + ?Sized>(
    node: &Node<'_>,
    resolver: &PositionResolver<'_, R>,
    file: &str,
) -> Result<MatchResult, AssembleError> {
    let markup = markup::render(node)?;
    let mut result = MatchResult {
        file: file.to_string(),
        outer_markup: markup.outer,
        inner_markup: markup.inner,
        is_root: markup.is_root,
        byte_range: None,
        source_excerpt: None,
        line_excerpt: None,
        position: None,
    };

    let Some((start, end)) = byte_range(node) else {
        return Ok(result);
    };

    let position = resolver.resolve(start);
    let line = match resolver.enclosing_line(start) {
        Ok(line) => line,
        // a zero-width node at the very end of the text sits on an empty line
        Err(ResolveError::EndOfInput { .. }) if start == end && position.is_some() => String::new(),
        Err(e) => return Err(e.into()),
    };
    let excerpt = match resolver.excerpt(start, end) {
        Ok(excerpt) => excerpt,
        Err(ResolveError::RangeOutOfBounds { .. }) => {
            tracing::debug!(start, end, "byte range exceeds the source");
            return Ok(result);
        }
        Err(e) => return Err(e.into()),
    };

    result.position = position;
    result.line_excerpt = Some(line);
    result.source_excerpt = Some(excerpt);
    result.byte_range = Some(ByteRange {
        start: start as usize,
        end: end as usize,
    });
    Ok(result)
}

/// The `pos-start` / `pos-end` pair of an element match, if usable.
fn byte_range(node: &Node<'_>) -> Option<(u64, u64)> {
    let Node::Element(element) = node else {
        return None;
    };

    let parse = |name: &str| -> Option<u64> {
        let raw = element.attribute_value(name);
        match raw.map(str::parse::<u64>) {
            Some(Ok(value)) => Some(value),
            Some(Err(_)) => {
                tracing::debug!(attribute = name, value = ?raw, "non-numeric position attribute");
                None
            }
            None => {
                tracing::debug!(attribute = name, "missing position attribute");
                None
            }
        }
    };

    let start = parse(POS_START)?;
    let end = parse(POS_END)?;
    if start > end {
        tracing::debug!(start, end, "inverted byte range");
        return None;
    }
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::engine::{load_document, Query};
    use crate::text::LineIndex;

    const SOURCE: &str = "x := a != b\ny := 2\n";

    fn assemble_all(doc: &str, expression: &str) -> Result<Vec<MatchResult>, AssembleError> {
        let package = load_document(doc).unwrap();
        let document = package.as_document();
        let nodes = Query::compile(expression).unwrap().select(&document).unwrap();

        let lines = LineIndex::new(SOURCE.as_bytes());
        let resolver = PositionResolver::new("m.go", SOURCE, &lines);
        nodes
            .iter()
            .map(|node| assemble(node, &resolver, "m.go"))
            .collect()
    }

    #[test]
    fn element_match_carries_derived_fields() {
        let doc = r#"<Block pos-start="0" pos-end="19"><BinaryExpression op="!=" pos-start="5" pos-end="11"/></Block>"#;
        let results = assemble_all(doc, "//BinaryExpression").unwrap();

        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.source_excerpt.as_deref(), Some("a != b"));
        assert_eq!(hit.line_excerpt.as_deref(), Some("x := a != b"));
        assert_eq!(hit.position.as_ref().unwrap().to_string(), "m.go:1:6");
        assert_eq!(hit.byte_range, Some(ByteRange { start: 5, end: 11 }));
        assert!(!hit.is_root);
    }

    #[test]
    fn second_line_positions() {
        let doc = r#"<Block><IntLiteral kind="INT" value="2" pos-start="17" pos-end="18"/></Block>"#;
        let hit = &assemble_all(doc, "//IntLiteral").unwrap()[0];
        assert_eq!(hit.position.as_ref().unwrap().line, 2);
        assert_eq!(hit.line_excerpt.as_deref(), Some("y := 2"));
        assert_eq!(hit.source_excerpt.as_deref(), Some("2"));
    }

    #[test]
    fn unusable_ranges_omit_derived_fields() {
        let doc = r#"<Block><A pos-start="3"/><B pos-start="x" pos-end="4"/><C pos-start="9" pos-end="2"/></Block>"#;
        let results = assemble_all(doc, "//A | //B | //C").unwrap();

        assert_eq!(results.len(), 3);
        for hit in &results {
            assert!(hit.byte_range.is_none());
            assert!(hit.source_excerpt.is_none());
            assert!(hit.line_excerpt.is_none());
            assert!(hit.position.is_none());
            assert!(!hit.outer_markup.is_empty());
        }
    }

    #[test]
    fn unreadable_start_is_an_error() {
        let doc = r#"<Block><A pos-start="50" pos-end="60"/></Block>"#;
        assert!(matches!(
            assemble_all(doc, "//A"),
            Err(AssembleError::Position(ResolveError::EndOfInput { offset: 50 }))
        ));
    }

    #[test]
    fn end_past_input_omits_derived_fields() {
        let doc = r#"<Block><A pos-start="12" pos-end="90"/></Block>"#;
        let hit = &assemble_all(doc, "//A").unwrap()[0];
        assert!(hit.byte_range.is_none());
        assert!(hit.source_excerpt.is_none());
        assert!(hit.line_excerpt.is_none());
        assert!(hit.position.is_none());
        assert_eq!(hit.outer_markup, r#"<A pos-start="12" pos-end="90"/>"#);
    }

    #[test]
    fn zero_width_range_at_end_is_an_empty_line() {
        let doc = r#"<Block><A pos-start="19" pos-end="19"/></Block>"#;
        let hit = &assemble_all(doc, "//A").unwrap()[0];
        assert_eq!(hit.line_excerpt.as_deref(), Some(""));
        assert_eq!(hit.source_excerpt.as_deref(), Some(""));
        assert_eq!(hit.position.as_ref().unwrap().to_string(), "m.go:3:1");

        let doc = r#"<Block><A pos-start="50" pos-end="50"/></Block>"#;
        assert!(matches!(
            assemble_all(doc, "//A"),
            Err(AssembleError::Position(ResolveError::EndOfInput { offset: 50 }))
        ));
    }

    #[test]
    fn root_match_has_no_range() {
        let doc = r#"<Block pos-start="0" pos-end="19"/>"#;
        let hit = &assemble_all(doc, "/").unwrap()[0];
        assert!(hit.is_root);
        assert!(hit.position.is_none());
    }

    #[test]
    fn serializes_without_absent_fields() {
        let doc = r#"<Block><A/></Block>"#;
        let hit = &assemble_all(doc, "//A").unwrap()[0];
        let json = serde_json::to_value(hit).unwrap();
        assert_eq!(json["outer_markup"], "<A/>");
        assert!(json.get("position").is_none());
    }
}
