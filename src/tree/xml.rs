//! Tagged tree to markup document.
//!
//! Elements are named after tags, scalar attributes become markup
//! attributes, and byte ranges become `pos-start` / `pos-end`.

use crate::tree::errors::SerializeError;
use crate::tree::node::{TaggedNode, TaggedTree};
use quick_xml::events::attributes::Attribute as XmlAttribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;

pub const POS_START: &str = "pos-start";
pub const POS_END: &str = "pos-end";

/// Rendering order of attribute names: scalar attributes in extraction
/// order, then the byte range.
const ATTRIBUTE_ORDER: [&str; 8] = ["name", "kind", "value", "op", "dir", "text", POS_START, POS_END];

/// Position of `name` in the rendering order; unknown names sort last.
pub(crate) fn attribute_rank(name: &str) -> usize {
    ATTRIBUTE_ORDER
        .iter()
        .position(|known| *known == name)
        .unwrap_or(ATTRIBUTE_ORDER.len())
}

enum Step<'a> {
    Open(&'a TaggedNode),
    Close(&'a TaggedNode),
}

/// Serialize the tree's single top-level unit as a complete document,
/// declaration included. The synthetic root is not rendered.
pub fn to_xml(tree: &TaggedTree) -> Result<String, SerializeError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut writer, tree.unit())?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Write one subtree without a declaration.
pub fn write_node(
    writer: &mut Writer<Vec<u8>>,
    node: &TaggedNode,
) -> Result<(), SerializeError> {
    let mut stack = vec![Step::Open(node)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(node) => {
                let start = start_tag(node);
                if node.children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    stack.push(Step::Close(node));
                    stack.extend(node.children.iter().rev().map(Step::Open));
                }
            }
            Step::Close(node) => {
                writer.write_event(Event::End(BytesEnd::new(&*node.tag)))?;
            }
        }
    }

    Ok(())
}

fn start_tag(node: &TaggedNode) -> BytesStart<'_> {
    let mut start = BytesStart::new(&*node.tag);
    for attr in &node.attributes {
        push_escaped(&mut start, attr.name, &attr.value);
    }
    if let Some(range) = node.range {
        push_escaped(&mut start, POS_START, &range.start.to_string());
        push_escaped(&mut start, POS_END, &range.end.to_string());
    }
    start
}

/// Push an attribute whose value is escaped here rather than by quick-xml.
pub(crate) fn push_escaped(start: &mut BytesStart<'_>, name: &str, value: &str) {
    let escaped = escape_attribute(value).into_owned().into_bytes();
    start.push_attribute(XmlAttribute {
        key: QName(name.as_bytes()),
        value: Cow::Owned(escaped),
    });
}

/// Escape an attribute value so it loads back unchanged.
///
/// Besides the five markup characters, tabs and line breaks become character
/// references (attribute-value normalization would turn them into spaces),
/// and characters XML 1.0 cannot carry become U+FFFD.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    let needs_work = value
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\'' | '\t' | '\n' | '\r') || !is_xml_char(c));
    if !needs_work {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if !is_xml_char(c) => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// XML 1.0 `Char` production (surrogates cannot occur in a `char`).
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}
