use crate::tree::node::Attribute;
use crate::tree::unquote::literal_value;
use crate::ts::{NodeClass, SourceLang};
use tree_sitter::Node;

/// Scalar attributes for one named node, in rendering order.
pub fn extract(lang: SourceLang, node: Node<'_>, source: &[u8]) -> Vec<Attribute> {
    match lang.node_class(node.kind()) {
        NodeClass::Plain => Vec::new(),
        NodeClass::Identifier => vec![Attribute::new("name", node_text(node, source))],
        NodeClass::Literal(kind) => {
            let raw = node_text(node, source);
            vec![
                Attribute::new("kind", kind.label()),
                Attribute::new("value", literal_value(lang, kind, &raw)),
            ]
        }
        NodeClass::Operator => operator(node)
            .map(|op| vec![Attribute::new("op", op)])
            .unwrap_or_default(),
        NodeClass::Channel => vec![Attribute::new("dir", channel_dir(node))],
        NodeClass::Comment => vec![Attribute::new("text", node_text(node, source))],
    }
}

fn node_text(node: Node<'_>, source: &[u8]) -> String {
    String::from_utf8_lossy(&source[node.byte_range()]).into_owned()
}

/// Operator token: the `operator` field when the grammar names one, else the
/// first anonymous punctuation child.
fn operator(node: Node<'_>) -> Option<&'static str> {
    if let Some(op) = node.child_by_field_name("operator") {
        return Some(op.kind());
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| !child.is_named())
        .map(|child| child.kind())
        .find(|kind| is_operator_token(kind));
    found
}

fn is_operator_token(kind: &str) -> bool {
    !kind.is_empty()
        && kind.chars().all(|c| c.is_ascii_punctuation())
        && !matches!(kind, "(" | ")" | "[" | "]" | "{" | "}" | "," | ";" | ":" | "\"" | "'")
}

/// Direction of a Go channel type: `<-chan T` receives, `chan<- T` sends.
fn channel_dir(node: Node<'_>) -> &'static str {
    let mut cursor = node.walk();
    let tokens: Vec<&str> = node
        .children(&mut cursor)
        .filter(|child| !child.is_named())
        .map(|child| child.kind())
        .take(2)
        .collect();

    match tokens.as_slice() {
        ["<-", "chan", ..] => "recv",
        ["chan", "<-", ..] => "send",
        _ => "both",
    }
}
