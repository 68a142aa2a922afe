//! Markup rendering of matched nodes, with and without their own tag.

use crate::query::errors::QueryError;
use crate::tree::xml::{attribute_rank, escape_attribute, push_escaped};
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use sxd_document::dom::{self, ChildOfElement, ChildOfRoot};
use sxd_xpath::nodeset::Node;

/// Serialized forms of one matched node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub outer: String,
    pub inner: String,
    /// The match is the document itself, which has no enclosing tag.
    pub is_root: bool,
}

pub fn render(node: &Node<'_>) -> Result<Markup, QueryError> {
    let markup = match node {
        Node::Element(element) => Markup {
            outer: render_with(|writer| write_element(writer, *element))?,
            inner: render_with(|writer| {
                for child in element.children() {
                    write_child(writer, child)?;
                }
                Ok(())
            })?,
            is_root: false,
        },
        Node::Root(root) => {
            let inner = render_with(|writer| {
                for child in root.children() {
                    if let ChildOfRoot::Element(element) = child {
                        write_element(writer, element)?;
                    }
                }
                Ok(())
            })?;
            Markup {
                outer: inner.clone(),
                inner,
                is_root: true,
            }
        }
        Node::Attribute(attribute) => {
            let value = escape_attribute(attribute.value()).into_owned();
            Markup {
                outer: format!("{}=\"{}\"", attribute.name().local_part(), value),
                inner: value,
                is_root: false,
            }
        }
        Node::Text(text) => {
            let escaped = escape(text.text()).into_owned();
            Markup {
                outer: escaped.clone(),
                inner: escaped,
                is_root: false,
            }
        }
        // generated documents carry no comments, namespaces or instructions
        _ => Markup {
            outer: String::new(),
            inner: String::new(),
            is_root: false,
        },
    };
    Ok(markup)
}

fn render_with<F>(write: F) -> Result<String, QueryError>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> Result<(), QueryError>,
{
    let mut writer = Writer::new(Vec::new());
    write(&mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_child(writer: &mut Writer<Vec<u8>>, child: ChildOfElement<'_>) -> Result<(), QueryError> {
    match child {
        ChildOfElement::Element(element) => write_element(writer, element),
        ChildOfElement::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text.text())))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

enum Step<'d> {
    Open(dom::Element<'d>),
    Text(dom::Text<'d>),
    Close(String),
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: dom::Element<'_>) -> Result<(), QueryError> {
    let mut stack = vec![Step::Open(element)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(element) => {
                let name = element.name().local_part().to_string();
                let mut start = BytesStart::new(name.clone());
                // the document loader sorts attributes by name
                let mut attributes = element.attributes();
                attributes.sort_by_key(|attribute| attribute_rank(attribute.name().local_part()));
                for attribute in attributes {
                    push_escaped(&mut start, attribute.name().local_part(), attribute.value());
                }

                let children = element.children();
                if children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                    continue;
                }

                writer.write_event(Event::Start(start))?;
                stack.push(Step::Close(name));
                for child in children.into_iter().rev() {
                    match child {
                        ChildOfElement::Element(element) => stack.push(Step::Open(element)),
                        ChildOfElement::Text(text) => stack.push(Step::Text(text)),
                        _ => {}
                    }
                }
            }
            Step::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text.text())))?;
            }
            Step::Close(name) => {
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
    }

    Ok(())
}
