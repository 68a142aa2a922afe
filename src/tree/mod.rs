//! Syntax tree to tagged tree conversion and markup serialization.
//!
//! A [`TaggedTree`] is the parser-agnostic form of one parsed unit: every
//! named syntax node becomes a node with a tag, ordered scalar attributes,
//! ordered children and its byte range. The serializer renders it as the
//! markup document the query engine loads.

pub mod attributes;
pub mod convert;
pub mod errors;
pub mod node;
pub mod tags;
pub mod unquote;
pub mod xml;

pub use convert::Converter;
pub use errors::{SerializeError, ShapeError};
pub use node::{Attribute, ByteRange, TaggedNode, TaggedTree};
pub use tags::TagTable;
pub use xml::{to_xml, POS_END, POS_START};
