//! Path queries over serialized trees and assembly of their results.

pub mod engine;
pub mod errors;
pub mod markup;
pub mod result;

pub use engine::{load_document, Query};
pub use errors::QueryError;
pub use markup::Markup;
pub use result::{assemble, AssembleError, MatchResult};
