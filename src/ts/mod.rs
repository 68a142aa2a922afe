//! Tree-sitter integration: the source parser collaborator.
//!
//! Turns raw text into a syntax tree with absolute byte offsets per node,
//! rejects trees with syntax errors, and drives the enter/leave traversal
//! the tree converter consumes.

pub mod errors;
pub mod lang;
pub mod parser;
pub mod walk;

pub use errors::TreeSitterError;
pub use lang::{LiteralKind, NodeClass, SourceLang};
pub use parser::{ParsedSource, SourceParser};
pub use walk::{walk, Visit, Walk};
