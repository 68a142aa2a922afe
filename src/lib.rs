//! astpath: structural path queries over source code
//!
//! Source files are parsed with tree-sitter, re-expressed as a generic
//! tagged tree, serialized as a markup document and queried with XPath.
//! Every match is mapped back to the exact source text it spans.
//!
//! # Architecture
//!
//! Data flows strictly forward, one file at a time:
//!
//! 1. [`ts`] parses text into a syntax tree with byte offsets per node.
//! 2. [`tree`] converts the syntax tree into a [`tree::TaggedTree`] and
//!    serializes it, byte ranges included as `pos-start` / `pos-end`.
//! 3. [`query`] evaluates a compiled path expression against the document.
//! 4. [`text`] recovers positions, lines and excerpts by random access.
//! 5. [`query::assemble`] bundles each hit into a [`MatchResult`].
//!
//! [`search`] drives the pipeline over many files, in order or in parallel.
//!
//! # Example
//!
//! ```no_run
//! use astpath::{query_source, SourceLang};
//!
//! let hits = query_source(
//!     "package main\n\nvar ok = a != b\n",
//!     "main.go",
//!     SourceLang::Go,
//!     "//BinaryExpression[@op='!=']",
//! )?;
//! for hit in &hits {
//!     println!("{:?}", hit.source_excerpt);
//! }
//! # Ok::<(), astpath::SearchError>(())
//! ```

pub mod config;
pub mod discover;
pub mod logging;
pub mod output;
pub mod pool;
pub mod query;
pub mod search;
pub mod text;
pub mod tree;
pub mod ts;

pub use discover::{discover_files, DiscoverError};
pub use output::{render, OutputError, PrintMode, Template};
pub use query::{MatchResult, Query, QueryError};
pub use search::{find_all, query_source, search_files, SearchError, SearchOptions, SearchReport};
pub use text::{Position, PositionResolver, ReadAt, ResolveError};
pub use tree::{TaggedNode, TaggedTree};
pub use ts::SourceLang;
