//! Thread-local parser pooling.
//!
//! Maintains one reusable parser per language per thread. A parser is created
//! on first use and reused for every later file of that language, so worker
//! threads never share parser state.

use crate::ts::{SourceLang, SourceParser, TreeSitterError};
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

thread_local! {
    static PARSERS: RefCell<HashMap<SourceLang, SourceParser>> = RefCell::new(HashMap::new());
}

/// Execute function with the pooled parser for `lang`.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use astpath::pool::with_parser;
/// use astpath::ts::SourceLang;
///
/// let _parsed = with_parser(SourceLang::Go, |parser| {
///     parser.parse_source(b"package main\n".to_vec())
/// })??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(lang: SourceLang, f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    PARSERS.with(|cell| {
        let mut parsers = cell.borrow_mut();
        let parser = match parsers.entry(lang) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(SourceParser::new(lang)?)
            }
        };
        Ok(f(parser))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_parser_per_language() {
        let go = with_parser(SourceLang::Go, |parser| parser.lang()).unwrap();
        let rust = with_parser(SourceLang::Rust, |parser| parser.lang()).unwrap();
        assert_eq!(go, SourceLang::Go);
        assert_eq!(rust, SourceLang::Rust);

        let parsed = with_parser(SourceLang::Go, |parser| {
            parser.parse_source(b"package main\n".to_vec())
        })
        .unwrap()
        .unwrap();
        assert_eq!(parsed.root_node().kind(), "source_file");
    }
}
