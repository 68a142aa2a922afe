//! The per-file pipeline and the multi-file search driver.
//!
//! One file runs parse, convert, serialize, query and assemble in order,
//! synchronously. Files are independent, so the driver can fan them out over
//! a scoped worker pool and merge results back into input order.

use crate::pool::with_parser;
use crate::query::{assemble, load_document, AssembleError, MatchResult, Query, QueryError};
use crate::text::{read_to_end_at, PositionResolver, ReadAt, ResolveError};
use crate::tree::{to_xml, Converter, SerializeError, ShapeError};
use crate::ts::{SourceLang, TreeSitterError};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The expression itself is malformed; raised before any file is read.
    #[error(transparent)]
    Compile(QueryError),

    #[error("{file}: failed to read: {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },

    #[error("{}", parse_message(.file, .source))]
    Parse {
        file: String,
        source: TreeSitterError,
    },

    #[error("{file}: {source}")]
    Shape { file: String, source: ShapeError },

    #[error("{file}: {source}")]
    Serialize {
        file: String,
        source: SerializeError,
    },

    #[error("{file}: {source}")]
    Query { file: String, source: QueryError },

    #[error("{file}: cannot recover source text: {source}")]
    Position { file: String, source: ResolveError },

    #[error("{file}: no supported language for this file")]
    UnsupportedFile { file: String },
}

fn parse_message(file: &str, source: &TreeSitterError) -> String {
    match source {
        TreeSitterError::SyntaxError { .. } => format!("{file}:{source}"),
        other => format!("{file}: {other}"),
    }
}

impl SearchError {
    /// The file the error belongs to, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            SearchError::Compile(_) => None,
            SearchError::Io { file, .. }
            | SearchError::Parse { file, .. }
            | SearchError::Shape { file, .. }
            | SearchError::Serialize { file, .. }
            | SearchError::Query { file, .. }
            | SearchError::Position { file, .. }
            | SearchError::UnsupportedFile { file } => Some(file),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Worker threads; `0` and `1` both mean sequential.
    pub jobs: usize,
    /// Collect per-file failures instead of stopping at the first one.
    pub keep_going: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            keep_going: false,
        }
    }
}

/// Outcome of a multi-file search.
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Matches grouped by file, files in input order.
    pub results: Vec<MatchResult>,
    /// Per-file failures in input order; only filled with `keep_going`.
    pub failures: Vec<SearchError>,
    pub files: usize,
}

impl SearchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run `query` over one source and assemble every match.
///
/// The whole input is read once for the parser; excerpts and enclosing lines
/// are then recovered with positional reads against `source`.
pub fn find_all<R: ReadAt + ?Sized>(
    source: &R,
    file_name: &str,
    lang: SourceLang,
    query: &Query,
) -> Result<Vec<MatchResult>, SearchError> {
    let text = read_to_end_at(source).map_err(|source| SearchError::Io {
        file: file_name.to_string(),
        source,
    })?;

    let parsed = with_parser(lang, |parser| parser.parse_source(text))
        .and_then(|parsed| parsed)
        .map_err(|source| SearchError::Parse {
            file: file_name.to_string(),
            source,
        })?;

    let tree = Converter::for_lang(lang)
        .and_then(|converter| converter.convert_parsed(&parsed))
        .map_err(|source| SearchError::Shape {
            file: file_name.to_string(),
            source,
        })?;
    tracing::debug!(file = file_name, %lang, nodes = tree.node_count(), "converted syntax tree");

    let markup = to_xml(&tree).map_err(|source| SearchError::Serialize {
        file: file_name.to_string(),
        source,
    })?;
    drop(tree);

    let query_error = |source| SearchError::Query {
        file: file_name.to_string(),
        source,
    };
    let package = load_document(&markup).map_err(query_error)?;
    let document = package.as_document();
    let nodes = query.select(&document).map_err(query_error)?;
    tracing::debug!(file = file_name, matches = nodes.len(), "evaluated query");

    let resolver = PositionResolver::new(file_name, source, &parsed.lines);
    nodes
        .iter()
        .map(|node| {
            assemble(node, &resolver, file_name).map_err(|e| match e {
                AssembleError::Markup(source) => query_error(source),
                AssembleError::Position(source) => SearchError::Position {
                    file: file_name.to_string(),
                    source,
                },
            })
        })
        .collect()
}

/// Compile `expression` and run it over in-memory text.
pub fn query_source(
    text: &str,
    file_name: &str,
    lang: SourceLang,
    expression: &str,
) -> Result<Vec<MatchResult>, SearchError> {
    let query = Query::compile(expression).map_err(SearchError::Compile)?;
    find_all(text, file_name, lang, &query)
}

/// Search every file in `paths`, in order.
///
/// The expression is compiled before any file is opened. Without
/// `keep_going`, the first failing file in input order aborts the search
/// and no results are returned.
pub fn search_files(
    paths: &[PathBuf],
    expression: &str,
    options: &SearchOptions,
) -> Result<SearchReport, SearchError> {
    let query = Query::compile(expression).map_err(SearchError::Compile)?;

    let outcomes = if options.jobs <= 1 || paths.len() <= 1 {
        search_sequential(paths, &query, options.keep_going)
    } else {
        // the compiled query stays on this thread; workers build their own
        drop(query);
        search_parallel(paths, expression, options)?
    };

    let mut report = SearchReport {
        files: paths.len(),
        ..SearchReport::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(results) => report.results.extend(results),
            Err(error) if options.keep_going => {
                tracing::warn!(error = %error, "skipping file");
                report.failures.push(error);
            }
            Err(error) => return Err(error),
        }
    }

    tracing::info!(
        files = report.files,
        matches = report.results.len(),
        failures = report.failures.len(),
        "search finished"
    );
    Ok(report)
}

type Outcome = Result<Vec<MatchResult>, SearchError>;

fn search_file(path: &Path, query: &Query) -> Outcome {
    let file_name = path.display().to_string();
    let lang = SourceLang::from_path(path, &SourceLang::ALL).ok_or_else(|| {
        SearchError::UnsupportedFile {
            file: file_name.clone(),
        }
    })?;
    tracing::debug!(file = %file_name, %lang, "searching file");

    let file = File::open(path).map_err(|source| SearchError::Io {
        file: file_name.clone(),
        source,
    })?;
    find_all(&file, &file_name, lang, query)
}

fn search_sequential(paths: &[PathBuf], query: &Query, keep_going: bool) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(paths.len());
    for path in paths {
        let outcome = search_file(path, query);
        let failed = outcome.is_err();
        outcomes.push(outcome);
        if failed && !keep_going {
            break;
        }
    }
    outcomes
}

/// Workers claim file indices from a shared counter, so every index below a
/// failing one has already been claimed and will finish. That keeps the
/// first failure in input order identical to the sequential run.
fn search_parallel(
    paths: &[PathBuf],
    expression: &str,
    options: &SearchOptions,
) -> Result<Vec<Outcome>, SearchError> {
    let next = &AtomicUsize::new(0);
    let failed = &AtomicBool::new(false);
    let workers = options.jobs.min(paths.len());

    let batches = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || -> Result<Vec<(usize, Outcome)>, SearchError> {
                    let query = Query::compile(expression).map_err(SearchError::Compile)?;
                    let mut done = Vec::new();
                    loop {
                        if failed.load(Ordering::Relaxed) && !options.keep_going {
                            break;
                        }
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = paths.get(index) else {
                            break;
                        };
                        let outcome = search_file(path, &query);
                        if outcome.is_err() {
                            failed.store(true, Ordering::Relaxed);
                        }
                        done.push((index, outcome));
                    }
                    Ok(done)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(batch) => batch,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect::<Vec<_>>()
    });

    let mut indexed = Vec::with_capacity(paths.len());
    for batch in batches {
        indexed.extend(batch?);
    }
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, outcome)| outcome).collect())
}
