use thiserror::Error;

/// A converted tree does not have the shape the converter guarantees.
///
/// These indicate the converter and the grammar are out of sync; they are
/// never recovered from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("node kind `{kind}` (id {id}) has no tag mapping")]
    UnmappedKind { kind: String, id: u16 },

    #[error("node kind `{kind}` does not yield a valid element name (`{tag}`)")]
    InvalidTag { kind: String, tag: String },

    #[error("failed to convert tree, unexpected number of top-level nodes: {count}")]
    TopLevelCount { count: usize },

    #[error("traversal signals are not properly nested")]
    Unbalanced,
}

/// Failure to render a tagged tree as markup.
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("markup write error: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("markup is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
