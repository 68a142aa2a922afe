use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("invalid query `{expression}`: {message}")]
    Compile { expression: String, message: String },

    #[error("failed to load markup document: {message}")]
    Document { message: String },

    #[error("query evaluation failed: {message}")]
    Evaluate { message: String },

    #[error("query `{expression}` does not select nodes (it yields a {kind})")]
    NotNodeset {
        expression: String,
        kind: &'static str,
    },

    #[error("markup render error: {0}")]
    Render(#[from] quick_xml::Error),

    #[error("rendered markup is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
