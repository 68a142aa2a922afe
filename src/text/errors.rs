use thiserror::Error;

/// Failure to recover text or positions for a byte offset.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no source data at byte offset {offset}: end of input")]
    EndOfInput { offset: u64 },

    #[error("byte range [{start}, {end}) exceeds the source")]
    RangeOutOfBounds { start: u64, end: u64 },

    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}
