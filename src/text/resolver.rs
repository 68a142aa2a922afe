use crate::text::{enclosing_line, read_exact_at, LineIndex, Position, ReadAt, ResolveError};

/// Maps byte offsets of one file back to positions and source text.
///
/// Positions come from the line table; lines and excerpts are recovered with
/// positional reads against the source, one read pass per request.
pub struct PositionResolver<'a, R: ReadAt + ?Sized> {
    file: &'a str,
    source: &'a R,
    lines: &'a LineIndex,
}

impl<'a, R: ReadAt + ?Sized> PositionResolver<'a, R> {
    pub fn new(file: &'a str, source: &'a R, lines: &'a LineIndex) -> Self {
        Self {
            file,
            source,
            lines,
        }
    }

    /// Position of `offset`, or `None` if it lies past the end of the text.
    pub fn resolve(&self, offset: u64) -> Option<Position> {
        let offset = usize::try_from(offset).ok()?;
        let (line, column) = self.lines.line_column(offset)?;
        Some(Position {
            file: self.file.to_string(),
            line,
            column,
        })
    }

    /// Full text of the line containing `offset`.
    pub fn enclosing_line(&self, offset: u64) -> Result<String, ResolveError> {
        let line = enclosing_line(self.source, offset)?;
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Exact source text of `[start, end)`.
    pub fn excerpt(&self, start: u64, end: u64) -> Result<String, ResolveError> {
        let len = usize::try_from(end.saturating_sub(start))
            .map_err(|_| ResolveError::RangeOutOfBounds { start, end })?;
        let mut buf = vec![0u8; len];
        read_exact_at(self.source, &mut buf, start).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ResolveError::RangeOutOfBounds { start, end }
            } else {
                ResolveError::Io(e)
            }
        })?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "foo bar baz\nhello world";

    #[test]
    fn resolves_position_and_line() {
        let lines = LineIndex::new(TEXT.as_bytes());
        let resolver = PositionResolver::new("demo.go", TEXT, &lines);

        let pos = resolver.resolve(16).unwrap();
        assert_eq!(pos.to_string(), "demo.go:2:5");
        assert_eq!(resolver.enclosing_line(16).unwrap(), "hello world");
        assert_eq!(resolver.excerpt(12, 17).unwrap(), "hello");
    }

    #[test]
    fn excerpt_past_end_is_out_of_bounds() {
        let lines = LineIndex::new(TEXT.as_bytes());
        let resolver = PositionResolver::new("demo.go", TEXT, &lines);

        assert!(matches!(
            resolver.excerpt(20, 40),
            Err(ResolveError::RangeOutOfBounds { start: 20, end: 40 })
        ));
        assert!(resolver.resolve(99).is_none());
    }

    #[test]
    fn empty_excerpt_is_empty() {
        let lines = LineIndex::new(TEXT.as_bytes());
        let resolver = PositionResolver::new("demo.go", TEXT, &lines);
        assert_eq!(resolver.excerpt(4, 4).unwrap(), "");
    }
}
