//! Rendering of match results for the command line.

use crate::query::MatchResult;
use serde::Deserialize;
use std::fmt::Write as _;
use thiserror::Error;

/// How each match is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PrintMode {
    /// `file:line:column > excerpt`
    #[default]
    Source,
    /// `file:line:column > enclosing line`
    SourceLine,
    XmlInner,
    XmlOuter,
    /// One serialized result per line.
    Json,
    /// Free-form text from `--format`.
    Template,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("no source position for node")]
    MissingPosition,

    #[error("cannot print outer of root")]
    OuterOfRoot,

    #[error("template print mode requires a format")]
    MissingTemplate,

    #[error("unknown placeholder `{{{name}}}` in format")]
    UnknownPlaceholder { name: String },

    #[error("unterminated placeholder in format at byte {offset}")]
    UnterminatedPlaceholder { offset: usize },

    #[error("unmatched `}}` in format at byte {offset}")]
    UnmatchedBrace { offset: usize },

    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    File,
    Line,
    Column,
    Position,
    Source,
    LineText,
    Xml,
    XmlInner,
    Start,
    End,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "file" => Field::File,
            "line" => Field::Line,
            "column" => Field::Column,
            "position" => Field::Position,
            "source" => Field::Source,
            "line_text" => Field::LineText,
            "xml" => Field::Xml,
            "xml_inner" => Field::XmlInner,
            "start" => Field::Start,
            "end" => Field::End,
            _ => return None,
        };
        Some(field)
    }

    fn write(self, out: &mut String, result: &MatchResult) {
        let position = result.position.as_ref();
        let range = result.byte_range.as_ref();
        // fmt::Write for String cannot fail
        let _ = match self {
            Field::File => write!(out, "{}", result.file),
            Field::Line => match position {
                Some(p) => write!(out, "{}", p.line),
                None => Ok(()),
            },
            Field::Column => match position {
                Some(p) => write!(out, "{}", p.column),
                None => Ok(()),
            },
            Field::Position => match position {
                Some(p) => write!(out, "{p}"),
                None => Ok(()),
            },
            Field::Source => write!(out, "{}", result.source_excerpt.as_deref().unwrap_or("")),
            Field::LineText => write!(out, "{}", result.line_excerpt.as_deref().unwrap_or("")),
            Field::Xml => write!(out, "{}", result.outer_markup),
            Field::XmlInner => write!(out, "{}", result.inner_markup),
            Field::Start => match range {
                Some(r) => write!(out, "{}", r.start),
                None => Ok(()),
            },
            Field::End => match range {
                Some(r) => write!(out, "{}", r.end),
                None => Ok(()),
            },
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed `--format` string.
///
/// `{name}` inserts a result field, `{{` and `}}` are literal braces. Fields
/// a result does not have render as nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(format: &str) -> Result<Self, OutputError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|&(_, next)| next) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, c)) => name.push(c),
                            None => return Err(OutputError::UnterminatedPlaceholder { offset }),
                        }
                    }
                    let field = Field::from_name(&name)
                        .ok_or(OutputError::UnknownPlaceholder { name })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' if chars.peek().map(|&(_, next)| next) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(OutputError::UnmatchedBrace { offset }),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, result: &MatchResult) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => field.write(&mut out, result),
            }
        }
        out
    }
}

/// Render one result in `mode`. `template` is required for
/// [`PrintMode::Template`] and ignored otherwise.
pub fn render(
    result: &MatchResult,
    mode: PrintMode,
    template: Option<&Template>,
) -> Result<String, OutputError> {
    match mode {
        PrintMode::Source => {
            let (position, excerpt) = result
                .position
                .as_ref()
                .zip(result.source_excerpt.as_deref())
                .ok_or(OutputError::MissingPosition)?;
            Ok(format!("{position} > {excerpt}"))
        }
        PrintMode::SourceLine => {
            let (position, line) = result
                .position
                .as_ref()
                .zip(result.line_excerpt.as_deref())
                .ok_or(OutputError::MissingPosition)?;
            Ok(format!("{position} > {line}"))
        }
        PrintMode::XmlInner => Ok(result.inner_markup.clone()),
        PrintMode::XmlOuter => {
            if result.is_root {
                return Err(OutputError::OuterOfRoot);
            }
            Ok(result.outer_markup.clone())
        }
        PrintMode::Json => Ok(serde_json::to_string(result)?),
        PrintMode::Template => {
            let template = template.ok_or(OutputError::MissingTemplate)?;
            Ok(template.render(result))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Position;
    use crate::tree::ByteRange;

    fn hit() -> MatchResult {
        MatchResult {
            file: "main.go".to_string(),
            outer_markup: r#"<BinaryExpression op="!="/>"#.to_string(),
            inner_markup: String::new(),
            is_root: false,
            byte_range: Some(ByteRange { start: 18, end: 24 }),
            source_excerpt: Some("a != b".to_string()),
            line_excerpt: Some("\tif a != b {".to_string()),
            position: Some(Position {
                file: "main.go".to_string(),
                line: 4,
                column: 5,
            }),
        }
    }

    fn bare(is_root: bool) -> MatchResult {
        MatchResult {
            file: "main.go".to_string(),
            outer_markup: "<SourceFile/>".to_string(),
            inner_markup: "<SourceFile/>".to_string(),
            is_root,
            byte_range: None,
            source_excerpt: None,
            line_excerpt: None,
            position: None,
        }
    }

    #[test]
    fn source_modes() {
        assert_eq!(render(&hit(), PrintMode::Source, None).unwrap(), "main.go:4:5 > a != b");
        assert_eq!(
            render(&hit(), PrintMode::SourceLine, None).unwrap(),
            "main.go:4:5 > \tif a != b {"
        );
        assert!(matches!(
            render(&bare(false), PrintMode::Source, None),
            Err(OutputError::MissingPosition)
        ));
    }

    #[test]
    fn outer_of_root_is_an_error() {
        assert!(matches!(
            render(&bare(true), PrintMode::XmlOuter, None),
            Err(OutputError::OuterOfRoot)
        ));
        assert_eq!(
            render(&bare(true), PrintMode::XmlInner, None).unwrap(),
            "<SourceFile/>"
        );
    }

    #[test]
    fn json_mode() {
        let line = render(&hit(), PrintMode::Json, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["source_excerpt"], "a != b");
        assert_eq!(value["position"]["line"], 4);
        assert_eq!(value["byte_range"]["start"], 18);
    }

    #[test]
    fn template_fields_and_braces() {
        let template = Template::parse("{{{file}}} {line}:{column} [{start},{end}) {source}").unwrap();
        assert_eq!(template.render(&hit()), "{main.go} 4:5 [18,24) a != b");
        assert_eq!(
            render(&bare(false), PrintMode::Template, Some(&template)).unwrap(),
            "{main.go} : [,) "
        );
    }

    #[test]
    fn template_errors() {
        assert!(matches!(
            Template::parse("{nope}"),
            Err(OutputError::UnknownPlaceholder { name }) if name == "nope"
        ));
        assert!(matches!(
            Template::parse("abc {file"),
            Err(OutputError::UnterminatedPlaceholder { offset: 4 })
        ));
        assert!(matches!(
            Template::parse("a } b"),
            Err(OutputError::UnmatchedBrace { offset: 2 })
        ));
        assert!(matches!(
            render(&hit(), PrintMode::Template, None),
            Err(OutputError::MissingTemplate)
        ));
    }
}
