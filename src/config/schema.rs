use crate::output::PrintMode;
use crate::ts::SourceLang;
use serde::Deserialize;
use std::fmt;

/// Search defaults read from a config file. Command-line flags override
/// every field.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default)]
    pub print_mode: PrintMode,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_languages")]
    pub languages: Vec<SourceLang>,
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    #[serde(default)]
    pub keep_going: bool,
}

fn default_languages() -> Vec<SourceLang> {
    SourceLang::ALL.to_vec()
}

fn default_jobs() -> usize {
    1
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            print_mode: PrintMode::default(),
            format: None,
            languages: default_languages(),
            jobs: default_jobs(),
            keep_going: false,
        }
    }
}

impl SearchConfig {
    /// Fields whose value differs from the built-in defaults.
    pub fn overridden_fields(&self) -> Vec<&'static str> {
        let defaults = Self::default();
        let mut fields = Vec::new();
        if self.print_mode != defaults.print_mode {
            fields.push("print_mode");
        }
        if self.format != defaults.format {
            fields.push("format");
        }
        if self.languages != defaults.languages {
            fields.push("languages");
        }
        if self.jobs != defaults.jobs {
            fields.push("jobs");
        }
        if self.keep_going != defaults.keep_going {
            fields.push("keep_going");
        }
        fields
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.jobs == 0 {
            issues.push(ValidationIssue::OutOfRange {
                field: "jobs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.languages.is_empty() {
            issues.push(ValidationIssue::MissingField { field: "languages" });
        }
        if self.print_mode == PrintMode::Template {
            match self.format.as_deref() {
                None => issues.push(ValidationIssue::MissingField { field: "format" }),
                Some(format) if format.is_empty() => {
                    issues.push(ValidationIssue::MissingField { field: "format" })
                }
                Some(_) => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingField {
        field: &'static str,
    },
    OutOfRange {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "search config missing required field '{field}'")
            }
            ValidationIssue::OutOfRange { field, message } => {
                write!(f, "search config field '{field}' {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.jobs, 1);
        assert_eq!(config.languages, SourceLang::ALL.to_vec());
    }

    #[test]
    fn collects_every_issue() {
        let config = SearchConfig {
            print_mode: PrintMode::Template,
            format: None,
            languages: Vec::new(),
            jobs: 0,
            keep_going: false,
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.issues.len(), 3);
        assert!(err.to_string().contains("'format'"));
    }

    #[test]
    fn reports_overridden_fields() {
        assert!(SearchConfig::default().overridden_fields().is_empty());

        let config = SearchConfig {
            languages: vec![SourceLang::Go],
            jobs: 8,
            ..SearchConfig::default()
        };
        assert_eq!(config.overridden_fields(), ["languages", "jobs"]);
    }
}
