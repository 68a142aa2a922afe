use crate::config::schema::{SearchConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "ASTPATH_CONFIG";

/// Where the search config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named with `--config`.
    Flag(PathBuf),
    /// Named by `ASTPATH_CONFIG`.
    Env(PathBuf),
    /// Handed over as text, with no file behind it.
    Inline,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Flag(path) | ConfigSource::Env(path) => Some(path),
            ConfigSource::Inline => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Flag(path) => write!(f, "--config {}", path.display()),
            ConfigSource::Env(path) => write!(f, "${CONFIG_ENV} ({})", path.display()),
            ConfigSource::Inline => f.write_str("inline config"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read search config from {origin}: {source}")]
    Io {
        origin: ConfigSource,
        source: std::io::Error,
    },

    #[error("malformed search config in {origin}: {source}")]
    Toml {
        origin: ConfigSource,
        source: toml_edit::de::Error,
    },

    #[error("invalid search config in {origin}: {source}")]
    Validation {
        origin: ConfigSource,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn origin(&self) -> &ConfigSource {
        match self {
            ConfigError::Io { origin, .. }
            | ConfigError::Toml { origin, .. }
            | ConfigError::Validation { origin, .. } => origin,
        }
    }
}

pub fn load_from_str(input: &str) -> Result<SearchConfig, ConfigError> {
    parse(input, ConfigSource::Inline)
}

/// Load a config file named on the command line.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<SearchConfig, ConfigError> {
    load(ConfigSource::Flag(path.as_ref().to_path_buf()))
}

/// The config file to use: `explicit`, else `ASTPATH_CONFIG` when set and
/// non-empty.
pub fn locate_config(explicit: Option<&Path>) -> Option<ConfigSource> {
    match explicit {
        Some(path) => Some(ConfigSource::Flag(path.to_path_buf())),
        None => std::env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(|value| ConfigSource::Env(PathBuf::from(value))),
    }
}

/// Load the located config, or the defaults when there is none.
pub fn load_or_default(explicit: Option<&Path>) -> Result<SearchConfig, ConfigError> {
    match locate_config(explicit) {
        Some(origin) => load(origin),
        None => Ok(SearchConfig::default()),
    }
}

fn load(origin: ConfigSource) -> Result<SearchConfig, ConfigError> {
    let Some(path) = origin.path() else {
        return Ok(SearchConfig::default());
    };
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(source) => return Err(ConfigError::Io { origin, source }),
    };
    parse(&contents, origin)
}

fn parse(input: &str, origin: ConfigSource) -> Result<SearchConfig, ConfigError> {
    let config: SearchConfig = match toml_edit::de::from_str(input) {
        Ok(config) => config,
        Err(source) => return Err(ConfigError::Toml { origin, source }),
    };
    if let Err(source) = config.validate() {
        return Err(ConfigError::Validation { origin, source });
    }

    tracing::debug!(
        %origin,
        overrides = ?config.overridden_fields(),
        "loaded search config"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PrintMode;
    use crate::ts::SourceLang;

    #[test]
    fn parses_full_config() {
        let config = load_from_str(
            r#"
print_mode = "template"
format = "{position}: {source}"
languages = ["go"]
jobs = 4
keep_going = true
"#,
        )
        .unwrap();

        assert_eq!(config.print_mode, PrintMode::Template);
        assert_eq!(config.format.as_deref(), Some("{position}: {source}"));
        assert_eq!(config.languages, vec![SourceLang::Go]);
        assert_eq!(config.jobs, 4);
        assert!(config.keep_going);
    }

    #[test]
    fn empty_input_uses_defaults() {
        assert_eq!(load_from_str("").unwrap(), SearchConfig::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = load_from_str("colour = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { origin: ConfigSource::Inline, .. }));
        assert!(err.to_string().starts_with("malformed search config in inline config"));
    }

    #[test]
    fn validation_errors_name_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("astpath.toml");
        fs::write(&path, "jobs = 0\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert_eq!(err.origin(), &ConfigSource::Flag(path.clone()));
        let message = err.to_string();
        assert!(message.starts_with("invalid search config in --config "));
        assert!(message.contains("'jobs'"));
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let origin = locate_config(Some(Path::new("mine.toml")));
        assert_eq!(origin, Some(ConfigSource::Flag(PathBuf::from("mine.toml"))));
    }

    #[test]
    fn environment_origin_is_named() {
        let origin = ConfigSource::Env(PathBuf::from("/etc/astpath.toml"));
        assert_eq!(origin.to_string(), "$ASTPATH_CONFIG (/etc/astpath.toml)");
        assert_eq!(origin.path(), Some(Path::new("/etc/astpath.toml")));
        assert_eq!(ConfigSource::Inline.path(), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_or_default(Some(Path::new("/nonexistent/astpath.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { origin: ConfigSource::Flag(_), .. }));
    }
}
