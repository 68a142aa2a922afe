pub mod loader;
pub mod schema;

pub use loader::{
    load_from_path, load_from_str, load_or_default, locate_config, ConfigError, ConfigSource,
    CONFIG_ENV,
};
pub use schema::{SearchConfig, ValidationError, ValidationIssue};
