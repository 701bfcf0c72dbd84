//! Configuration file discovery and resolution.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, config_search_paths};
pub use types::{
    ConfigFile, ConfigSource, DEFAULT_BLACKLIST, DEFAULT_EDITOR, DEFAULT_IDENT_KEY,
    LoggingConfig, Overrides, ResolvedConfig,
};
