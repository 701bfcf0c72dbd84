use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::journal::JournalTemplate;

/// Exclusions used when neither file, environment nor flag supplies any.
pub const DEFAULT_BLACKLIST: &[&str] = &["Assets/", ".obsidian/", ".git/"];
pub const DEFAULT_IDENT_KEY: &str = "uid";
pub const DEFAULT_EDITOR: &str = "vi";

/// On-disk TOML configuration. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub vault: Option<String>,
    #[serde(alias = "ignored_directories")]
    pub blacklist: Option<Vec<String>>,
    pub editor: Option<String>,
    pub ident_key: Option<String>,
    pub journal_template: Option<String>,
    pub verbose: Option<bool>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Values supplied on the command line or through the environment. They take
/// precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Explicit config file; must exist when given.
    pub config: Option<PathBuf>,
    pub vault: Option<PathBuf>,
    pub blacklist: Option<Vec<String>>,
    pub editor: Option<String>,
    /// Only ever raises verbosity.
    pub verbose: bool,
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("(defaults)"),
        }
    }
}

/// Fully resolved configuration, built once and passed to every command.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Canonical, existing directory.
    pub vault_root: PathBuf,
    pub exclusions: Vec<String>,
    pub editor: String,
    pub ident_key: String,
    pub journal_template: JournalTemplate,
    pub verbose: bool,
    pub logging: LoggingConfig,
    pub source: ConfigSource,
}
