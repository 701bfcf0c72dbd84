use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::{config_dir, home_dir};
use shellexpand::full;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::types::{
    ConfigFile, ConfigSource, DEFAULT_BLACKLIST, DEFAULT_EDITOR, DEFAULT_IDENT_KEY,
    LoggingConfig, Overrides, ResolvedConfig,
};
use crate::journal::{DEFAULT_JOURNAL_TEMPLATE, JournalError, JournalTemplate};

const APP_DIR: &str = "obsidian-cli";
const LOCAL_CONFIG: &str = ".obsidian-cli.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("home directory not available to expand '{0}'")]
    NoHome(String),

    #[error("no vault configured (use --vault, OBSIDIAN_VAULT or `vault` in the config file)")]
    NoVault,

    #[error("vault directory {} does not exist", .0.display())]
    VaultMissing(PathBuf),

    #[error("vault path {} is not a directory", .0.display())]
    VaultNotDirectory(PathBuf),

    #[error("vault directory {} is not accessible: {source}", path.display())]
    VaultInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("blacklist entry {0} is empty")]
    EmptyExclusion(usize),

    #[error("invalid journal_template: {0}")]
    Journal(#[from] JournalError),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Locate, read and resolve the configuration.
    pub fn load(overrides: &Overrides) -> Result<ResolvedConfig, ConfigError> {
        let (file, source) = match Self::find_config_file(overrides.config.as_deref())? {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                (Self::read_file(&path)?, ConfigSource::File(path))
            }
            None => {
                info!("no config file found, using defaults");
                (ConfigFile::default(), ConfigSource::Defaults)
            }
        };
        Self::resolve(file, source, overrides)
    }

    /// The explicit path if given (it must exist), else the first existing
    /// file among [`config_search_paths`].
    pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Ok(Some(path.to_path_buf()));
        }
        Ok(config_search_paths().into_iter().find(|p| p.is_file()))
    }

    pub fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let s = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;
        toml::from_str(&s).map_err(|e| ConfigError::ParseError(path.display().to_string(), e))
    }

    /// Merge `file` with `overrides` and validate the result.
    pub fn resolve(
        file: ConfigFile,
        source: ConfigSource,
        overrides: &Overrides,
    ) -> Result<ResolvedConfig, ConfigError> {
        let vault = match (&overrides.vault, &file.vault) {
            (Some(path), _) => path.clone(),
            (None, Some(raw)) => expand_path(raw)?,
            (None, None) => return Err(ConfigError::NoVault),
        };
        let vault_root = validate_vault(&vault)?;

        let exclusions = overrides
            .blacklist
            .clone()
            .or(file.blacklist)
            .unwrap_or_else(|| DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect());
        if let Some(idx) = exclusions.iter().position(|e| e.is_empty()) {
            return Err(ConfigError::EmptyExclusion(idx));
        }

        let journal_template = JournalTemplate::parse(
            file.journal_template.as_deref().unwrap_or(DEFAULT_JOURNAL_TEMPLATE),
        )?;

        let logging = match file.logging.file {
            Some(ref path) => LoggingConfig {
                file: Some(expand_path(&path.to_string_lossy())?),
                ..file.logging.clone()
            },
            None => file.logging,
        };

        Ok(ResolvedConfig {
            vault_root,
            exclusions,
            editor: overrides
                .editor
                .clone()
                .or(file.editor)
                .unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
            ident_key: file.ident_key.unwrap_or_else(|| DEFAULT_IDENT_KEY.to_string()),
            journal_template,
            verbose: overrides.verbose || file.verbose.unwrap_or(false),
            logging,
            source,
        })
    }
}

/// Candidate config files, in lookup order.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        paths.push(Path::new(&xdg).join(APP_DIR).join("config.toml"));
    }
    if let Some(dir) = config_dir() {
        paths.push(dir.join(APP_DIR).join("config.toml"));
    }
    if let Some(home) = home_dir() {
        paths.push(home.join(".config").join(APP_DIR).join("config.toml"));
    }
    let mut seen = Vec::with_capacity(paths.len());
    paths.retain(|p| {
        let fresh = !seen.contains(p);
        seen.push(p.clone());
        fresh
    });
    paths
}

fn validate_vault(path: &Path) -> Result<PathBuf, ConfigError> {
    let meta = fs::metadata(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::VaultMissing(path.to_path_buf()),
        _ => ConfigError::VaultInaccessible { path: path.to_path_buf(), source },
    })?;
    if !meta.is_dir() {
        return Err(ConfigError::VaultNotDirectory(path.to_path_buf()));
    }
    path.canonicalize()
        .map_err(|source| ConfigError::VaultInaccessible { path: path.to_path_buf(), source })
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome(input.to_string()))?;
    Ok(PathBuf::from(expanded.to_string()))
}
