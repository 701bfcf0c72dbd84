//! Command failures and their exit codes.

use std::io;
use std::path::PathBuf;

use obsidian_core::config::ConfigError;
use obsidian_core::frontmatter::ReadError;
use obsidian_core::info::InfoError;
use obsidian_core::journal::JournalError;
use obsidian_core::note::NoteError;
use obsidian_core::query::{FormatError, QueryError};
use obsidian_core::vault::{NoteNotFound, ScanError};
use thiserror::Error;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_CONFIG: u8 = 11;
pub const EXIT_NOT_FOUND: u8 = 12;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    NotFound(#[from] NoteNotFound),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Note(NoteError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Info(#[from] InfoError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error("failed to launch editor '{editor}' for {}: {source}", path.display())]
    EditorLaunch {
        editor: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("editor '{editor}' exited with {status} while editing {}", path.display())]
    EditorStatus { editor: String, path: PathBuf, status: std::process::ExitStatus },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Failed(String),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::NotFound(_) => EXIT_NOT_FOUND,
            Self::Usage(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}

impl From<NoteError> for CliError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::NotFound(missing) => Self::NotFound(missing),
            other => Self::Note(other),
        }
    }
}

impl From<QueryError> for CliError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Usage(msg) => Self::Usage(msg),
            QueryError::Scan(e) => Self::Scan(e),
            QueryError::Format(e) => Self::Format(e),
        }
    }
}
