//! Journal command implementation.

use chrono::{Local, NaiveDate};
use obsidian_core::config::ResolvedConfig;
use obsidian_core::note::ensure_file;
use tracing::{debug, info};

use super::edit::edit_and_touch;
use crate::JournalArgs;
use crate::error::CliError;

/// Parse `--date`, which must be an ISO calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| "Invalid --date format. Use ISO format YYYY-MM-DD.".to_string())
}

pub fn run(config: &ResolvedConfig, args: &JournalArgs) -> Result<(), CliError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let path = config.journal_template.path_for(&config.vault_root, date)?;
    debug!(%date, path = %path.display(), "journal");

    if config.verbose {
        println!("Using journal template: {}", config.journal_template.as_str());
        println!("Resolved journal path: {}", path.display());
    }

    if ensure_file(&path)? {
        info!(path = %path.display(), "created journal note");
    }
    edit_and_touch(&config.editor, &path)
}
