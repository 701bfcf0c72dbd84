//! Vault information: file statistics plus the effective configuration.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::config::ResolvedConfig;
use crate::journal::JournalError;
use crate::vault::{ScanError, VaultStats};

#[derive(Debug, Error)]
pub enum InfoError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Journal(#[from] JournalError),
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultInfo {
    pub vault_path: String,
    pub config_source: String,
    pub blacklist: Vec<String>,
    pub editor: String,
    pub ident_key: String,
    pub journal_template: String,
    /// Journal note for the reference date, relative to the vault.
    pub journal_path: String,
    pub verbose: bool,
    pub version: String,
    pub stats: VaultStats,
}

impl VaultInfo {
    pub fn gather(config: &ResolvedConfig, today: NaiveDate) -> Result<Self, InfoError> {
        Ok(Self {
            vault_path: config.vault_root.display().to_string(),
            config_source: config.source.to_string(),
            blacklist: config.exclusions.clone(),
            editor: config.editor.clone(),
            ident_key: config.ident_key.clone(),
            journal_template: config.journal_template.as_str().to_string(),
            journal_path: format!("{}.md", config.journal_template.format(today)?),
            verbose: config.verbose,
            version: crate::version().to_string(),
            stats: VaultStats::collect(&config.vault_root)?,
        })
    }

    /// Human-readable summary.
    pub fn to_text(&self) -> String {
        let stats = &self.stats;
        let mut out = String::from("Obsidian Vault Information:\n");
        let _ = writeln!(out, "- Path: {}", self.vault_path);
        let _ = writeln!(out, "- Total files: {}", stats.files.count);
        let _ = writeln!(out, "- Markdown files: {}", stats.markdown_files);
        let _ = writeln!(out, "- Total size: {}", format_size(stats.files.bytes));
        let _ = writeln!(out, "- Total directories: {}", stats.directories);
        if stats.extensions.is_empty() {
            out.push_str("- File types: no files found\n");
        } else {
            out.push_str("- File types by extension:\n");
            for (ext, tally) in &stats.extensions {
                let ext = if ext.is_empty() { "(none)" } else { ext.as_str() };
                let _ = writeln!(
                    out,
                    "  - {ext}: {} files ({})",
                    tally.count,
                    format_size(tally.bytes)
                );
            }
        }
        let _ = writeln!(out, "- Blacklist: {}", self.blacklist.join(", "));
        let _ = writeln!(out, "- Editor: {}", self.editor);
        let _ = writeln!(out, "- Identifier key: {}", self.ident_key);
        let _ = writeln!(out, "- Journal template: {}", self.journal_template);
        let _ = writeln!(out, "- Journal path: {}", self.journal_path);
        let _ = writeln!(out, "- Config: {}", self.config_source);
        let _ = write!(out, "- Version: {}", self.version);
        out
    }
}

/// Byte count with a binary unit, e.g. `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}
