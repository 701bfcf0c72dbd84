//! Find command implementation.

use obsidian_core::config::ResolvedConfig;
use obsidian_core::query::search;
use obsidian_core::vault::VaultScanner;
use tracing::{debug, info};

use crate::FindArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: &FindArgs) -> Result<(), CliError> {
    debug!(term = %args.term, exact = args.exact, "find");

    let scanner =
        VaultScanner::new(&config.vault_root, &config.exclusions).verbose(config.verbose);
    let result = search(&scanner, &args.term, args.exact)?;
    if !result.skipped.is_empty() && !config.verbose {
        info!(skipped = result.skipped.len(), "notes with unreadable frontmatter were skipped");
    }

    if result.notes.is_empty() {
        eprintln!("No files found matching '{}'", args.term);
        return Ok(());
    }

    for note in &result.notes {
        println!("{}", note.display_path());
        if config.verbose
            && let Some(title) = note.metadata.get("title")
        {
            println!("  title: {title}");
        }
    }
    Ok(())
}
