//! Meta command implementation.

use obsidian_core::config::ResolvedConfig;
use obsidian_core::frontmatter::{self, FieldValue};
use obsidian_core::note::{get_metadata, set_metadata};
use obsidian_core::resolve_note;
use tracing::debug;

use crate::MetaArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: &MetaArgs) -> Result<(), CliError> {
    let path = resolve_note(&args.target.note, &config.vault_root)?;
    debug!(path = %path.display(), key = ?args.key, value = ?args.value, "meta");

    match (&args.key, &args.value) {
        (None, _) => {
            let metadata = frontmatter::read(&path)?.metadata();
            if metadata.is_empty() {
                eprintln!("No frontmatter metadata found for this page");
            }
            for (key, value) in metadata.iter() {
                println!("{key}: {value}");
            }
        }
        (Some(key), None) => {
            let value = get_metadata(&path, key)?;
            println!("{key}: {value}");
        }
        (Some(key), Some(value)) => {
            set_metadata(&path, key, FieldValue::String(value.clone()))?;
            if config.verbose {
                println!("Updated '{key}': '{value}' in {}", path.display());
            }
        }
    }
    Ok(())
}
