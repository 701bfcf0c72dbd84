//! List command implementation.

use obsidian_core::config::ResolvedConfig;
use obsidian_core::list_notes;
use obsidian_core::vault::posix_path;
use tracing::debug;

use crate::error::CliError;

pub fn run(config: &ResolvedConfig) -> Result<(), CliError> {
    debug!(vault = %config.vault_root.display(), exclusions = ?config.exclusions, "ls");
    for path in list_notes(&config.vault_root, &config.exclusions)? {
        println!("{}", posix_path(&path));
    }
    Ok(())
}
