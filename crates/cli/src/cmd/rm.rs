use dialoguer::Confirm;
use obsidian_core::config::ResolvedConfig;
use obsidian_core::note::remove_note;
use obsidian_core::resolve_note;

use crate::RmArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: &RmArgs) -> Result<(), CliError> {
    let path = resolve_note(&args.target.note, &config.vault_root)?;

    let confirmed = args.force
        || Confirm::new()
            .with_prompt(format!("Are you sure you want to delete '{}'?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| CliError::Failed(format!("confirmation failed: {e}")))?;
    if !confirmed {
        println!("Operation cancelled.");
        return Ok(());
    }

    remove_note(&path)?;
    println!("File removed: {}", path.display());
    Ok(())
}
