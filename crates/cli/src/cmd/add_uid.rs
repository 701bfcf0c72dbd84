use obsidian_core::config::ResolvedConfig;
use obsidian_core::note::add_uid;
use obsidian_core::resolve_note;

use crate::AddUidArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: &AddUidArgs) -> Result<(), CliError> {
    let path = resolve_note(&args.target.note, &config.vault_root)?;
    let uid = add_uid(&path, &config.ident_key, args.force)?;
    if config.verbose {
        println!("Generated new UUID: {uid}");
    }
    Ok(())
}
