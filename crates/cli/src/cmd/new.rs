//! New command implementation.

use std::io::{self, IsTerminal, Read};

use obsidian_core::config::ResolvedConfig;
use obsidian_core::note::{create_note, note_path};
use tracing::debug;

use super::edit::edit_and_touch;
use crate::NewArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: &NewArgs) -> Result<(), CliError> {
    let stdin = io::stdin();
    let piped = !stdin.is_terminal();
    let content = if piped {
        let mut buf = String::new();
        stdin.lock().read_to_string(&mut buf).map_err(|e| CliError::io("failed to read stdin", e))?;
        if config.verbose {
            println!("Using content from stdin");
        }
        Some(buf)
    } else {
        None
    };

    let target = note_path(&config.vault_root, &args.note)?;
    if args.force && target.exists() && config.verbose {
        println!("Overwriting existing file: {}", target.display());
    }
    debug!(path = %target.display(), piped, force = args.force, "new");

    let path = create_note(
        &config.vault_root,
        &args.note,
        content.as_deref(),
        &config.ident_key,
        args.force,
    )?;
    if config.verbose {
        println!("Created new file: {}", path.display());
    }

    if !piped {
        edit_and_touch(&config.editor, &path)?;
    }
    Ok(())
}
