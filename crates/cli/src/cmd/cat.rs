use obsidian_core::config::ResolvedConfig;
use obsidian_core::note::note_content;
use obsidian_core::resolve_note;
use tracing::debug;

use crate::CatArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: &CatArgs) -> Result<(), CliError> {
    let path = resolve_note(&args.target.note, &config.vault_root)?;
    debug!(path = %path.display(), show_frontmatter = args.show_frontmatter, "cat");
    print!("{}", note_content(&path, args.show_frontmatter)?);
    Ok(())
}
