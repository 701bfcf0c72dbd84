//! Edit command and the editor launcher shared with `new` and `journal`.

use std::path::Path;
use std::process::Command;

use obsidian_core::config::ResolvedConfig;
use obsidian_core::note::touch;
use obsidian_core::resolve_note;
use tracing::debug;

use crate::error::CliError;

pub fn run(config: &ResolvedConfig, note: &str) -> Result<(), CliError> {
    let path = resolve_note(note, &config.vault_root)?;
    edit_and_touch(&config.editor, &path)
}

/// Open `path` in `editor`, then refresh its `modified` field.
pub fn edit_and_touch(editor: &str, path: &Path) -> Result<(), CliError> {
    open_in_editor(editor, path)?;
    touch(path)?;
    Ok(())
}

/// Run `editor` on `path` and wait for it. The editor string may carry
/// arguments, e.g. `code --wait`.
pub fn open_in_editor(editor: &str, path: &Path) -> Result<(), CliError> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(CliError::Usage("editor command is empty".into()));
    };
    debug!(editor, path = %path.display(), "launching editor");

    let status = Command::new(program).args(parts).arg(path).status().map_err(|source| {
        CliError::EditorLaunch { editor: editor.to_string(), path: path.to_path_buf(), source }
    })?;

    if !status.success() {
        return Err(CliError::EditorStatus {
            editor: editor.to_string(),
            path: path.to_path_buf(),
            status,
        });
    }
    Ok(())
}
