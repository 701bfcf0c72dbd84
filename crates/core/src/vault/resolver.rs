//! Resolution of user-supplied note references to files.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// No candidate for a note reference exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("note '{reference}' not found in vault {}", vault_root.display())]
pub struct NoteNotFound {
    pub reference: String,
    pub vault_root: PathBuf,
}

/// Resolve `reference` (a bare title or a relative/absolute path) to a file.
///
/// Candidates, first existing file wins:
/// 1. `reference` verbatim (absolute, or relative to the working directory)
/// 2. `reference` with `.md` appended
/// 3. `vault_root/reference`
/// 4. `vault_root/reference` with `.md` appended
pub fn resolve_note(reference: &str, vault_root: &Path) -> Result<PathBuf, NoteNotFound> {
    let direct = PathBuf::from(reference);
    let in_vault = vault_root.join(reference);
    let candidates = [with_md(&direct), in_vault.clone(), with_md(&in_vault)];

    std::iter::once(direct)
        .chain(candidates)
        .find(|candidate| candidate.is_file())
        .inspect(|found| debug!(reference, path = %found.display(), "resolved note"))
        .ok_or_else(|| NoteNotFound {
            reference: reference.to_string(),
            vault_root: vault_root.to_path_buf(),
        })
}

/// Append `.md` unless the path already ends with it. `Path::with_extension`
/// would replace dotted title suffixes such as `v1.2`.
fn with_md(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "md") {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_owned();
    raw.push(".md");
    PathBuf::from(raw)
}
