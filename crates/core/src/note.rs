//! Note creation, metadata updates and removal.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::frontmatter::{
    self, FieldValue, Frontmatter, ParsedDocument, ReadError, serialize, set_field, timestamp,
    touch_modified,
};
use crate::vault::NoteNotFound;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    NotFound(#[from] NoteNotFound),

    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("note {} already has {key}: {value}", path.display())]
    HasIdentifier { path: PathBuf, key: String, value: String },

    #[error("key '{key}' not found in {}", path.display())]
    MissingKey { path: PathBuf, key: String },

    #[error("invalid note name '{0}'")]
    InvalidName(String),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where a new note called `name` lives: `vault_root/name`, with `.md`
/// appended unless already present.
pub fn note_path(vault_root: &Path, name: &str) -> Result<PathBuf, NoteError> {
    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if name.trim().is_empty() || escapes {
        return Err(NoteError::InvalidName(name.to_string()));
    }
    let mut path = vault_root.join(relative).into_os_string();
    if !name.ends_with(".md") {
        path.push(".md");
    }
    Ok(PathBuf::from(path))
}

/// Title derived from a note name: its last segment without `.md`.
pub fn title_from_name(name: &str) -> String {
    let last = name.rsplit('/').next().unwrap_or(name);
    last.strip_suffix(".md").unwrap_or(last).to_string()
}

/// Create a note with `created`, `modified`, `title` and identifier metadata.
///
/// The body is `content` when given, else a heading with the title. An
/// existing file is only replaced when `force` is set.
pub fn create_note(
    vault_root: &Path,
    name: &str,
    content: Option<&str>,
    ident_key: &str,
    force: bool,
) -> Result<PathBuf, NoteError> {
    let path = note_path(vault_root, name)?;
    if path.exists() && !force {
        return Err(NoteError::AlreadyExists(path));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| NoteError::Write { path: parent.to_path_buf(), source })?;
    }

    let title = title_from_name(name);
    let now = timestamp();
    let mut metadata = Frontmatter::new();
    metadata.insert("created", FieldValue::String(now.clone()));
    metadata.insert("modified", FieldValue::String(now));
    metadata.insert("title", FieldValue::String(title.clone()));
    metadata.insert(ident_key, FieldValue::String(Uuid::new_v4().to_string()));

    let text = match content.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!("# {title}"),
    };
    let doc = ParsedDocument { frontmatter: Some(metadata), body: format!("\n{text}\n") };

    write_note(&path, &doc)?;
    info!(path = %path.display(), "created note");
    Ok(path)
}

pub fn write_note(path: &Path, doc: &ParsedDocument) -> Result<(), NoteError> {
    fs::write(path, serialize(doc))
        .map_err(|source| NoteError::Write { path: path.to_path_buf(), source })
}

/// The note's body, or its whole text when `with_frontmatter` is set.
pub fn note_content(path: &Path, with_frontmatter: bool) -> Result<String, NoteError> {
    if with_frontmatter {
        return fs::read_to_string(path).map_err(|source| {
            NoteError::Read(ReadError::Io { path: path.to_path_buf(), source })
        });
    }
    Ok(frontmatter::read(path)?.body)
}

/// A single metadata value of a note.
pub fn get_metadata(path: &Path, key: &str) -> Result<FieldValue, NoteError> {
    let doc = frontmatter::read(path)?;
    doc.frontmatter
        .and_then(|fm| fm.get(key).cloned())
        .ok_or_else(|| NoteError::MissingKey { path: path.to_path_buf(), key: key.to_string() })
}

/// Set `key`, refresh `modified`, and write the note back. Returns the
/// previous value.
pub fn set_metadata(
    path: &Path,
    key: &str,
    value: FieldValue,
) -> Result<Option<FieldValue>, NoteError> {
    let mut doc = frontmatter::read(path)?;
    let previous = set_field(&mut doc, key, value);
    touch_modified(&mut doc);
    write_note(path, &doc)?;
    debug!(path = %path.display(), key, "updated metadata");
    Ok(previous)
}

/// Write a fresh UUID under `ident_key`. An existing identifier is kept
/// unless `force` is set.
pub fn add_uid(path: &Path, ident_key: &str, force: bool) -> Result<String, NoteError> {
    let doc = frontmatter::read(path)?;
    if !force && let Some(existing) = doc.frontmatter.as_ref().and_then(|fm| fm.get(ident_key)) {
        return Err(NoteError::HasIdentifier {
            path: path.to_path_buf(),
            key: ident_key.to_string(),
            value: existing.to_string(),
        });
    }
    let uid = Uuid::new_v4().to_string();
    set_metadata(path, ident_key, FieldValue::String(uid.clone()))?;
    Ok(uid)
}

/// Refresh `modified` on an existing note.
pub fn touch(path: &Path) -> Result<(), NoteError> {
    let mut doc = frontmatter::read(path)?;
    touch_modified(&mut doc);
    write_note(path, &doc)
}

/// Create `path` (and its parents) as an empty file if it does not exist.
pub fn ensure_file(path: &Path) -> Result<bool, NoteError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| NoteError::Write { path: parent.to_path_buf(), source })?;
    }
    fs::write(path, "").map_err(|source| NoteError::Write { path: path.to_path_buf(), source })?;
    Ok(true)
}

pub fn remove_note(path: &Path) -> Result<(), NoteError> {
    fs::remove_file(path).map_err(|source| NoteError::Remove { path: path.to_path_buf(), source })?;
    info!(path = %path.display(), "removed note");
    Ok(())
}
