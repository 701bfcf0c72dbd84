//! Recursive vault scanner.
//!
//! A scan walks the vault root, filters markdown files through the exclusion
//! list and parses each survivor's frontmatter. Nothing is cached: every call
//! to [`VaultScanner::scan`] starts a fresh walk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use super::exclusion::{ExclusionFilter, posix_path};
use crate::frontmatter::{self, FieldValue, Frontmatter};

/// Unrecoverable scan failures. Only the vault root can produce these; any
/// problem below it skips the affected entry instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("vault root {} is not accessible: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("vault root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// A markdown file that passed the exclusion filter, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePath {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Path relative to the vault root.
    pub relative_path: PathBuf,
}

impl NotePath {
    /// File name without the `.md` extension.
    pub fn stem(&self) -> String {
        file_stem(&self.relative_path)
    }
}

/// A note as seen by one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Path relative to the vault root; identity and sort key of the note.
    pub relative_path: PathBuf,
    pub metadata: Frontmatter,
    pub body: String,
}

impl NoteRecord {
    /// Relative path with forward slashes.
    pub fn display_path(&self) -> String {
        posix_path(&self.relative_path)
    }

    /// File name without the `.md` extension.
    pub fn stem(&self) -> String {
        file_stem(&self.relative_path)
    }

    /// The `title` field's string representation, or the file stem.
    pub fn title(&self) -> String {
        match self.metadata.get("title") {
            Some(value) => value.to_string(),
            None => self.stem(),
        }
    }

    /// The `title` field if it holds a string.
    pub fn title_field(&self) -> Option<&str> {
        self.metadata.get("title").and_then(FieldValue::as_str)
    }
}

/// A file the scan had to leave out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNote {
    pub relative_path: PathBuf,
    pub reason: String,
}

/// A fully materialized scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub notes: Vec<NoteRecord>,
    pub skipped: Vec<SkippedNote>,
}

/// Walks a vault and yields parsed notes.
#[derive(Debug, Clone)]
pub struct VaultScanner {
    root: PathBuf,
    filter: ExclusionFilter,
    verbose: bool,
}

impl VaultScanner {
    pub fn new<S: AsRef<str>>(root: impl Into<PathBuf>, exclusions: &[S]) -> Self {
        Self { root: root.into(), filter: ExclusionFilter::new(exclusions), verbose: false }
    }

    /// Emit a warning for each note that fails to parse.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    /// Enumerate non-excluded markdown files without reading them.
    ///
    /// Entries within a directory are visited in file-name order, so the
    /// sequence is ascending by relative path.
    pub fn note_paths(&self) -> Result<NotePaths<'_>, ScanError> {
        self.check_root()?;
        let walk = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        Ok(NotePaths { root: &self.root, filter: &self.filter, walk })
    }

    /// Start a lazy scan. Files that cannot be read or parsed are recorded
    /// on the returned [`Scan`] and left out of the sequence.
    pub fn scan(&self) -> Result<Scan<'_>, ScanError> {
        Ok(Scan { scanner: self, paths: self.note_paths()?, skipped: Vec::new() })
    }

    /// Run a scan to completion.
    pub fn collect(&self) -> Result<ScanReport, ScanError> {
        let mut scan = self.scan()?;
        let notes: Vec<NoteRecord> = scan.by_ref().collect();
        let skipped = scan.into_skipped();
        debug!(
            root = %self.root.display(),
            notes = notes.len(),
            skipped = skipped.len(),
            "scan complete"
        );
        Ok(ScanReport { notes, skipped })
    }

    /// Read and parse one candidate file.
    pub fn read_note(&self, candidate: NotePath) -> Result<NoteRecord, SkippedNote> {
        match frontmatter::read(&candidate.path) {
            Ok(doc) => Ok(NoteRecord {
                path: candidate.path,
                relative_path: candidate.relative_path,
                metadata: doc.frontmatter.unwrap_or_default(),
                body: doc.body,
            }),
            Err(err) => Err(SkippedNote {
                relative_path: candidate.relative_path,
                reason: err.to_string(),
            }),
        }
    }

    /// Log a skipped file when verbose.
    pub fn report_skip(&self, skipped: &SkippedNote) {
        if self.verbose {
            warn!(
                path = %posix_path(&skipped.relative_path),
                reason = %skipped.reason,
                "skipping note"
            );
        }
    }

    fn check_root(&self) -> Result<(), ScanError> {
        let meta = fs::metadata(&self.root)
            .map_err(|source| ScanError::Root { path: self.root.clone(), source })?;
        if !meta.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        // Surface permission problems on the root itself before walking.
        fs::read_dir(&self.root)
            .map_err(|source| ScanError::Root { path: self.root.clone(), source })?;
        Ok(())
    }
}

/// Iterator over candidate note files of one walk.
pub struct NotePaths<'a> {
    root: &'a Path,
    filter: &'a ExclusionFilter,
    walk: walkdir::IntoIter,
}

impl Iterator for NotePaths<'_> {
    type Item = Result<NotePath, SkippedNote>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let relative_path = err
                        .path()
                        .and_then(|p| p.strip_prefix(self.root).ok())
                        .map(Path::to_path_buf)
                        .unwrap_or_default();
                    return Some(Err(SkippedNote { relative_path, reason: err.to_string() }));
                }
            };

            let Ok(relative) = entry.path().strip_prefix(self.root) else {
                continue;
            };
            let relative_str = posix_path(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if self.filter.prunes_dir(&relative_str) {
                    trace!(dir = %relative_str, "excluded directory");
                    self.walk.skip_current_dir();
                }
                continue;
            }

            // Symlinked files count as notes; symlinked directories are not walked.
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
            if !is_file || !is_markdown_file(entry.path()) {
                continue;
            }

            if self.filter.is_excluded(&relative_str) {
                trace!(path = %relative_str, "excluded note");
                continue;
            }

            return Some(Ok(NotePath {
                path: entry.path().to_path_buf(),
                relative_path: relative.to_path_buf(),
            }));
        }
    }
}

/// A lazy scan yielding parsed notes.
pub struct Scan<'a> {
    scanner: &'a VaultScanner,
    paths: NotePaths<'a>,
    skipped: Vec<SkippedNote>,
}

impl Scan<'_> {
    /// Files left out so far.
    pub fn skipped(&self) -> &[SkippedNote] {
        &self.skipped
    }

    pub fn into_skipped(self) -> Vec<SkippedNote> {
        self.skipped
    }

    fn skip(&mut self, skipped: SkippedNote) {
        self.scanner.report_skip(&skipped);
        self.skipped.push(skipped);
    }
}

impl Iterator for Scan<'_> {
    type Item = NoteRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = match self.paths.next()? {
                Ok(candidate) => candidate,
                Err(skipped) => {
                    self.skip(skipped);
                    continue;
                }
            };

            match self.scanner.read_note(candidate) {
                Ok(note) => return Some(note),
                Err(skipped) => self.skip(skipped),
            }
        }
    }
}

/// Relative paths of every non-excluded note, ascending.
pub fn list_notes<S: AsRef<str>>(
    vault_root: &Path,
    exclusions: &[S],
) -> Result<Vec<PathBuf>, ScanError> {
    let scanner = VaultScanner::new(vault_root, exclusions);
    let mut paths: Vec<PathBuf> = scanner
        .note_paths()?
        .filter_map(|item| match item {
            Ok(note) => Some(note.relative_path),
            Err(skipped) => {
                debug!(
                    path = %posix_path(&skipped.relative_path),
                    reason = %skipped.reason,
                    "unreadable entry"
                );
                None
            }
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}

fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}
