//! Name and title search used by `find`.

use std::path::Path;

use tracing::debug;

use crate::frontmatter::Frontmatter;
use crate::vault::{NoteRecord, ScanError, SkippedNote, VaultScanner, posix_path};

/// Matches notes by file stem and, in substring mode, by `title` field.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    term: String,
    folded: String,
    exact: bool,
}

impl SearchMatcher {
    pub fn new(term: impl Into<String>, exact: bool) -> Self {
        let term = term.into();
        let folded = term.to_lowercase();
        Self { term, folded, exact }
    }

    /// Exact mode compares the stem case-sensitively, substring mode
    /// case-insensitively.
    pub fn matches_stem(&self, stem: &str) -> bool {
        if self.exact {
            return stem == self.term;
        }
        stem.to_lowercase().contains(&self.folded)
    }

    /// Substring mode only: a string `title` field containing the term.
    pub fn matches_title(&self, note: &NoteRecord) -> bool {
        !self.exact
            && note
                .title_field()
                .is_some_and(|title| title.to_lowercase().contains(&self.folded))
    }

    pub fn matches(&self, note: &NoteRecord) -> bool {
        self.matches_stem(&note.stem()) || self.matches_title(note)
    }
}

/// Outcome of a name search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Ascending by relative path.
    pub notes: Vec<NoteRecord>,
    /// Notes whose title could not be checked because they failed to parse.
    pub skipped: Vec<SkippedNote>,
}

/// Search the notes of `scanner` for `term`.
///
/// The stem is checked before the file is parsed, so a note with broken
/// frontmatter is still found by name; it comes back with empty metadata.
/// Parse failures only count as skipped when the title check needed them.
pub fn search(scanner: &VaultScanner, term: &str, exact: bool) -> Result<SearchResult, ScanError> {
    let matcher = SearchMatcher::new(term, exact);
    let mut result = SearchResult::default();

    for candidate in scanner.note_paths()? {
        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(skipped) => {
                scanner.report_skip(&skipped);
                result.skipped.push(skipped);
                continue;
            }
        };

        if matcher.matches_stem(&candidate.stem()) {
            let note = match scanner.read_note(candidate) {
                Ok(note) => note,
                Err(skipped) => {
                    debug!(
                        path = %posix_path(&skipped.relative_path),
                        reason = %skipped.reason,
                        "name match with unreadable frontmatter"
                    );
                    NoteRecord {
                        path: scanner.root().join(&skipped.relative_path),
                        relative_path: skipped.relative_path,
                        metadata: Frontmatter::new(),
                        body: String::new(),
                    }
                }
            };
            result.notes.push(note);
            continue;
        }
        if exact {
            continue;
        }

        match scanner.read_note(candidate) {
            Ok(note) if matcher.matches_title(&note) => result.notes.push(note),
            Ok(_) => {}
            Err(skipped) => {
                scanner.report_skip(&skipped);
                result.skipped.push(skipped);
            }
        }
    }

    result.notes.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    result.notes.dedup_by(|a, b| a.relative_path == b.relative_path);

    debug!(
        term,
        exact,
        matches = result.notes.len(),
        skipped = result.skipped.len(),
        "find complete"
    );
    Ok(result)
}

/// Notes matching `term`, deduplicated and ascending by relative path.
pub fn find_notes<S: AsRef<str>>(
    vault_root: &Path,
    exclusions: &[S],
    term: &str,
    exact: bool,
) -> Result<Vec<NoteRecord>, ScanError> {
    let scanner = VaultScanner::new(vault_root, exclusions);
    Ok(search(&scanner, term, exact)?.notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Projects")).unwrap();
        fs::write(root.join("Projects/Roadmap.md"), "---\ntitle: Big Plan\n---\n").unwrap();
        fs::write(root.join("Projects/plan.md"), "no metadata").unwrap();
        fs::write(root.join("Daily.md"), "---\ntitle: 42\n---\n").unwrap();
        dir
    }

    fn names(found: &[NoteRecord]) -> Vec<String> {
        found.iter().map(NoteRecord::display_path).collect()
    }

    #[test]
    fn substring_mode_checks_stem_and_title_case_insensitively() {
        let dir = vault();
        let found = find_notes(dir.path(), &[] as &[&str], "PLAN", false).unwrap();
        assert_eq!(names(&found), vec!["Projects/Roadmap.md", "Projects/plan.md"]);
    }

    #[test]
    fn exact_mode_is_case_sensitive_on_stem_only() {
        let dir = vault();
        let exact = find_notes(dir.path(), &[] as &[&str], "plan", true).unwrap();
        assert_eq!(names(&exact), vec!["Projects/plan.md"]);

        let none = find_notes(dir.path(), &[] as &[&str], "Big Plan", true).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn non_string_titles_are_ignored() {
        let dir = vault();
        let found = find_notes(dir.path(), &[] as &[&str], "42", false).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn note_matching_twice_appears_once() {
        let dir = vault();
        fs::write(dir.path().join("Roadmap 2.md"), "---\ntitle: roadmap\n---\n").unwrap();
        let found = find_notes(dir.path(), &[] as &[&str], "roadmap", false).unwrap();
        assert_eq!(names(&found), vec!["Projects/Roadmap.md", "Roadmap 2.md"]);
    }

    #[test]
    fn broken_frontmatter_is_still_found_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plan.md"), "---\ntitle: [oops\n---\n").unwrap();

        for exact in [true, false] {
            let found = find_notes(dir.path(), &[] as &[&str], "plan", exact).unwrap();
            assert_eq!(names(&found), vec!["plan.md"]);
            assert!(found[0].metadata.is_empty());
        }
    }

    #[test]
    fn unparseable_notes_missing_the_name_are_reported_as_skipped() {
        let dir = vault();
        fs::write(dir.path().join("broken.md"), "---\ntitle: [oops\n---\n").unwrap();
        let scanner = VaultScanner::new(dir.path(), &[] as &[&str]).verbose(true);

        let loose = search(&scanner, "plan", false).unwrap();
        assert_eq!(names(&loose.notes), vec!["Projects/Roadmap.md", "Projects/plan.md"]);
        assert_eq!(loose.skipped.len(), 1);
        assert_eq!(loose.skipped[0].relative_path, std::path::PathBuf::from("broken.md"));

        let exact = search(&scanner, "plan", true).unwrap();
        assert!(exact.skipped.is_empty());
    }
}
