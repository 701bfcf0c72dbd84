//! Predicate evaluation and grouping over a vault scan.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::format::{OutputStyle, Rendered, render};
use super::types::{Group, GroupKey, MatchSet, MissingGroup, Query, QueryError, QueryResult};
use crate::vault::{NoteRecord, ScanError, VaultScanner};

/// Filter and group `notes` (taken in scan order) according to `query`.
pub fn apply<I>(query: &Query, notes: I) -> MatchSet
where
    I: IntoIterator<Item = NoteRecord>,
{
    let matched = notes.into_iter().filter(|note| query.matches(note));

    let Some(group_key) = &query.group_by else {
        let mut flat: Vec<NoteRecord> = matched.collect();
        flat.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        return MatchSet::Flat(flat);
    };

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for note in matched {
        let key = match note.metadata.get(group_key) {
            Some(value) => GroupKey::Value(value.to_string()),
            None if query.missing_group == MissingGroup::Drop => continue,
            None => GroupKey::Ungrouped,
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group { key, notes: Vec::new() });
            groups.len() - 1
        });
        groups[slot].notes.push(note);
    }

    for group in &mut groups {
        group.notes.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    }
    MatchSet::Grouped(groups)
}

/// Run `query` against a fresh scan.
pub fn run(scanner: &VaultScanner, query: &Query) -> Result<QueryResult, ScanError> {
    debug!(
        key = %query.key,
        predicate = ?query.predicate,
        group_by = ?query.group_by,
        "running query"
    );
    let mut scan = scanner.scan()?;
    let matches = apply(query, scan.by_ref());
    let skipped = scan.into_skipped();
    debug!(matches = matches.len(), skipped = skipped.len(), "query complete");
    Ok(QueryResult { matches, skipped })
}

/// Scan, filter, group and render in one call.
pub fn query_notes<S: AsRef<str>>(
    vault_root: &Path,
    exclusions: &[S],
    query: &Query,
    style: OutputStyle,
) -> Result<Rendered, QueryError> {
    let scanner = VaultScanner::new(vault_root, exclusions);
    let result = run(&scanner, query)?;
    Ok(render(&result.matches, style, &query.key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::{FieldValue, Frontmatter};
    use crate::query::Predicate;
    use std::path::PathBuf;

    fn note(path: &str, fields: &[(&str, &str)]) -> NoteRecord {
        let metadata: Frontmatter = fields
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect();
        NoteRecord {
            path: PathBuf::from("/vault").join(path),
            relative_path: PathBuf::from(path),
            metadata,
            body: String::new(),
        }
    }

    fn paths(notes: &[NoteRecord]) -> Vec<String> {
        notes.iter().map(NoteRecord::display_path).collect()
    }

    fn sample() -> Vec<NoteRecord> {
        vec![
            note("b.md", &[("status", "done"), ("area", "work")]),
            note("a.md", &[("status", "active"), ("area", "home")]),
            note("c.md", &[("status", "active")]),
            note("d.md", &[("area", "work")]),
        ]
    }

    #[test]
    fn flat_results_are_sorted_by_path() {
        let query = Query::new("status", Predicate::Exists);
        let MatchSet::Flat(notes) = apply(&query, sample()) else {
            panic!("expected flat result");
        };
        assert_eq!(paths(&notes), vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn groups_follow_first_appearance() {
        let query = Query::new("status", Predicate::Exists).group_by("area");
        let MatchSet::Grouped(groups) = apply(&query, sample()) else {
            panic!("expected grouped result");
        };

        let keys: Vec<_> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["work", "home", "(ungrouped)"]);
        assert_eq!(paths(&groups[0].notes), vec!["b.md"]);
        assert_eq!(paths(&groups[2].notes), vec!["c.md"]);
    }

    #[test]
    fn drop_policy_omits_ungrouped_notes() {
        let query = Query::new("status", Predicate::Exists)
            .group_by("area")
            .missing_group(MissingGroup::Drop);
        let result = apply(&query, sample());
        assert_eq!(result.len(), 2);
        assert!(result.notes().all(|n| n.metadata.contains_key("area")));
    }

    #[test]
    fn group_members_are_sorted() {
        let notes = vec![
            note("z.md", &[("k", "1"), ("g", "x")]),
            note("m.md", &[("k", "1"), ("g", "x")]),
        ];
        let query = Query::new("k", Predicate::Exists).group_by("g");
        let MatchSet::Grouped(groups) = apply(&query, notes) else {
            panic!("expected grouped result");
        };
        assert_eq!(paths(&groups[0].notes), vec!["m.md", "z.md"]);
    }

    #[test]
    fn equals_never_matches_missing_key() {
        let query = Query::new("status", Predicate::Equals("work".into()));
        assert!(apply(&query, sample()).is_empty());
    }
}
