use obsidian_core::frontmatter;
use obsidian_core::query::{MatchSet, Predicate, Query, Rendered, run};
use obsidian_core::vault::{VaultScanner, posix_path};
use obsidian_core::{OutputStyle, find_notes, list_notes, query_notes, resolve_note};
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const EXCLUSIONS: &[&str] = &["Assets/"];

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_vault() -> TempDir {
    let tmp = tempdir().unwrap();
    write(tmp.path(), "Notes/a.md", "---\nstatus: active\n---\n# A\n");
    write(tmp.path(), "Notes/b.md", "---\nstatus: done\n---\n# B\n");
    write(tmp.path(), "Assets/c.md", "# C without metadata\n");
    tmp
}

fn query_paths(root: &Path, predicate: Predicate) -> Vec<String> {
    let rendered =
        query_notes(root, EXCLUSIONS, &Query::new("status", predicate), OutputStyle::Path)
            .unwrap();
    match rendered {
        Rendered::Output(text) => text.lines().map(str::to_string).collect(),
        Rendered::NoMatches => Vec::new(),
    }
}

#[test]
fn exists_query_matches_in_path_order() {
    let vault = sample_vault();
    assert_eq!(query_paths(vault.path(), Predicate::Exists), vec!["Notes/a.md", "Notes/b.md"]);
}

#[test]
fn equals_query_matches_exact_value() {
    let vault = sample_vault();
    assert_eq!(
        query_paths(vault.path(), Predicate::Equals("active".into())),
        vec!["Notes/a.md"]
    );
}

#[test]
fn list_notes_honours_exclusions() {
    let vault = sample_vault();
    let listed: Vec<_> = list_notes(vault.path(), EXCLUSIONS)
        .unwrap()
        .iter()
        .map(|p| posix_path(p))
        .collect();
    assert_eq!(listed, vec!["Notes/a.md", "Notes/b.md"]);
}

#[test]
fn find_substring_skips_excluded_notes() {
    let vault = sample_vault();
    let found = find_notes(vault.path(), EXCLUSIONS, "a", false).unwrap();
    let found: Vec<_> = found.iter().map(|n| n.display_path()).collect();
    assert_eq!(found, vec!["Notes/a.md"]);
}

#[test]
fn note_without_frontmatter_is_missing_every_key() {
    let vault = sample_vault();
    write(vault.path(), "Notes/plain.md", "Just text, no block.\n");

    let matches = query_notes(
        vault.path(),
        EXCLUSIONS,
        &Query::new("anything", Predicate::Missing),
        OutputStyle::Path,
    )
    .unwrap();
    assert!(matches.text().lines().any(|l| l == "Notes/plain.md"));

    let doc = frontmatter::read(&vault.path().join("Notes/plain.md")).unwrap();
    assert!(doc.metadata().is_empty());
    assert_eq!(doc.body, "Just text, no block.\n");
}

#[test]
fn resolve_bare_title_inside_vault() {
    let vault = tempdir().unwrap();
    write(vault.path(), "My Note.md", "# My Note\n");

    let found = resolve_note("My Note", vault.path()).unwrap();
    assert_eq!(found, vault.path().join("My Note.md"));

    let err = resolve_note("Missing Note", vault.path()).unwrap_err();
    assert_eq!(err.reference, "Missing Note");
}

#[test]
fn unparseable_note_does_not_abort_query() {
    let vault = sample_vault();
    write(vault.path(), "Notes/broken.md", "---\nstatus: [unclosed\n---\n");

    let scanner = VaultScanner::new(vault.path(), EXCLUSIONS).verbose(true);
    let result = run(&scanner, &Query::new("status", Predicate::Exists)).unwrap();

    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(posix_path(&result.skipped[0].relative_path), "Notes/broken.md");
}

#[test]
fn grouped_query_buckets_missing_group_key() {
    let vault = sample_vault();
    write(vault.path(), "Notes/c.md", "---\nstatus: active\narea: work\n---\n");
    write(vault.path(), "Notes/d.md", "---\nstatus: done\narea: home\n---\n");

    let scanner = VaultScanner::new(vault.path(), EXCLUSIONS);
    let result = run(&scanner, &Query::new("status", Predicate::Exists).group_by("area")).unwrap();

    let MatchSet::Grouped(groups) = result.matches else {
        panic!("expected grouped matches");
    };
    let labels: Vec<_> = groups.iter().map(|g| g.key.to_string()).collect();
    assert_eq!(labels, vec!["(ungrouped)", "work", "home"]);
    let ungrouped: Vec<_> = groups[0].notes.iter().map(|n| n.display_path()).collect();
    assert_eq!(ungrouped, vec!["Notes/a.md", "Notes/b.md"]);
}

#[test]
fn missing_vault_root_is_fatal() {
    let vault = tempdir().unwrap();
    let gone = vault.path().join("gone");
    let err = query_notes(&gone, EXCLUSIONS, &Query::new("k", Predicate::Exists), OutputStyle::Path)
        .unwrap_err();
    assert!(err.to_string().contains("gone"));
}

#[test]
fn literal_ungrouped_value_does_not_merge_with_missing_bucket() {
    let vault = sample_vault();
    write(vault.path(), "Notes/c.md", "---\nstatus: active\narea: \"(ungrouped)\"\n---\n");

    let query = Query::new("status", Predicate::Exists).group_by("area");
    let rendered = query_notes(vault.path(), EXCLUSIONS, &query, OutputStyle::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(rendered.text()).unwrap();

    let total: usize =
        parsed.as_object().unwrap().values().map(|g| g.as_array().unwrap().len()).sum();
    assert_eq!(total, 3);
    assert_eq!(parsed["\"(ungrouped)\""][0]["path"], "Notes/c.md");
}
