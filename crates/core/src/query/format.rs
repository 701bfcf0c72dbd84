//! Rendering of match sets.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tabled::{Table, Tabled, settings::Style};
use thiserror::Error;

use super::types::{Group, GroupKey, MatchSet, UNGROUPED_LABEL};
use crate::frontmatter::{FieldValue, Frontmatter};
use crate::vault::NoteRecord;

/// Indicator printed by human-facing styles when nothing matched.
pub const NO_MATCHES: &str = "No matching files found";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown output style '{0}' (expected path, title, table, full, count or json)")]
    UnknownStyle(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// One relative path per line.
    #[default]
    Path,
    /// `path: title`, title falling back to the file stem.
    Title,
    /// Every key/value of every match.
    Table,
    /// Number of matches (per group when grouped).
    Count,
    /// `{path, metadata}` records.
    Json,
}

impl OutputStyle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Title => "title",
            Self::Table => "table",
            Self::Count => "count",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputStyle {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "title" => Ok(Self::Title),
            "table" | "full" => Ok(Self::Table),
            "count" => Ok(Self::Count),
            "json" => Ok(Self::Json),
            _ => Err(FormatError::UnknownStyle(s.to_string())),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rendered query output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Output(String),
    /// Nothing matched; callers show [`NO_MATCHES`].
    NoMatches,
}

impl Rendered {
    pub fn text(&self) -> &str {
        match self {
            Self::Output(s) => s,
            Self::NoMatches => NO_MATCHES,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoMatches)
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Render `matches` in `style`. `key` is the queried key, echoed as `value`
/// in JSON records.
pub fn render(matches: &MatchSet, style: OutputStyle, key: &str) -> Result<Rendered, FormatError> {
    match style {
        OutputStyle::Json => render_json(matches, key).map(Rendered::Output),
        OutputStyle::Count => Ok(Rendered::Output(render_count(matches))),
        _ if matches.is_empty() => Ok(Rendered::NoMatches),
        OutputStyle::Path => Ok(Rendered::Output(render_lines(matches, NoteRecord::display_path))),
        OutputStyle::Title => Ok(Rendered::Output(render_lines(matches, |note| {
            format!("{}: {}", note.display_path(), note.title())
        }))),
        OutputStyle::Table => Ok(Rendered::Output(render_table(matches))),
    }
}

/// Printed label of each group, unique within `groups`.
///
/// A value whose string form collides with the ungrouped label (or with an
/// earlier label) is wrapped in double quotes until it is unique.
pub fn group_labels(groups: &[Group]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    if groups.iter().any(|g| g.key == GroupKey::Ungrouped) {
        taken.insert(UNGROUPED_LABEL.to_string());
    }
    groups
        .iter()
        .map(|group| match &group.key {
            GroupKey::Ungrouped => UNGROUPED_LABEL.to_string(),
            GroupKey::Value(value) => {
                let mut label = value.clone();
                while taken.contains(&label) {
                    label = format!("\"{label}\"");
                }
                taken.insert(label.clone());
                label
            }
        })
        .collect()
}

fn render_lines(matches: &MatchSet, line: impl Fn(&NoteRecord) -> String) -> String {
    match matches {
        MatchSet::Flat(notes) => notes.iter().map(&line).collect::<Vec<_>>().join("\n"),
        MatchSet::Grouped(groups) => {
            let mut out = Vec::new();
            for (group, label) in groups.iter().zip(group_labels(groups)) {
                out.push(format!("{label}:"));
                out.extend(group.notes.iter().map(|n| format!("  {}", line(n))));
            }
            out.join("\n")
        }
    }
}

fn render_count(matches: &MatchSet) -> String {
    match matches {
        MatchSet::Flat(notes) => notes.len().to_string(),
        MatchSet::Grouped(groups) if groups.is_empty() => "0".to_string(),
        MatchSet::Grouped(groups) => groups
            .iter()
            .zip(group_labels(groups))
            .map(|(g, label)| format!("{label}: {}", g.notes.len()))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[derive(Tabled)]
struct MetadataRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct GroupedMetadataRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Rows for one note; the path only appears on its first row.
fn note_rows(note: &NoteRecord) -> Vec<MetadataRow> {
    if note.metadata.is_empty() {
        return vec![MetadataRow {
            path: note.display_path(),
            property: String::new(),
            value: String::new(),
        }];
    }
    note.metadata
        .iter()
        .enumerate()
        .map(|(i, (k, v))| MetadataRow {
            path: if i == 0 { note.display_path() } else { String::new() },
            property: k.to_string(),
            value: v.to_string(),
        })
        .collect()
}

fn render_table(matches: &MatchSet) -> String {
    let table = match matches {
        MatchSet::Flat(notes) => {
            let rows: Vec<MetadataRow> = notes.iter().flat_map(note_rows).collect();
            Table::new(&rows).with(Style::rounded()).to_string()
        }
        MatchSet::Grouped(groups) => {
            let mut rows = Vec::new();
            for (group, label) in groups.iter().zip(group_labels(groups)) {
                let mut first = true;
                for row in group.notes.iter().flat_map(note_rows) {
                    rows.push(GroupedMetadataRow {
                        group: if first { label.clone() } else { String::new() },
                        path: row.path,
                        property: row.property,
                        value: row.value,
                    });
                    first = false;
                }
            }
            Table::new(&rows).with(Style::rounded()).to_string()
        }
    };
    format!("{table}\nTotal matches: {}", matches.len())
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    path: String,
    metadata: &'a Frontmatter,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a FieldValue>,
}

impl<'a> JsonRecord<'a> {
    fn new(note: &'a NoteRecord, key: &str) -> Self {
        Self { path: note.display_path(), metadata: &note.metadata, value: note.metadata.get(key) }
    }
}

/// Groups as a JSON object keyed by group label, in group order.
struct JsonGroups<'a> {
    groups: &'a [Group],
    key: &'a str,
}

impl Serialize for JsonGroups<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, label) in self.groups.iter().zip(group_labels(self.groups)) {
            let records: Vec<JsonRecord<'_>> =
                group.notes.iter().map(|n| JsonRecord::new(n, self.key)).collect();
            map.serialize_entry(&label, &records)?;
        }
        map.end()
    }
}

fn render_json(matches: &MatchSet, key: &str) -> Result<String, FormatError> {
    let json = match matches {
        MatchSet::Flat(notes) => {
            let records: Vec<JsonRecord<'_>> =
                notes.iter().map(|n| JsonRecord::new(n, key)).collect();
            serde_json::to_string_pretty(&records)?
        }
        MatchSet::Grouped(groups) => serde_json::to_string_pretty(&JsonGroups { groups, key })?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::GroupKey;
    use std::path::PathBuf;

    fn note(path: &str, fields: Vec<(&str, FieldValue)>) -> NoteRecord {
        NoteRecord {
            path: PathBuf::from("/vault").join(path),
            relative_path: PathBuf::from(path),
            metadata: fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            body: String::new(),
        }
    }

    fn flat() -> MatchSet {
        MatchSet::Flat(vec![
            note(
                "Notes/a.md",
                vec![("status", "active".into()), ("title", "Alpha".into())],
            ),
            note("Notes/b.md", vec![("status", "done".into())]),
        ])
    }

    fn text(rendered: Rendered) -> String {
        rendered.text().to_string()
    }

    #[test]
    fn style_names_parse_case_insensitively() {
        assert_eq!("PATH".parse::<OutputStyle>().unwrap(), OutputStyle::Path);
        assert_eq!("full".parse::<OutputStyle>().unwrap(), OutputStyle::Table);
        assert!("yaml".parse::<OutputStyle>().is_err());
    }

    #[test]
    fn path_and_title_styles() {
        let out = text(render(&flat(), OutputStyle::Path, "status").unwrap());
        assert_eq!(out, "Notes/a.md\nNotes/b.md");

        let out = text(render(&flat(), OutputStyle::Title, "status").unwrap());
        assert_eq!(out, "Notes/a.md: Alpha\nNotes/b.md: b");
    }

    #[test]
    fn empty_results_are_never_silent() {
        let empty = MatchSet::Flat(Vec::new());
        for style in [OutputStyle::Path, OutputStyle::Title, OutputStyle::Table] {
            assert_eq!(render(&empty, style, "k").unwrap(), Rendered::NoMatches);
        }
        assert_eq!(text(render(&empty, OutputStyle::Count, "k").unwrap()), "0");
        assert_eq!(text(render(&empty, OutputStyle::Json, "k").unwrap()), "[]");
        assert_eq!(
            text(render(&MatchSet::Grouped(Vec::new()), OutputStyle::Json, "k").unwrap()),
            "{}"
        );
    }

    #[test]
    fn table_shows_path_once_per_note() {
        let out = text(render(&flat(), OutputStyle::Table, "status").unwrap());
        assert_eq!(out.matches("Notes/a.md").count(), 1);
        assert!(out.contains("Alpha"));
        assert!(out.contains("Property"));
        assert!(out.ends_with("Total matches: 2"));
    }

    #[test]
    fn flat_json_records() {
        let out = text(render(&flat(), OutputStyle::Json, "title").unwrap());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["path"], "Notes/a.md");
        assert_eq!(value[0]["metadata"]["status"], "active");
        assert_eq!(value[0]["value"], "Alpha");
        assert!(value[1].get("value").is_none());
    }

    #[test]
    fn grouped_output() {
        let grouped = MatchSet::Grouped(vec![
            Group {
                key: GroupKey::Value("work".into()),
                notes: vec![note("b.md", vec![("n", FieldValue::Integer(1))])],
            },
            Group {
                key: GroupKey::Ungrouped,
                notes: vec![note("a.md", vec![]), note("c.md", vec![])],
            },
        ]);

        let out = text(render(&grouped, OutputStyle::Path, "n").unwrap());
        assert_eq!(out, "work:\n  b.md\n(ungrouped):\n  a.md\n  c.md");

        let out = text(render(&grouped, OutputStyle::Count, "n").unwrap());
        assert_eq!(out, "work: 1\n(ungrouped): 2");

        let out = text(render(&grouped, OutputStyle::Json, "n").unwrap());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["work"][0]["metadata"]["n"], 1);
        assert_eq!(value["(ungrouped)"].as_array().unwrap().len(), 2);
        assert!(out.find("\"work\"").unwrap() < out.find("(ungrouped)").unwrap());
    }

    #[test]
    fn value_named_like_the_ungrouped_bucket_keeps_its_own_group() {
        let grouped = MatchSet::Grouped(vec![
            Group {
                key: GroupKey::Value(UNGROUPED_LABEL.into()),
                notes: vec![note("a.md", vec![("g", UNGROUPED_LABEL.into())])],
            },
            Group { key: GroupKey::Ungrouped, notes: vec![note("b.md", vec![])] },
        ]);

        let out = text(render(&grouped, OutputStyle::Json, "g").unwrap());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["\"(ungrouped)\""][0]["path"], "a.md");
        assert_eq!(object["(ungrouped)"][0]["path"], "b.md");

        let out = text(render(&grouped, OutputStyle::Count, "g").unwrap());
        assert_eq!(out, "\"(ungrouped)\": 1\n(ungrouped): 1");
    }
}
