//! Query model: predicates, groups and result sets.

use std::fmt;

use thiserror::Error;

use crate::frontmatter::FieldValue;
use crate::vault::{NoteRecord, ScanError, SkippedNote};

use super::format::FormatError;

/// Label of the bucket holding notes that lack the group-by key.
pub const UNGROUPED_LABEL: &str = "(ungrouped)";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Filter applied to the value of the queried key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Key is present, whatever its value.
    Exists,
    /// Key is absent.
    Missing,
    /// Key is present and its string representation equals the value.
    Equals(String),
    /// Key is present and its string representation contains the substring.
    Contains(String),
    /// No filtering at all.
    Any,
}

impl Predicate {
    /// Build a predicate from mutually exclusive flags.
    ///
    /// Exactly one flag must be set; anything else is a usage error.
    pub fn from_flags(
        exists: bool,
        missing: bool,
        value: Option<String>,
        contains: Option<String>,
        any: bool,
    ) -> Result<Self, QueryError> {
        let mut selected = Vec::with_capacity(1);
        if exists {
            selected.push(Self::Exists);
        }
        if missing {
            selected.push(Self::Missing);
        }
        if let Some(v) = value {
            selected.push(Self::Equals(v));
        }
        if let Some(s) = contains {
            selected.push(Self::Contains(s));
        }
        if any {
            selected.push(Self::Any);
        }

        match selected.len() {
            0 => Err(QueryError::Usage(
                "one of --exists, --missing, --value, --contains or --any is required".into(),
            )),
            1 => Ok(selected.remove(0)),
            _ => {
                let names: Vec<_> = selected.iter().map(|p| p.flag()).collect();
                Err(QueryError::Usage(format!(
                    "predicates {} cannot be combined",
                    names.join(" and ")
                )))
            }
        }
    }

    /// Evaluate against the value found at the queried key, if any.
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Exists, found) => found.is_some(),
            (Self::Missing, found) => found.is_none(),
            (Self::Equals(expected), Some(v)) => v.to_string() == *expected,
            (Self::Contains(needle), Some(v)) => v.to_string().contains(needle.as_str()),
            (Self::Equals(_) | Self::Contains(_), None) => false,
        }
    }

    /// The command-line flag that selects this predicate.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Exists => "--exists",
            Self::Missing => "--missing",
            Self::Equals(_) => "--value",
            Self::Contains(_) => "--contains",
            Self::Any => "--any",
        }
    }
}

/// What to do with matches lacking the group-by key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingGroup {
    /// Collect them under [`UNGROUPED_LABEL`].
    #[default]
    Bucket,
    /// Leave them out of the grouped result.
    Drop,
}

/// A single-key query over vault metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub key: String,
    pub predicate: Predicate,
    pub group_by: Option<String>,
    pub missing_group: MissingGroup,
}

impl Query {
    pub fn new(key: impl Into<String>, predicate: Predicate) -> Self {
        Self { key: key.into(), predicate, group_by: None, missing_group: MissingGroup::default() }
    }

    pub fn group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    pub fn missing_group(mut self, policy: MissingGroup) -> Self {
        self.missing_group = policy;
        self
    }

    pub fn matches(&self, note: &NoteRecord) -> bool {
        self.predicate.matches(note.metadata.get(&self.key))
    }
}

/// Key of one group in a grouped result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// String representation of the group-by value.
    Value(String),
    /// The note has no group-by key.
    Ungrouped,
}

impl GroupKey {
    pub fn label(&self) -> &str {
        match self {
            Self::Value(v) => v,
            Self::Ungrouped => UNGROUPED_LABEL,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    /// Ascending by relative path.
    pub notes: Vec<NoteRecord>,
}

/// Notes satisfying a query.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchSet {
    /// Ascending by relative path.
    Flat(Vec<NoteRecord>),
    /// Groups in order of first appearance during the scan.
    Grouped(Vec<Group>),
}

impl MatchSet {
    /// Number of notes across all groups.
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(notes) => notes.len(),
            Self::Grouped(groups) => groups.iter().map(|g| g.notes.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All notes, group by group.
    pub fn notes(&self) -> Box<dyn Iterator<Item = &NoteRecord> + '_> {
        match self {
            Self::Flat(notes) => Box::new(notes.iter()),
            Self::Grouped(groups) => Box::new(groups.iter().flat_map(|g| g.notes.iter())),
        }
    }
}

/// Outcome of running a query against a vault.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub matches: MatchSet,
    /// Notes left out because they could not be parsed.
    pub skipped: Vec<SkippedNote>,
}
