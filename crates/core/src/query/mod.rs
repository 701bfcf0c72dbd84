//! Metadata queries, name search and result rendering.

pub mod engine;
pub mod format;
pub mod search;
pub mod types;

pub use engine::{apply, query_notes, run};
pub use format::{FormatError, NO_MATCHES, OutputStyle, Rendered, render};
pub use search::{SearchMatcher, SearchResult, find_notes, search};
pub use types::{
    Group, GroupKey, MatchSet, MissingGroup, Predicate, Query, QueryError, QueryResult,
    UNGROUPED_LABEL,
};
