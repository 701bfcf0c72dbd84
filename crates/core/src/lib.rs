//! Frontmatter queries over a vault of markdown notes.
//!
//! The entry points used by the command line and the protocol server are
//! [`list_notes`], [`find_notes`], [`query_notes`] and [`resolve_note`].
//! Every call performs a fresh scan; nothing is cached between calls.

pub mod config;
pub mod frontmatter;
pub mod info;
pub mod journal;
pub mod note;
pub mod query;
pub mod vault;

pub use query::{OutputStyle, Predicate, Query, Rendered, find_notes, query_notes};
pub use vault::{NoteNotFound, NoteRecord, list_notes, resolve_note};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
