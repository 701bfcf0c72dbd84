//! Vault file discovery.
//!
//! This module provides utilities for resolving note references, excluding
//! paths, walking vault directories, and summarizing their contents.

pub mod exclusion;
pub mod info;
pub mod resolver;
pub mod scanner;

pub use exclusion::{ExclusionFilter, is_excluded, posix_path};
pub use info::{Tally, VaultStats};
pub use resolver::{NoteNotFound, resolve_note};
pub use scanner::{
    NotePath, NotePaths, NoteRecord, Scan, ScanError, ScanReport, SkippedNote, VaultScanner,
    list_notes,
};
