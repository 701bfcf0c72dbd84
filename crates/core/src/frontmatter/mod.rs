//! Frontmatter parsing, modification, and serialization.
//!
//! This module provides functionality to:
//! - Parse YAML frontmatter from markdown documents
//! - Modify frontmatter fields (set, refresh `modified`)
//! - Serialize documents back to markdown with frontmatter

pub mod modifier;
pub mod parser;
pub mod serializer;
pub mod types;

pub use modifier::{MODIFIED_KEY, set_field, timestamp, touch_modified};
pub use parser::{FrontmatterParseError, ReadError, parse, read};
pub use serializer::{frontmatter_to_yaml, serialize};
pub use types::{FieldValue, Frontmatter, ParsedDocument};
