//! Frontmatter serialization back to markdown.

use super::types::{Frontmatter, ParsedDocument};

/// Serialize a parsed document back to a markdown string.
///
/// The body is emitted verbatim after the closing delimiter. A document that
/// had no frontmatter block is written as its bare body.
pub fn serialize(doc: &ParsedDocument) -> String {
    match &doc.frontmatter {
        Some(fm) => format!("---\n{}---\n{}", frontmatter_to_yaml(fm), doc.body),
        None => doc.body.clone(),
    }
}

/// Serialize frontmatter to YAML (without delimiters). Key order is kept.
pub fn frontmatter_to_yaml(fm: &Frontmatter) -> String {
    if fm.is_empty() {
        return String::new();
    }
    // Serializing a mapping of plain YAML values cannot fail.
    serde_yaml::to_string(&fm.to_yaml_mapping()).unwrap_or_default()
}
