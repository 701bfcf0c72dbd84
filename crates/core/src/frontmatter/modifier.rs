//! Frontmatter modification operations.

use chrono::{Local, SecondsFormat};

use super::types::{FieldValue, ParsedDocument};

/// Key refreshed on every metadata update.
pub const MODIFIED_KEY: &str = "modified";

/// Set `key` to `value`, creating the frontmatter block if the document has
/// none. An existing key keeps its position. Returns the previous value.
pub fn set_field(
    doc: &mut ParsedDocument,
    key: &str,
    value: FieldValue,
) -> Option<FieldValue> {
    doc.frontmatter.get_or_insert_default().insert(key, value)
}

/// Move `modified` to the end of the block with the current local time.
pub fn touch_modified(doc: &mut ParsedDocument) {
    let fm = doc.frontmatter.get_or_insert_default();
    fm.remove(MODIFIED_KEY);
    fm.insert(MODIFIED_KEY, FieldValue::String(timestamp()));
}

/// Current local time as RFC 3339 with seconds precision.
pub fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
