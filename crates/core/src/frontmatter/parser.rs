//! Frontmatter parsing from markdown documents.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Frontmatter, ParsedDocument};
use thiserror::Error;

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("frontmatter must be a mapping of keys to values, found {0}")]
    NotAMapping(&'static str),
}

/// Errors from reading a note file from disk.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed frontmatter in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: FrontmatterParseError,
    },
}

/// Read a note from disk and split it into metadata and body.
pub fn read(path: &Path) -> Result<ParsedDocument, ReadError> {
    let content = fs::read_to_string(path)
        .map_err(|source| ReadError::Io { path: path.to_path_buf(), source })?;
    parse(&content).map_err(|source| ReadError::Parse { path: path.to_path_buf(), source })
}

/// Parse frontmatter from markdown content.
///
/// Frontmatter is delimited by `---` lines at the start of the document:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Document content
/// ```
///
/// The opening delimiter must be the very first line. A document without
/// one, or whose block is never closed, has no frontmatter and the whole
/// content is the body.
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let Some(after_open) = strip_delimiter_line(content) else {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    let Some((yaml_end, body_start)) = find_closing_delimiter(after_open) else {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    let yaml_content = &after_open[..yaml_end];
    let body = after_open[body_start..].to_string();

    let frontmatter = parse_yaml_block(yaml_content)?;
    Ok(ParsedDocument { frontmatter: Some(frontmatter), body })
}

fn parse_yaml_block(yaml: &str) -> Result<Frontmatter, FrontmatterParseError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
        serde_yaml::Value::Mapping(map) => Ok(Frontmatter::from(map)),
        // A block holding only comments
        serde_yaml::Value::Null => Ok(Frontmatter::default()),
        serde_yaml::Value::Sequence(_) => Err(FrontmatterParseError::NotAMapping("a list")),
        _ => Err(FrontmatterParseError::NotAMapping("a scalar")),
    }
}

/// If `s` starts with a `---` line, return what follows that line.
fn strip_delimiter_line(s: &str) -> Option<&str> {
    let rest = s.strip_prefix("---")?;
    let rest = rest.trim_start_matches([' ', '\t']);
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))
}

/// Find the closing `---` line.
///
/// Returns the byte offset where the delimiter line starts (end of YAML) and
/// the offset just past its line terminator (start of body).
fn find_closing_delimiter(content: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}
