//! Journal path templating.
//!
//! Templates use `{var}` or `{var:02d}` placeholders, e.g.
//! `Calendar/{year}/{month:02d}/{year}-{month:02d}-{day:02d}`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use thiserror::Error;

pub const DEFAULT_JOURNAL_TEMPLATE: &str =
    "Calendar/{year}/{month:02d}/{year}-{month:02d}-{day:02d}";

/// Variables available to journal templates.
pub const JOURNAL_VARIABLES: &[&str] =
    &["year", "month", "day", "month_name", "month_abbr", "weekday", "weekday_abbr"];

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    // {name} or {name:spec}
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::([^{}]*))?\}").expect("valid regex")
});

static INT_SPEC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0?)([0-9]*)d?$").expect("valid regex"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("unknown variable '{0}' in journal template (available: {vars})", vars = JOURNAL_VARIABLES.join(", "))]
    UnknownVariable(String),

    #[error("unsupported format '{spec}' for '{var}' in journal template")]
    UnsupportedFormat { var: String, spec: String },

    #[error("unbalanced braces in journal template '{0}'")]
    Unbalanced(String),
}

/// A validated journal template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalTemplate {
    raw: String,
}

impl JournalTemplate {
    /// Validate `raw` by formatting a fixed date with it.
    pub fn parse(raw: &str) -> Result<Self, JournalError> {
        let template = Self { raw: raw.to_string() };
        template.format(NaiveDate::default())?;
        Ok(template)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitute the date's variables into the template.
    pub fn format(&self, date: NaiveDate) -> Result<String, JournalError> {
        let mut failure = None;
        let out = PLACEHOLDER_RE.replace_all(&self.raw, |caps: &Captures<'_>| {
            match substitute(caps, date) {
                Ok(s) => s,
                Err(e) => {
                    failure.get_or_insert(e);
                    String::new()
                }
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }
        if out.contains(['{', '}']) {
            return Err(JournalError::Unbalanced(self.raw.clone()));
        }
        Ok(out.into_owned())
    }

    /// Absolute path of the journal note for `date`.
    pub fn path_for(&self, vault_root: &Path, date: NaiveDate) -> Result<PathBuf, JournalError> {
        let mut relative = self.format(date)?;
        relative.push_str(".md");
        Ok(vault_root.join(relative))
    }
}

impl Default for JournalTemplate {
    fn default() -> Self {
        Self { raw: DEFAULT_JOURNAL_TEMPLATE.to_string() }
    }
}

fn substitute(caps: &Captures<'_>, date: NaiveDate) -> Result<String, JournalError> {
    let var = &caps[1];
    let spec = caps.get(2).map_or("", |m| m.as_str());

    let number = match var {
        "year" => i64::from(date.year()),
        "month" => i64::from(date.month()),
        "day" => i64::from(date.day()),
        "month_name" | "month_abbr" | "weekday" | "weekday_abbr" => {
            if !spec.is_empty() {
                return Err(JournalError::UnsupportedFormat {
                    var: var.to_string(),
                    spec: spec.to_string(),
                });
            }
            let pattern = match var {
                "month_name" => "%B",
                "month_abbr" => "%b",
                "weekday" => "%A",
                _ => "%a",
            };
            return Ok(date.format(pattern).to_string());
        }
        other => return Err(JournalError::UnknownVariable(other.to_string())),
    };

    let Some(spec_caps) = INT_SPEC_RE.captures(spec) else {
        return Err(JournalError::UnsupportedFormat {
            var: var.to_string(),
            spec: spec.to_string(),
        });
    };
    let width: usize = spec_caps[2].parse().unwrap_or(0);
    Ok(if &spec_caps[1] == "0" {
        format!("{number:0width$}")
    } else {
        format!("{number:width$}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_template() {
        let t = JournalTemplate::default();
        assert_eq!(t.format(date(2025, 3, 7)).unwrap(), "Calendar/2025/03/2025-03-07");
    }

    #[rstest]
    #[case("{year}-{month}-{day}", "2024-1-5")]
    #[case("{month_name} {month_abbr}", "January Jan")]
    #[case("{weekday}/{weekday_abbr}", "Friday/Fri")]
    #[case("J/{day:03d}", "J/005")]
    #[case("plain", "plain")]
    fn formats_variables(#[case] raw: &str, #[case] expected: &str) {
        let t = JournalTemplate::parse(raw).unwrap();
        assert_eq!(t.format(date(2024, 1, 5)).unwrap(), expected);
    }

    #[test]
    fn unknown_variable_is_rejected() {
        let err = JournalTemplate::parse("Daily/{yaer}").unwrap_err();
        assert_eq!(err, JournalError::UnknownVariable("yaer".into()));
    }

    #[test]
    fn bad_spec_is_rejected() {
        assert!(matches!(
            JournalTemplate::parse("{month_name:02d}"),
            Err(JournalError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            JournalTemplate::parse("{day:x}"),
            Err(JournalError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn stray_brace_is_rejected() {
        assert!(matches!(JournalTemplate::parse("{year"), Err(JournalError::Unbalanced(_))));
    }

    #[test]
    fn path_appends_extension() {
        let t = JournalTemplate::parse("Daily/{year}.{month:02d}.{day:02d}").unwrap();
        let path = t.path_for(Path::new("/vault"), date(2024, 12, 31)).unwrap();
        assert_eq!(path, Path::new("/vault/Daily/2024.12.31.md"));
    }
}
