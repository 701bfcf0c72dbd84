//! Prefix-based exclusion of vault paths.

use std::path::{Component, Path};

/// Render a relative path with forward slashes regardless of platform.
pub fn posix_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

/// True iff any entry of `exclusions` is a literal prefix of `relative_path`.
///
/// Matching is case-sensitive and byte-for-byte; entries are expected to end
/// with a `/` separator.
pub fn is_excluded<S: AsRef<str>>(relative_path: &str, exclusions: &[S]) -> bool {
    exclusions.iter().any(|prefix| relative_path.starts_with(prefix.as_ref()))
}

/// An exclusion list bound to a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionFilter {
    prefixes: Vec<String>,
}

impl ExclusionFilter {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Self {
        Self { prefixes: prefixes.iter().map(|p| p.as_ref().to_string()).collect() }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Whether a file at `relative_path` (forward slashes) is excluded.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        is_excluded(relative_path, &self.prefixes)
    }

    /// Whether every path below directory `relative_dir` is excluded, so the
    /// walk can skip the directory without changing results.
    pub fn prunes_dir(&self, relative_dir: &str) -> bool {
        let with_sep = format!("{relative_dir}/");
        self.prefixes.iter().any(|prefix| with_sep.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("Assets/img.md", true)]
    #[case("Assets/deep/nested.md", true)]
    #[case("assets/img.md", false)]
    #[case("Notes/Assets/img.md", false)]
    #[case(".obsidian/workspace.md", true)]
    #[case("Notes/a.md", false)]
    fn default_like_exclusions(#[case] path: &str, #[case] expected: bool) {
        let exclusions = ["Assets/", ".obsidian/", ".git/"];
        assert_eq!(is_excluded(path, &exclusions), expected);
    }

    #[test]
    fn empty_list_never_excludes() {
        let none: [&str; 0] = [];
        assert!(!is_excluded("anything.md", &none));
    }

    #[test]
    fn prefix_is_literal_not_segment_based() {
        let filter = ExclusionFilter::new(&["Arch"]);
        assert!(filter.is_excluded("Archive/old.md"));
        assert!(filter.is_excluded("Arch.md"));
    }

    #[rstest]
    #[case("Assets", true)]
    #[case("Assets/sub", true)]
    #[case("Assetsfoo", false)]
    #[case("Notes", false)]
    fn pruning_matches_file_level_exclusion(#[case] dir: &str, #[case] expected: bool) {
        let filter = ExclusionFilter::new(&["Assets/", "Notes/private/"]);
        assert_eq!(filter.prunes_dir(dir), expected);
    }

    #[test]
    fn nested_prefix_does_not_prune_parent() {
        let filter = ExclusionFilter::new(&["Notes/private/"]);
        assert!(!filter.prunes_dir("Notes"));
        assert!(filter.prunes_dir("Notes/private"));
    }

    #[test]
    fn posix_path_joins_with_forward_slashes() {
        let path: PathBuf = ["Notes", "sub", "a.md"].iter().collect();
        assert_eq!(posix_path(&path), "Notes/sub/a.md");
    }
}
