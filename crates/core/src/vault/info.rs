//! Whole-vault file statistics.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use super::scanner::ScanError;

/// Count and total size for one kind of entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub count: u64,
    pub bytes: u64,
}

impl Tally {
    fn add(&mut self, bytes: u64) {
        self.count += 1;
        self.bytes += bytes;
    }
}

/// Statistics over every entry below the vault root.
///
/// Unlike a scan, this ignores the exclusion list: it describes the vault
/// directory as it sits on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VaultStats {
    /// Directories, including the root itself.
    pub directories: u64,
    pub files: Tally,
    pub markdown_files: u64,
    /// Files per extension (with leading dot; empty string for none).
    pub extensions: BTreeMap<String, Tally>,
}

impl VaultStats {
    pub fn collect(root: &Path) -> Result<Self, ScanError> {
        let meta = std::fs::metadata(root)
            .map_err(|source| ScanError::Root { path: root.to_path_buf(), source })?;
        if !meta.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut stats = Self::default();
        // Unreadable entries below the root are left out of the totals.
        for entry in WalkDir::new(root).follow_links(false).into_iter().flatten() {
            let file_type = entry.file_type();
            if file_type.is_dir() {
                stats.directories += 1;
            } else if file_type.is_file() {
                let bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
                let ext = entry
                    .path()
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                if ext == ".md" {
                    stats.markdown_files += 1;
                }
                stats.files.add(bytes);
                stats.extensions.entry(ext).or_default().add(bytes);
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn counts_entries_by_kind() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Assets/img")).unwrap();
        fs::write(root.join("a.md"), "12345").unwrap();
        fs::write(root.join("Assets/b.md"), "1").unwrap();
        fs::write(root.join("Assets/img/pic.png"), "xx").unwrap();
        fs::write(root.join("LICENSE"), "").unwrap();

        let stats = VaultStats::collect(root).unwrap();

        assert_eq!(stats.directories, 3);
        assert_eq!(stats.files, Tally { count: 4, bytes: 8 });
        assert_eq!(stats.markdown_files, 2);
        assert_eq!(stats.extensions[".md"], Tally { count: 2, bytes: 6 });
        assert_eq!(stats.extensions[".png"].count, 1);
        assert_eq!(stats.extensions[""].count, 1);
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(VaultStats::collect(Path::new("/nonexistent/vault")).is_err());
    }
}
