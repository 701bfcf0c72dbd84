//! Shell completion support.
//!
//! Static scripts come from `completions SHELL`; note arguments additionally
//! complete dynamically against the configured vault.

use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::engine::CompletionCandidate;
use clap_complete::{Shell, generate};
use obsidian_core::config::{ConfigLoader, Overrides, ResolvedConfig};
use obsidian_core::list_notes;
use obsidian_core::vault::posix_path;

use crate::Cli;

const MAX_CANDIDATES: usize = 100;

/// Write the completion script for `shell` to stdout.
pub fn print(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Load the resolved config from the environment, returning None if it fails.
fn load_config() -> Option<ResolvedConfig> {
    let overrides = Overrides {
        config: std::env::var_os("OBSIDIAN_CONFIG").map(PathBuf::from),
        vault: std::env::var_os("OBSIDIAN_VAULT").map(PathBuf::from),
        ..Overrides::default()
    };
    ConfigLoader::load(&overrides).ok()
}

/// Complete note references from the vault.
pub fn complete_notes(current: &OsStr) -> Vec<CompletionCandidate> {
    let current = current.to_str().unwrap_or("");
    load_config().map(|cfg| note_candidates(&cfg, current)).unwrap_or_default()
}

fn note_candidates(cfg: &ResolvedConfig, prefix: &str) -> Vec<CompletionCandidate> {
    let Ok(notes) = list_notes(&cfg.vault_root, &cfg.exclusions) else {
        return Vec::new();
    };
    notes
        .iter()
        .map(|p| posix_path(p))
        .filter(|p| p.starts_with(prefix))
        .take(MAX_CANDIDATES)
        .map(CompletionCandidate::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use obsidian_core::config::{ConfigFile, ConfigSource};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn note_candidates_filter_by_prefix_and_blacklist() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Projects")).unwrap();
        fs::create_dir_all(dir.path().join("Assets")).unwrap();
        fs::write(dir.path().join("Projects/alpha.md"), "").unwrap();
        fs::write(dir.path().join("Projects/beta.md"), "").unwrap();
        fs::write(dir.path().join("Assets/pic.md"), "").unwrap();
        fs::write(dir.path().join("inbox.md"), "").unwrap();

        let file =
            ConfigFile { vault: Some(dir.path().display().to_string()), ..ConfigFile::default() };
        let cfg = ConfigLoader::resolve(file, ConfigSource::Defaults, &Overrides::default()).unwrap();

        let all: Vec<_> = note_candidates(&cfg, "")
            .iter()
            .map(|c| c.get_value().to_string_lossy().into_owned())
            .collect();
        assert_eq!(all, vec!["Projects/alpha.md", "Projects/beta.md", "inbox.md"]);

        let projects = note_candidates(&cfg, "Projects/a");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].get_value(), "Projects/alpha.md");
    }
}
