use obsidian_core::config::{ConfigError, ConfigLoader, Overrides};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn load(cfg_path: &Path) -> Result<obsidian_core::config::ResolvedConfig, ConfigError> {
    ConfigLoader::load(&Overrides { config: Some(cfg_path.to_path_buf()), ..Overrides::default() })
}

#[test]
fn missing_file_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("nope/config.toml");
    match load(&cfg_path).unwrap_err() {
        ConfigError::NotFound(_) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn bad_toml_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "vault = \"/tmp\"\nblacklist = \"not a list\"\n");

    match load(&cfg_path).unwrap_err() {
        ConfigError::ParseError(path, _) => assert!(path.ends_with("config.toml")),
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn missing_vault_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    let vault = tmp.path().join("no-such-vault");
    write_file(&cfg_path, &format!("vault = {:?}\n", vault.display().to_string()));

    match load(&cfg_path).unwrap_err() {
        ConfigError::VaultMissing(p) => assert_eq!(p, vault),
        other => panic!("expected VaultMissing, got {other:?}"),
    }
}

#[test]
fn empty_blacklist_entry_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(
        &cfg_path,
        &format!("vault = {:?}\nblacklist = [\"Assets/\", \"\"]\n", tmp.path().display().to_string()),
    );

    match load(&cfg_path).unwrap_err() {
        ConfigError::EmptyExclusion(1) => {}
        other => panic!("expected EmptyExclusion(1), got {other:?}"),
    }
}

#[test]
fn unknown_journal_variable_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(
        &cfg_path,
        &format!(
            "vault = {:?}\njournal_template = \"Daily/{{date}}\"\n",
            tmp.path().display().to_string()
        ),
    );

    let err = load(&cfg_path).unwrap_err();
    assert!(matches!(err, ConfigError::Journal(_)), "got {err:?}");
    assert!(err.to_string().contains("date"));
}
