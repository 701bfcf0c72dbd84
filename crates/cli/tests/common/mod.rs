#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use assert_cmd::Command;

use tempfile::{TempDir, tempdir};

pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    /// A home directory with an empty `vault/` inside it.
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("vault")).unwrap();
        Self { dir }
    }

    /// The sample vault used across command tests.
    pub fn sample() -> Self {
        let sb = Self::new();
        sb.write("Notes/a.md", "---\nstatus: active\narea: work\ntitle: Alpha\n---\n# A\n");
        sb.write("Notes/b.md", "---\nstatus: done\n---\n# B\n");
        sb.write("Notes/c.md", "---\nstatus: active\narea: home\n---\n# C\n");
        sb.write("Assets/d.md", "---\nstatus: active\n---\n");
        sb.write("plain.md", "no metadata here\n");
        sb
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    pub fn vault(&self) -> PathBuf {
        self.dir.path().join("vault")
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.vault().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.vault().join(rel)).unwrap()
    }

    /// The binary with a clean environment and no vault selected.
    pub fn bare(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("obsidian-cli"));
        cmd.current_dir(self.home())
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env_remove("OBSIDIAN_VAULT")
            .env_remove("OBSIDIAN_CONFIG")
            .env_remove("OBSIDIAN_BLACKLIST")
            .env_remove("EDITOR")
            .env_remove("RUST_LOG");
        cmd
    }

    /// The binary pointed at the sandbox vault.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare();
        cmd.arg("--vault").arg(self.vault());
        cmd
    }
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}
