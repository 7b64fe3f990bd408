#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn vitae_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vitae").unwrap();
    cmd.env_remove("VITAE_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("EDITOR");
    cmd.env_remove("VISUAL");
    cmd
}

/// Initialized project with a shared resume config and template
pub fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    vitae_cmd().arg("init").arg(temp.path()).assert().success();

    let shared = temp.path().join("shared");
    fs::write(
        shared.join("resume.yaml"),
        "name: !bf Ada Lovelace\nskills: !items-double [Rust, Go, LaTeX]\n",
    )
    .unwrap();
    fs::write(
        shared.join("resume.tex.j2"),
        "\\name{<@ config.name @>}\n<& for line in config.skills &>\n<@ line @>\n<& endfor &>\n",
    )
    .unwrap();
    temp
}

/// Set a config key through the CLI
pub fn set_config(root: &Path, key: &str, value: &str) {
    vitae_cmd()
        .current_dir(root)
        .args(["config", key, value])
        .assert()
        .success();
}
