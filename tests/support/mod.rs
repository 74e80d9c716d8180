#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const USER: &str = "alice";
pub const PASSWORD: &str = "Secret1!";

/// A scratch data directory for one test.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_file(&self, rel_path: &str) -> std::io::Result<String> {
        fs::read_to_string(self.dir.path().join(rel_path))
    }

    pub fn tasks_file(&self, user: &str) -> String {
        format!("tasks/{user}.txt")
    }

    /// `taskline` pointed at this data directory, with no credentials.
    pub fn cmd(&self) -> Command {
        let mut cmd = taskline_cmd();
        cmd.env("TASKLINE_DATA_DIR", self.dir.path());
        cmd
    }

    /// `taskline` pointed at this data directory, logged in as `user`.
    pub fn user_cmd(&self, user: &str, password: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["--user", user, "--password", password]);
        cmd
    }

    /// `taskline` logged in as the default test account.
    pub fn alice(&self) -> Command {
        self.user_cmd(USER, PASSWORD)
    }

    pub fn register(&self, user: &str, password: &str) {
        self.user_cmd(user, password)
            .arg("register")
            .assert()
            .success();
    }

    pub fn register_alice(&self) {
        self.register(USER, PASSWORD);
    }

    pub fn add_task(&self, title: &str, due: &str) {
        self.alice()
            .args(["task", "add", title, "--due", due])
            .assert()
            .success();
    }

    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .alice()
            .arg("--json")
            .args(args)
            .output()
            .expect("run taskline");
        assert!(
            output.status.success(),
            "taskline {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("json output")
    }
}

pub fn taskline_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskline").expect("binary");
    for var in [
        "TASKLINE_DATA_DIR",
        "TASKLINE_USER",
        "TASKLINE_PASSWORD",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}
