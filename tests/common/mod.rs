#![allow(dead_code)]

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SEED: &str = r#"{
  "student": {
    "name": "Alex Johnson",
    "testDate": "2024-01-15",
    "testType": "Speaking Assessment"
  },
  "overallScore": 7,
  "skills": { "pronunciation": 7, "fluency": 6, "vocabulary": 8, "grammar": 6 },
  "feedback": {
    "title": "Good Performance",
    "description": "Generally effective command of the language despite some inaccuracies. Can handle complex situations fairly well.",
    "suggestions": ["Work on grammatical accuracy", "Practice speaking on unfamiliar topics"]
  }
}"#;

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

pub struct Server {
    pub child: Child,
    pub base_url: String,
    pub workspace: PathBuf,
}

impl Server {
    pub fn data_path(&self) -> PathBuf {
        self.workspace.join("report.json")
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.workspace);
    }
}

pub fn serve_command(data: &Path, static_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bandreportd"));
    cmd.arg("serve")
        .arg("--port")
        .arg("0")
        .arg("--data")
        .arg(data)
        .arg("--static-dir")
        .arg(static_dir)
        .env("RUST_LOG", "warn");
    cmd
}

/// Starts `serve` on a free port over a fresh copy of `seed`.
pub fn spawn_server(prefix: &str, seed: &str) -> Server {
    let workspace = temp_dir(prefix);
    let data = workspace.join("report.json");
    std::fs::write(&data, seed).expect("write seed data");
    let static_dir = workspace.join("client");
    std::fs::create_dir_all(&static_dir).expect("create static dir");
    std::fs::write(static_dir.join("index.html"), "<h1>dashboard</h1>").expect("write index");

    let mut child = serve_command(&data, &static_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn bandreportd serve");
    let stdout = child.stdout.take().expect("child stdout");

    let mut line = String::new();
    BufReader::new(stdout)
        .read_line(&mut line)
        .expect("read listening line");
    let base_url = line
        .trim()
        .strip_prefix("listening on ")
        .unwrap_or_else(|| panic!("unexpected first line: {line:?}"))
        .to_string();

    Server {
        child,
        base_url,
        workspace,
    }
}
