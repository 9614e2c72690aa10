//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path to the compiled `stacklens` binary
pub fn stacklens_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_stacklens"))
}

/// Writes `content` to `rel` under `root`, creating parent directories
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write file");
}

/// Creates a temporary repository with the given Stackfile and files
pub fn create_repo(stackfile: Option<&str>, files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    if let Some(stackfile) = stackfile {
        write_file(dir.path(), ".stack", stackfile);
    }
    for file in files {
        write_file(dir.path(), file, "");
    }
    dir
}

pub fn yaml(source: &str) -> serde_yaml::Value {
    serde_yaml::from_str(source).expect("Test YAML must parse")
}

/// Stackfile covering TypeScript sources, the Stackfile itself and ignore files
pub const TYPESCRIPT_STACKFILE: &str = r#"version: "0.1"
technologies:
  - id: typescript
    detect:
      include: ["**/*.ts"]
  - id: tooling
    detect:
      include: [".stack", ".gitignore"]
"#;
