//! The `status` command: validate the Stackfile, then report uncovered files.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::commands::StatusArgs;
use super::output::{OutputFormatter, StatusReport};
use crate::config::StacklensConfig;
use crate::coverage::{self, analyze_coverage, ScanError};
use crate::stackfile::{self, parse_stackfile, validate_stackfile, StackfileError};

/// Filesystem access used by the status pipeline.
#[async_trait]
pub trait Workspace: Send + Sync {
    async fn load_stackfile(&self, path: &Path) -> Result<String, StackfileError>;

    async fn scan_files(&self, repo_root: &Path) -> Result<Vec<String>, ScanError>;
}

/// [`Workspace`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealWorkspace;

#[async_trait]
impl Workspace for RealWorkspace {
    async fn load_stackfile(&self, path: &Path) -> Result<String, StackfileError> {
        stackfile::load_stackfile(path).await
    }

    async fn scan_files(&self, repo_root: &Path) -> Result<Vec<String>, ScanError> {
        coverage::scan_files(repo_root).await
    }
}

/// Runs the status pipeline and returns the process exit code.
///
/// Domain failures become output plus exit code 1; only failures to write
/// output surface as `Err`.
pub async fn run_status<O: Write, E: Write>(
    args: &StatusArgs,
    config: &StacklensConfig,
    workspace: &dyn Workspace,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<i32> {
    let repo_root = args
        .repository_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let stackfile_path = args
        .stackfile
        .clone()
        .unwrap_or_else(|| config.stackfile_path(&repo_root));
    let formatter = OutputFormatter::new(args.format.into());

    info!(
        repo = %repo_root.display(),
        stackfile = %stackfile_path.display(),
        "Checking Stackfile coverage"
    );

    let text = match workspace.load_stackfile(&stackfile_path).await {
        Ok(text) => text,
        Err(err) => return fail(stderr, &err),
    };

    let raw = match parse_stackfile(&text) {
        Ok(raw) => raw,
        Err(err) => return fail(stderr, &err),
    };

    let document = match validate_stackfile(&raw) {
        Ok(document) => document,
        Err(errors) => {
            debug!(errors = errors.len(), "Stackfile validation failed");
            return emit(&formatter, &StatusReport::Invalid { errors }, stdout, stderr);
        }
    };

    let files = match workspace.scan_files(&repo_root).await {
        Ok(files) => files,
        Err(err) => return fail(stderr, &err),
    };

    let report = match analyze_coverage(&files, &document) {
        Ok(result) => StatusReport::from_coverage(result),
        Err(err) => StatusReport::from_coverage_error(&err),
    };

    emit(&formatter, &report, stdout, stderr)
}

/// Entry point for `stacklens status` on the real filesystem.
pub async fn handle_status(args: &StatusArgs, config: &StacklensConfig) -> i32 {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    match run_status(
        args,
        config,
        &RealWorkspace,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .await
    {
        Ok(code) => code,
        Err(err) => {
            error!("Failed to write status output: {:#}", err);
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

fn fail<E: Write>(stderr: &mut E, err: &dyn std::error::Error) -> Result<i32> {
    debug!(error = %err, "Status pipeline aborted");
    writeln!(stderr, "{}", err).context("Failed to write to stderr")?;
    Ok(1)
}

fn emit<O: Write, E: Write>(
    formatter: &OutputFormatter,
    report: &StatusReport,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<i32> {
    let rendered = formatter.format(report)?;
    stdout
        .write_all(rendered.stdout.as_bytes())
        .context("Failed to write to stdout")?;
    stderr
        .write_all(rendered.stderr.as_bytes())
        .context("Failed to write to stderr")?;
    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use std::io;
    use std::sync::Mutex;

    struct StubWorkspace {
        stackfile: Option<String>,
        files: Vec<String>,
        loaded_from: Mutex<Option<PathBuf>>,
    }

    impl StubWorkspace {
        fn new(stackfile: &str, files: &[&str]) -> Self {
            Self {
                stackfile: Some(stackfile.to_string()),
                files: files.iter().map(|f| f.to_string()).collect(),
                loaded_from: Mutex::new(None),
            }
        }

        fn missing() -> Self {
            Self {
                stackfile: None,
                files: vec![],
                loaded_from: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Workspace for StubWorkspace {
        async fn load_stackfile(&self, path: &Path) -> Result<String, StackfileError> {
            *self.loaded_from.lock().unwrap() = Some(path.to_path_buf());
            self.stackfile
                .clone()
                .ok_or_else(|| StackfileError::NotFound {
                    path: path.to_path_buf(),
                })
        }

        async fn scan_files(&self, _repo_root: &Path) -> Result<Vec<String>, ScanError> {
            Ok(self.files.clone())
        }
    }

    struct Output {
        code: i32,
        stdout: String,
        stderr: String,
    }

    fn args(format: OutputFormatArg) -> StatusArgs {
        StatusArgs {
            repository_path: Some(PathBuf::from("/repo")),
            stackfile: None,
            format,
        }
    }

    fn config() -> StacklensConfig {
        StacklensConfig {
            stackfile_name: ".stack".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
        }
    }

    async fn run(workspace: &StubWorkspace, args: &StatusArgs) -> Output {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_status(args, &config(), workspace, &mut stdout, &mut stderr)
            .await
            .unwrap();
        Output {
            code,
            stdout: String::from_utf8(stdout).unwrap(),
            stderr: String::from_utf8(stderr).unwrap(),
        }
    }

    const TS_STACKFILE: &str = r#"
version: "0.1"
technologies:
  - id: typescript
    detect:
      include: ["**/*.ts"]
"#;

    #[tokio::test]
    async fn test_all_files_covered() {
        let workspace = StubWorkspace::new(TS_STACKFILE, &["src/index.ts"]);
        let out = run(&workspace, &args(OutputFormatArg::Human)).await;

        assert_eq!(out.code, 0);
        assert_eq!(out.stdout, "✓ Stackfile valid. All files are covered.\n");
        assert_eq!(
            *workspace.loaded_from.lock().unwrap(),
            Some(PathBuf::from("/repo/.stack"))
        );
    }

    #[tokio::test]
    async fn test_uncovered_files_listed_sorted() {
        let workspace =
            StubWorkspace::new(TS_STACKFILE, &["src/index.ts", "z.md", "README.md"]);
        let out = run(&workspace, &args(OutputFormatArg::Human)).await;

        assert_eq!(out.code, 1);
        assert_eq!(out.stdout, "README.md\nz.md\n");
        assert_eq!(out.stderr, "2 uncovered file(s) found.\n");
    }

    #[tokio::test]
    async fn test_missing_stackfile() {
        let workspace = StubWorkspace::missing();
        let out = run(&workspace, &args(OutputFormatArg::Json)).await;

        assert_eq!(out.code, 1);
        assert!(out.stdout.is_empty());
        assert_eq!(out.stderr, "Stackfile not found at: /repo/.stack\n");
    }

    #[tokio::test]
    async fn test_stackfile_override() {
        let workspace = StubWorkspace::new(TS_STACKFILE, &[]);
        let mut args = args(OutputFormatArg::Human);
        args.stackfile = Some(PathBuf::from("/elsewhere/stack.yaml"));
        let out = run(&workspace, &args).await;

        assert_eq!(out.code, 0);
        assert_eq!(
            *workspace.loaded_from.lock().unwrap(),
            Some(PathBuf::from("/elsewhere/stack.yaml"))
        );
    }

    #[tokio::test]
    async fn test_invalid_yaml() {
        let workspace = StubWorkspace::new("version: :\n  bad: [\n", &[]);
        let out = run(&workspace, &args(OutputFormatArg::Human)).await;

        assert_eq!(out.code, 1);
        assert!(out.stderr.starts_with("Invalid YAML: "));
    }

    #[tokio::test]
    async fn test_validation_failure_human() {
        let workspace = StubWorkspace::new("technologies: []\n", &["a.ts"]);
        let out = run(&workspace, &args(OutputFormatArg::Human)).await;

        assert_eq!(out.code, 1);
        assert!(out.stdout.is_empty());
        assert!(out.stderr.starts_with("Stackfile validation failed:\n"));
        assert!(out.stderr.contains("  [MISSING_VERSION] "));
    }

    #[tokio::test]
    async fn test_validation_failure_json() {
        let workspace = StubWorkspace::new("technologies: []\n", &[]);
        let out = run(&workspace, &args(OutputFormatArg::Json)).await;

        assert_eq!(out.code, 1);
        let value: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
        assert_eq!(value["status"], "invalid");
        assert_eq!(value["errors"][0]["code"], "MISSING_VERSION");
    }

    #[tokio::test]
    async fn test_conflict() {
        let stackfile = r#"
version: "0.1"
technologies:
  - id: react
    detect:
      include: ["src/**/*.js"]
  - id: vue
    detect:
      include: ["**/*.js"]
"#;
        let workspace = StubWorkspace::new(stackfile, &["src/App.js"]);
        let out = run(&workspace, &args(OutputFormatArg::Human)).await;

        assert_eq!(out.code, 1);
        assert!(out.stdout.is_empty());
        assert!(out.stderr.contains("\"react\" and \"vue\""));
        assert!(out.stderr.contains("\"src/App.js\""));
    }

    #[tokio::test]
    async fn test_scan_failure() {
        struct BrokenScan;

        #[async_trait]
        impl Workspace for BrokenScan {
            async fn load_stackfile(&self, _path: &Path) -> Result<String, StackfileError> {
                Ok(TS_STACKFILE.to_string())
            }

            async fn scan_files(&self, repo_root: &Path) -> Result<Vec<String>, ScanError> {
                Err(ScanError::NotFound(repo_root.to_path_buf()))
            }
        }

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_status(
            &args(OutputFormatArg::Yaml),
            &config(),
            &BrokenScan,
            &mut stdout,
            &mut stderr,
        )
        .await
        .unwrap();

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "Repository path does not exist: /repo\n"
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_an_error() {
        struct ClosedPipe;

        impl Write for ClosedPipe {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let workspace = StubWorkspace::new(TS_STACKFILE, &["a.ts"]);
        let mut stderr = Vec::new();
        let result = run_status(
            &args(OutputFormatArg::Human),
            &config(),
            &workspace,
            &mut ClosedPipe,
            &mut stderr,
        )
        .await;
        assert!(result.is_err());
    }
}
