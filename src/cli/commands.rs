use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Semantic technology stack projection toolkit
#[derive(Parser, Debug)]
#[command(
    name = "stacklens",
    about = "Semantic technology stack projection toolkit",
    version,
    long_about = "stacklens classifies a repository's files against the technologies declared \
                  in its Stackfile (.stack) and reports every file no technology accounts for."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Validate the Stackfile and report uncovered files",
        long_about = "Validate the Stackfile and report uncovered files.\n\n\
                      Loads the Stackfile from the repository root, validates it, lists every \
                      non-ignored file and reports the files no technology matches. Exits 0 \
                      only when the Stackfile is valid and every file is covered.\n\n\
                      Examples:\n  \
                      stacklens status\n  \
                      stacklens status /path/to/repo\n  \
                      stacklens status --format json"
    )]
    Status(StatusArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to repository (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        help = "Stackfile location (defaults to <PATH>/.stack)"
    )]
    pub stackfile: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand() {
        let args = CliArgs::parse_from(["stacklens"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_default_status_args() {
        let args = CliArgs::parse_from(["stacklens", "status"]);
        match args.command {
            Some(Commands::Status(status)) => {
                assert_eq!(status.format, OutputFormatArg::Human);
                assert!(status.repository_path.is_none());
                assert!(status.stackfile.is_none());
            }
            other => panic!("Expected Status command, got {:?}", other),
        }
    }

    #[test]
    fn test_status_with_options() {
        let args = CliArgs::parse_from([
            "stacklens",
            "status",
            "/tmp/repo",
            "--stackfile",
            "/tmp/repo/config/stack.yaml",
            "--format",
            "json",
        ]);
        match args.command {
            Some(Commands::Status(status)) => {
                assert_eq!(status.repository_path, Some(PathBuf::from("/tmp/repo")));
                assert_eq!(
                    status.stackfile,
                    Some(PathBuf::from("/tmp/repo/config/stack.yaml"))
                );
                assert_eq!(status.format, OutputFormatArg::Json);
            }
            other => panic!("Expected Status command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["stacklens", "-v", "status"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["stacklens", "status", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["stacklens", "--log-level", "debug", "status"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["stacklens", "-v", "-q", "status"]).is_err());
    }
}
