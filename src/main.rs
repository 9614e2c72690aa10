use stacklens::cli::commands::{CliArgs, Commands};
use stacklens::cli::status::handle_status;
use stacklens::util::logging::parse_level;
use stacklens::util::{init_logging, LoggingConfig};
use stacklens::{StacklensConfig, VERSION};

use clap::{CommandFactory, Parser};
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config = match StacklensConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    init_logging_from_args(&args, &config);

    debug!("stacklens v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Some(Commands::Status(status_args)) => handle_status(status_args, &config).await,
        None => print_help(),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &StacklensConfig) {
    let mut logging = LoggingConfig::from_config(config);
    logging.level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        logging.level
    };
    init_logging(logging);
}

fn print_help() -> i32 {
    match CliArgs::command().print_help() {
        Ok(()) => {
            println!();
            0
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            1
        }
    }
}
