pub mod commands;
pub mod output;
pub mod status;

pub use commands::{CliArgs, Commands, OutputFormatArg, StatusArgs};
pub use output::{OutputFormat, OutputFormatter, RenderedReport, StatusReport};
pub use status::{handle_status, run_status, RealWorkspace, Workspace};
