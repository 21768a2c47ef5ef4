use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    version = concat!(
        env!("CARGO_PKG_VERSION"), " (",
        env!("VERGEN_BUILD_DATE"), ")"
    ),
    about
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, env = "EEDITOR_CONFIG", value_name = "PATH")]
    pub config: Option<String>,

    /// Log filter, e.g. `warn` or `eeditor=debug`
    #[arg(long, env = "EEDITOR_LOG", value_name = "FILTER", default_value = "off")]
    pub log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "EEDITOR_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the selected editor and its environment instead of running it
    #[arg(short = 'n', long, conflicts_with = "list")]
    pub dry_run: bool,

    /// Print every candidate in priority order with its status
    #[arg(long)]
    pub list: bool,

    /// Arguments passed to the editor unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<OsString>,
}
