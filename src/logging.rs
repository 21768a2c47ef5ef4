use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber. `filter` uses `EnvFilter` syntax
/// (`warn`, `eeditor=debug`, ...). Events go to `log_file` when given,
/// otherwise to stderr.
pub fn init(filter: &str, log_file: Option<&Path>) -> Result<()> {
    let env_filter =
        EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter `{}`", filter))?;

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Fail to open log file `{}`", path.display()))?;
            Some(
                fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(Mutex::new(file))
                    .with_target(false)
                    .with_ansi(false),
            )
        }
        None => None,
    };
    let stderr_layer = log_file.is_none().then(|| {
        fmt::layer().with_writer(std::io::stderr).with_target(false).without_time()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
