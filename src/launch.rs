use std::env;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{info, warn};

use crate::resolve::Candidate;

#[derive(Debug, Error)]
#[error("Could not run `{}`", .command.display())]
pub struct LaunchError {
    pub command: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Splits `KEY=VALUE` assignments at the first `=`.
pub fn overlay(environment: &[String]) -> Vec<(&str, &str)> {
    environment
        .iter()
        .filter_map(|assignment| {
            let pair = assignment.split_once('=');
            if pair.is_none() {
                warn!("Ignoring env assignment without `=`: `{}`", assignment);
            }
            pair
        })
        .collect()
}

/// Builds the command for `candidate`: `inherited` first, the candidate's
/// overlay on top, arguments untouched, standard streams shared.
pub fn build_command<I>(candidate: &Candidate, args: &[OsString], inherited: I) -> Command
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut command = Command::new(&candidate.command);
    command
        .args(args)
        .env_clear()
        .envs(inherited)
        .envs(overlay(&candidate.environment))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    command
}

/// Runs the selected editor and waits for it to exit.
pub fn launch(candidate: &Candidate, args: &[OsString]) -> Result<ExitStatus, LaunchError> {
    info!("Running `{}` with {:?}", candidate.command.display(), candidate.environment);
    build_command(candidate, args, env::vars_os())
        .status()
        .map_err(|source| LaunchError { command: candidate.command.clone(), source })
}

/// The exit code to report for a finished child. Death by signal N maps to
/// 128 + N like a shell does.
pub fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return code as u8;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return (128 + signal) as u8;
        }
    }
    1
}
