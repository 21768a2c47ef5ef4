use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

/// Runs the script of a `$(...)` or backquote substitution and returns
/// what it wrote to stdout.
pub trait CommandSubstitution {
    fn run(&self, script: &str) -> io::Result<String>;
}

impl<F> CommandSubstitution for F
where
    F: Fn(&str) -> io::Result<String>,
{
    fn run(&self, script: &str) -> io::Result<String> {
        self(script)
    }
}

/// Executes substitutions with `/bin/sh -c`. Stdin is closed and stderr is
/// shared with the caller so the substitution cannot consume the editor's
/// terminal input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shell;

const SHELL: &str = "/bin/sh";

impl CommandSubstitution for Shell {
    fn run(&self, script: &str) -> io::Result<String> {
        debug!("Running command substitution `{}`", script);
        let output = Command::new(SHELL)
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        if !output.status.success() {
            debug!("Command substitution `{}` exited with {}", script, output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
