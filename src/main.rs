use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, ValueHint};
use tracing::{debug, error};

use crate::config::Config;
use crate::error::Failure;
use crate::expand::Expander;
use crate::resolve::{EditorSpec, Filesystem, Resolution, Resolver, SearchPath};

mod cli;
mod config;
mod error;
mod expand;
mod launch;
mod logging;
mod panic;
mod resolve;

fn main() -> ExitCode {
    if let Err(e) = panic::install() {
        eprintln!("{}: {:#}", env!("CARGO_PKG_NAME"), e);
    }

    // Enhance the help message for the config argument
    let help = "Path to config file (default: first of $XDG_CONFIG_HOME/eeditor/eeditor.yml, \
                ~/.config/eeditor/eeditor.yml, ~/.eeditor.yml, /etc/eeditor/eeditor.yml)";
    let cmd = cli::Cli::command()
        .mut_arg("config", |a| a.help(help).value_hint(ValueHint::FilePath).next_line_help(true));
    let args = match cli::Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    if let Err(e) = logging::init(&args.log_level, args.log_file.as_deref()) {
        eprintln!("{}: {:#}", env!("CARGO_PKG_NAME"), e);
    }

    match run(args) {
        Ok(code) => code,
        Err(failure) => {
            error!("{:?}", failure);
            eprintln!("{}: {:#}", env!("CARGO_PKG_NAME"), failure);
            failure.exit_code()
        }
    }
}

fn run(args: cli::Cli) -> Result<ExitCode, Failure> {
    let expander = Expander::process();
    let config = Config::load(args.config.as_deref(), &expander)?;
    debug!("Using config `{}`", config.path.display());

    let specs = EditorSpec::from_entries(&config.editors)?;
    let search = SearchPath::new(expander.lookup());
    let Resolution { candidates, mut diagnostics } = Resolver::new(expander, &search).resolve(&specs);

    if args.list {
        diagnostics.emit();
        for candidate in &candidates {
            let status = match resolve::check(&Filesystem, &candidate.command) {
                Ok(()) => "ok",
                Err(resolve::Rejection::Missing(_)) => "missing",
                Err(resolve::Rejection::NotAFile) => "not-a-file",
                Err(resolve::Rejection::NotExecutable) => "not-executable",
            };
            println!("{:<15} {}", status, candidate.command.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let selected = resolve::select(candidates, &Filesystem, &mut diagnostics);
    diagnostics.emit();
    let candidate = selected?;

    if args.dry_run {
        println!("{}", candidate.command.display());
        for assignment in candidate.environment.iter() {
            println!("{}", assignment);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let status = launch::launch(&candidate, &args.args)?;
    debug!("`{}` exited with {}", candidate.command.display(), status);
    Ok(ExitCode::from(launch::exit_code(status)))
}
