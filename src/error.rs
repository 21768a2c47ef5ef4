use std::process::ExitCode;

use thiserror::Error;

use crate::launch::LaunchError;
use crate::resolve::{ConfigShapeError, NotFoundError};

/// Exit status for an unusable config (sysexits `EX_CONFIG`).
pub const EXIT_CONFIG: u8 = 78;
/// Exit status when the selected editor could not be started.
pub const EXIT_CANNOT_EXECUTE: u8 = 126;
/// Exit status when no candidate was usable.
pub const EXIT_NOT_FOUND: u8 = 127;

/// Conditions that end the run, each with its own exit status.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Config(#[from] anyhow::Error),

    #[error(transparent)]
    Shape(#[from] ConfigShapeError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl Failure {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(match self {
            Failure::Config(_) | Failure::Shape(_) => EXIT_CONFIG,
            Failure::NotFound(_) => EXIT_NOT_FOUND,
            Failure::Launch(_) => EXIT_CANNOT_EXECUTE,
        })
    }
}
