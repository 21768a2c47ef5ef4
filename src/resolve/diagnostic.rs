use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::expand::ExpansionError;

/// A recoverable problem met during resolution. The entry it concerns was
/// skipped and resolution carried on.
#[derive(Debug, Error)]
pub enum Diagnostic {
    #[error("Could not find `{editor}` in PATH")]
    NotOnSearchPath { editor: String },

    #[error("Could not resolve path `{path}` of `{editor}`: {error}")]
    PathExpansion {
        editor: String,
        path: String,
        #[source]
        error: ExpansionError,
    },

    #[error("Could not resolve env `{key}` of `{editor}`: {error}")]
    EnvExpansion {
        editor: String,
        key: String,
        #[source]
        error: ExpansionError,
    },

    #[error("Skipping `{}`: {reason}", .command.display())]
    Rejected {
        command: PathBuf,
        #[source]
        reason: Rejection,
    },
}

/// Why a candidate failed validation.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("cannot stat: {0}")]
    Missing(#[source] io::Error),
    #[error("not a regular file")]
    NotAFile,
    #[error("not executable")]
    NotExecutable,
}

#[derive(Debug, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Sends every collected diagnostic to the log.
    pub fn emit(&self) {
        for diagnostic in self.iter() {
            warn!("{}", diagnostic);
        }
    }
}
