//! Turns configured editors into an ordered list of candidates and picks
//! the first one that can be executed.
//!
//! Every step is a fold: per-entry failures become [`Diagnostic`]s and the
//! entry is skipped. Only a malformed `path` field ([`ConfigShapeError`]) and
//! an exhausted candidate list ([`NotFoundError`]) are fatal.

mod candidate;
mod diagnostic;
mod env;
mod normalize;
mod select;
mod spec;

use std::rc::Rc;

pub use candidate::{Candidate, ResolvedEditor, build_candidates};
pub use diagnostic::{Diagnostic, Diagnostics, Rejection};
pub use env::resolve_env;
pub use normalize::{ExecutableSearch, Normalized, SearchPath, normalize};
pub use select::{FileInfo, FileProbe, Filesystem, NotFoundError, check, select};
pub use spec::{ConfigShapeError, EditorSpec, PathSpec};

use crate::expand::Expander;

/// Candidates in priority order plus whatever was skipped on the way.
#[derive(Debug)]
pub struct Resolution {
    pub candidates: Vec<Candidate>,
    pub diagnostics: Diagnostics,
}

pub struct Resolver<'a> {
    expander: Expander<'a>,
    search: &'a dyn ExecutableSearch,
}

impl<'a> Resolver<'a> {
    pub fn new(expander: Expander<'a>, search: &'a dyn ExecutableSearch) -> Self {
        Self { expander, search }
    }

    /// Normalizes and expands one editor.
    pub fn resolve_editor(&self, spec: &EditorSpec, diagnostics: &mut Diagnostics) -> ResolvedEditor {
        let Normalized { name, paths } = normalize(spec, self.search, diagnostics);
        let environment = resolve_env(&name, &spec.env, &self.expander, diagnostics);

        let directories = paths
            .into_iter()
            .filter_map(|path| match self.expander.expand(&path) {
                Ok(dir) => Some(dir),
                Err(error) => {
                    diagnostics.push(Diagnostic::PathExpansion {
                        editor: name.clone(),
                        path,
                        error,
                    });
                    None
                }
            })
            .collect();

        ResolvedEditor { name, directories, environment: Rc::from(environment) }
    }

    pub fn resolve(&self, specs: &[EditorSpec]) -> Resolution {
        let mut diagnostics = Diagnostics::default();
        let editors: Vec<_> =
            specs.iter().map(|spec| self.resolve_editor(spec, &mut diagnostics)).collect();
        Resolution { candidates: build_candidates(&editors), diagnostics }
    }
}
