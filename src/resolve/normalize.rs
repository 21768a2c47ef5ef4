use std::env;
use std::path::PathBuf;

use tracing::debug;

use super::diagnostic::{Diagnostic, Diagnostics};
use super::spec::{EditorSpec, PathSpec};
use crate::expand::Lookup;

/// Finds an executable by name on the executable search path.
pub trait ExecutableSearch {
    fn find(&self, name: &str) -> Option<PathBuf>;
}

/// Searches the directories listed in `PATH` as seen through a [`Lookup`].
pub struct SearchPath<'a> {
    lookup: &'a dyn Lookup,
}

impl<'a> SearchPath<'a> {
    pub fn new(lookup: &'a dyn Lookup) -> Self {
        Self { lookup }
    }
}

impl ExecutableSearch for SearchPath<'_> {
    fn find(&self, name: &str) -> Option<PathBuf> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match which::which_in(name, self.lookup.lookup("PATH"), cwd) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("`{}` not found in PATH: {}", name, e);
                None
            }
        }
    }
}

/// An editor's raw (unexpanded) directories and its effective name.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub name: String,
    pub paths: Vec<String>,
}

/// Turns the path field into an ordered list of directories. An absent path
/// is looked up on the search path; a hit renames the editor to the found
/// binary's file name, a miss yields no directories.
pub fn normalize(
    spec: &EditorSpec,
    search: &dyn ExecutableSearch,
    diagnostics: &mut Diagnostics,
) -> Normalized {
    let name = spec.name.clone();
    match &spec.path {
        PathSpec::Single(path) => Normalized { name, paths: vec![path.clone()] },
        PathSpec::List(paths) => Normalized { name, paths: paths.clone() },
        PathSpec::Absent => {
            let found = search.find(&spec.name).and_then(|path| {
                let dir = path.parent()?.to_string_lossy().into_owned();
                let base = path.file_name()?.to_string_lossy().into_owned();
                Some((dir, base))
            });
            match found {
                Some((dir, base)) => {
                    debug!("Found `{}` as `{}` in `{}`", spec.name, base, dir);
                    Normalized { name: base, paths: vec![dir] }
                }
                None => {
                    diagnostics.push(Diagnostic::NotOnSearchPath { editor: name.clone() });
                    Normalized { name, paths: Vec::new() }
                }
            }
        }
    }
}
