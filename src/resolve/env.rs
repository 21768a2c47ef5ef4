use indexmap::IndexMap;

use super::diagnostic::{Diagnostic, Diagnostics};
use crate::expand::Expander;

/// Expands each value of an editor's `env` map into a `KEY=VALUE` string.
/// A value that fails to expand drops only its own key.
pub fn resolve_env(
    editor: &str,
    env: &IndexMap<String, String>,
    expander: &Expander<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    env.iter()
        .filter_map(|(key, value)| match expander.expand(value) {
            Ok(value) => Some(format!("{}={}", key, value)),
            Err(error) => {
                diagnostics.push(Diagnostic::EnvExpansion {
                    editor: editor.to_string(),
                    key: key.clone(),
                    error,
                });
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(name: &str) -> Option<String> {
        (name == "HOME").then(|| "/home/u".to_string())
    }

    fn no_commands(_: &str) -> io::Result<String> {
        Err(io::Error::other("disabled"))
    }

    #[test]
    fn test_resolve_env_expands_and_skips() {
        let expander = Expander::new(&lookup, &no_commands);
        let mut env = IndexMap::new();
        env.insert("VIMINIT".to_string(), "source $HOME/.vimrc".to_string());
        env.insert("BROKEN".to_string(), "${HOME".to_string());
        env.insert("NEEDED".to_string(), "${MISSING:?set it}".to_string());
        env.insert("EDITOR_MODE".to_string(), "pro".to_string());

        let mut diagnostics = Diagnostics::default();
        let resolved = resolve_env("vim", &env, &expander, &mut diagnostics);

        assert_eq!(resolved, vec!["VIMINIT=source /home/u/.vimrc", "EDITOR_MODE=pro"]);
        let skipped: Vec<_> = diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::EnvExpansion { key, .. } => key.as_str(),
                other => panic!("unexpected diagnostic: {other}"),
            })
            .collect();
        assert_eq!(skipped, vec!["BROKEN", "NEEDED"]);
    }
}
