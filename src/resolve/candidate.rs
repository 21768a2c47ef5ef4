use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

/// An editor after path and env expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEditor {
    pub name: String,
    pub directories: Vec<String>,
    pub environment: Rc<[String]>,
}

/// One executable location to try, with the overlay of its editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub command: PathBuf,
    pub environment: Rc<[String]>,
}

/// Flattens editors into candidates: editor order first, then directory
/// order within each editor.
pub fn build_candidates(editors: &[ResolvedEditor]) -> Vec<Candidate> {
    editors
        .iter()
        .flat_map(|editor| {
            editor.directories.iter().map(|dir| Candidate {
                command: Path::new(dir).join(relative(&editor.name)),
                environment: Rc::clone(&editor.environment),
            })
        })
        .collect()
}

/// `name` without its root, so joining always stays under the directory.
fn relative(name: &str) -> PathBuf {
    Path::new(name)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn editor(name: &str, dirs: &[&str], env: &[&str]) -> ResolvedEditor {
        ResolvedEditor {
            name: name.into(),
            directories: dirs.iter().map(|d| d.to_string()).collect(),
            environment: env.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn commands(candidates: &[Candidate]) -> Vec<String> {
        candidates.iter().map(|c| c.command.display().to_string()).collect()
    }

    #[test]
    fn test_build_candidates_order() {
        let editors = vec![
            editor("nvim", &["/opt/nvim/bin", "/usr/local/bin"], &["A=1"]),
            editor("ghost", &[], &[]),
            editor("vim", &["/usr/bin"], &[]),
        ];
        let candidates = build_candidates(&editors);
        assert_eq!(
            commands(&candidates),
            vec!["/opt/nvim/bin/nvim", "/usr/local/bin/nvim", "/usr/bin/vim"]
        );
        assert_eq!(&*candidates[1].environment, &["A=1".to_string()]);
        assert!(Rc::ptr_eq(&candidates[0].environment, &candidates[1].environment));
        assert!(candidates[2].environment.is_empty());
    }

    #[test]
    fn test_reordering_changes_order_not_membership() {
        let a = editor("a", &["/1", "/2"], &[]);
        let b = editor("b", &["/3"], &[]);
        let forward = commands(&build_candidates(&[a.clone(), b.clone()]));
        let backward = commands(&build_candidates(&[b, a]));
        assert_eq!(forward, vec!["/1/a", "/2/a", "/3/b"]);
        assert_eq!(backward, vec!["/3/b", "/1/a", "/2/a"]);

        let mut sorted_forward = forward.clone();
        let mut sorted_backward = backward.clone();
        sorted_forward.sort();
        sorted_backward.sort();
        assert_eq!(sorted_forward, sorted_backward);
    }

    #[test]
    fn test_absolute_name_stays_under_directory() {
        let candidates = build_candidates(&[editor("/usr/bin/vim", &["/opt", "/home/u/bin"], &[])]);
        assert_eq!(commands(&candidates), vec!["/opt/usr/bin/vim", "/home/u/bin/usr/bin/vim"]);
    }

    #[test]
    fn test_build_candidates_empty() {
        assert!(build_candidates(&[]).is_empty());
    }
}
