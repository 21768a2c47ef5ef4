use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::candidate::Candidate;
use super::diagnostic::{Diagnostic, Diagnostics, Rejection};

/// What the selector needs to know about a file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileInfo {
    pub is_file: bool,
    /// Unix permission bits.
    pub mode: u32,
}

impl FileInfo {
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

pub trait FileProbe {
    fn probe(&self, path: &Path) -> io::Result<FileInfo>;
}

/// Reads real file metadata. Symlinks are followed, so a dangling link
/// counts as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filesystem;

impl FileProbe for Filesystem {
    fn probe(&self, path: &Path) -> io::Result<FileInfo> {
        let metadata = fs::metadata(path)?;
        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode()
        };
        #[cfg(not(unix))]
        let mode = 0o755;
        Ok(FileInfo { is_file: metadata.is_file(), mode })
    }
}

#[derive(Debug, Error)]
#[error("Could not find any usable editor ({tried} candidate(s) tried)")]
pub struct NotFoundError {
    pub tried: usize,
}

/// Validates a single path.
pub fn check(probe: &dyn FileProbe, path: &Path) -> Result<(), Rejection> {
    let info = probe.probe(path).map_err(Rejection::Missing)?;
    if !info.is_file {
        return Err(Rejection::NotAFile);
    }
    if !info.is_executable() {
        return Err(Rejection::NotExecutable);
    }
    Ok(())
}

/// Returns the first candidate that passes [`check`], in order. Rejected
/// candidates are recorded in `diagnostics`.
pub fn select(
    candidates: Vec<Candidate>,
    probe: &dyn FileProbe,
    diagnostics: &mut Diagnostics,
) -> Result<Candidate, NotFoundError> {
    let tried = candidates.len();
    for candidate in candidates {
        debug!("candidate={}", candidate.command.display());
        match check(probe, &candidate.command) {
            Ok(()) => return Ok(candidate),
            Err(reason) => {
                diagnostics.push(Diagnostic::Rejected { command: candidate.command, reason })
            }
        }
    }
    Err(NotFoundError { tried })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    /// In-memory filesystem that records every probed path.
    #[derive(Default)]
    struct FakeFs {
        files: HashMap<PathBuf, FileInfo>,
        probed: RefCell<Vec<PathBuf>>,
    }

    impl FakeFs {
        fn with(mut self, path: &str, is_file: bool, mode: u32) -> Self {
            self.files.insert(PathBuf::from(path), FileInfo { is_file, mode });
            self
        }
    }

    impl FileProbe for FakeFs {
        fn probe(&self, path: &Path) -> io::Result<FileInfo> {
            self.probed.borrow_mut().push(path.to_path_buf());
            self.files.get(path).copied().ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn candidate(path: &str) -> Candidate {
        Candidate { command: PathBuf::from(path), environment: Rc::from(Vec::new()) }
    }

    #[test]
    fn test_select_skips_invalid() {
        let fs = FakeFs::default().with("/a", true, 0o644).with("/c", true, 0o700).with("/d", true, 0o755);
        let mut diagnostics = Diagnostics::default();

        let selected =
            select(vec![candidate("/a"), candidate("/b"), candidate("/c"), candidate("/d")], &fs, &mut diagnostics)
                .unwrap();

        assert_eq!(selected.command, PathBuf::from("/c"));
        // stops at the first usable candidate
        assert_eq!(*fs.probed.borrow(), vec![PathBuf::from("/a"), "/b".into(), "/c".into()]);

        let reasons: Vec<_> = diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::Rejected { reason, .. } => reason.to_string(),
                other => panic!("unexpected diagnostic: {other}"),
            })
            .collect();
        assert_eq!(reasons[0], "not executable");
        assert!(reasons[1].starts_with("cannot stat"), "{}", reasons[1]);
    }

    #[test]
    fn test_select_rejects_directories() {
        let fs = FakeFs::default().with("/usr/bin", false, 0o755);
        let mut diagnostics = Diagnostics::default();
        let err = select(vec![candidate("/usr/bin")], &fs, &mut diagnostics).unwrap_err();
        assert_eq!(err.tried, 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::Rejected { reason: Rejection::NotAFile, .. })
        ));
    }

    #[test]
    fn test_select_empty() {
        let mut diagnostics = Diagnostics::default();
        let err = select(Vec::new(), &FakeFs::default(), &mut diagnostics).unwrap_err();
        assert_eq!(err.tried, 0);
        assert_eq!(diagnostics.iter().count(), 0);
    }

    #[test]
    fn test_executable_bits() {
        for mode in [0o100, 0o010, 0o001, 0o755] {
            assert!(FileInfo { is_file: true, mode }.is_executable(), "{mode:o}");
        }
        assert!(!FileInfo { is_file: true, mode: 0o666 }.is_executable());
    }

    #[cfg(unix)]
    #[test]
    fn test_filesystem_probe() {
        use std::os::unix::fs::{PermissionsExt, symlink};

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("exe");
        let plain = dir.path().join("plain");
        let dangling = dir.path().join("dangling");
        fs::write(&exe, "").unwrap();
        fs::write(&plain, "").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();
        symlink(dir.path().join("nowhere"), &dangling).unwrap();

        assert!(check(&Filesystem, &exe).is_ok());
        assert!(matches!(check(&Filesystem, &plain), Err(Rejection::NotExecutable)));
        assert!(matches!(check(&Filesystem, dir.path()), Err(Rejection::NotAFile)));
        assert!(matches!(check(&Filesystem, &dangling), Err(Rejection::Missing(_))));
    }
}
