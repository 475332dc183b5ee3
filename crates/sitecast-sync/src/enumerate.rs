//! Recursive site-tree enumeration.

use crate::error::{Result, SyncError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily enumerate every file under `root`, depth-first.
///
/// Directories are traversed, never emitted. Symbolic links are not
/// followed: a link to a directory is skipped, a link to a file is treated
/// as that file. Walk errors (unreadable subdirectories and the like)
/// surface as `DirectoryAccess` items instead of dropping files silently.
///
/// Re-invoking on an unmodified tree yields the same set of paths; the
/// order within a directory is whatever the filesystem listing provides.
pub fn enumerate(root: &Path) -> Result<impl Iterator<Item = Result<PathBuf>>> {
    if !root.is_dir() {
        let message = if root.exists() {
            "not a directory".to_string()
        } else {
            "no such directory".to_string()
        };
        return Err(SyncError::DirectoryAccess {
            path: root.to_path_buf(),
            message,
        });
    }

    tracing::debug!(root = %root.display(), "Enumerating site tree");

    let walk = WalkDir::new(root).into_iter().filter_map(|entry| {
        match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_dir() {
                    None
                } else if file_type.is_symlink() && entry.path().is_dir() {
                    // Link target is a directory; not traversed, not a file.
                    tracing::warn!(path = %entry.path().display(), "Skipping directory symlink");
                    None
                } else {
                    Some(Ok(entry.into_path()))
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                Some(Err(SyncError::DirectoryAccess {
                    path,
                    message: err.to_string(),
                }))
            }
        }
    });

    Ok(walk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn collect(root: &Path) -> HashSet<PathBuf> {
        enumerate(root)
            .unwrap()
            .collect::<Result<HashSet<_>>>()
            .unwrap()
    }

    #[test]
    fn test_enumerate_emits_every_file_exactly_once() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("404.html"), "missing").unwrap();
        fs::create_dir_all(root.join("images/icons")).unwrap();
        fs::write(root.join("images/logo.png"), [0u8; 4]).unwrap();
        fs::write(root.join("images/icons/favicon.ico"), [0u8; 4]).unwrap();

        let files = collect(root);
        let expected: HashSet<PathBuf> = [
            root.join("index.html"),
            root.join("404.html"),
            root.join("images/logo.png"),
            root.join("images/icons/favicon.ico"),
        ]
        .into_iter()
        .collect();

        assert_eq!(files, expected);
    }

    #[test]
    fn test_enumerate_never_emits_directories() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("a/b/c/file.txt"), "x").unwrap();

        let files = collect(root);
        assert_eq!(files.len(), 1);
        assert!(files.contains(&root.join("a/b/c/file.txt")));
    }

    #[test]
    fn test_enumerate_empty_tree_yields_nothing() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("empty/nested")).unwrap();

        assert!(collect(temp.path()).is_empty());
    }

    #[test]
    fn test_enumerate_is_restartable() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        fs::write(root.join("one.css"), "").unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/two.js"), "").unwrap();

        assert_eq!(collect(root), collect(root));
    }

    #[test]
    fn test_enumerate_missing_root_fails() {
        let temp = tempfile::tempdir().unwrap();
        let err = enumerate(&temp.path().join("does-not-exist")).err().unwrap();
        assert!(matches!(err, SyncError::DirectoryAccess { .. }));
    }

    #[test]
    fn test_enumerate_file_root_fails() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "not a dir").unwrap();

        let err = enumerate(&file).err().unwrap();
        assert!(matches!(err, SyncError::DirectoryAccess { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_file_symlink_is_emitted() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        fs::write(root.join("real.txt"), "content").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();

        let files = collect(root);
        assert!(files.contains(&root.join("link.txt")));
        assert!(files.contains(&root.join("real.txt")));
    }
}
