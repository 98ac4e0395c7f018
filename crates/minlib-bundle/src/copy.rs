//! File and directory copy helpers

use minlib_core::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copy one file, creating the destination's parent directories.
///
/// Errors name the source path. Copying a file onto itself is refused
/// because `fs::copy` truncates the destination before reading.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if is_same_file(from, to) {
        return Err(same_file_error(from, to));
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| copy_error(from, parent, e))?;
    }
    fs::copy(from, to).map_err(|e| copy_error(from, to, e))?;
    Ok(())
}

/// Recursively copy the contents of `from` into `to`, overwriting existing
/// files. Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    if is_same_file(from, to) || is_nested_in(to, from) {
        return Err(same_file_error(from, to));
    }
    fs::create_dir_all(to).map_err(|e| copy_error(from, to, e))?;

    let mut copied = 0;
    for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| from.to_path_buf());
            Error::fs(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| copy_error(entry.path(), &target, e))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Both paths exist and resolve to the same filesystem entry
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `inner` lies below `outer`. `inner` may not exist yet, so its nearest
/// existing ancestor is resolved instead.
fn is_nested_in(inner: &Path, outer: &Path) -> bool {
    let Ok(outer) = fs::canonicalize(outer) else {
        return false;
    };
    let mut missing = Vec::new();
    let mut current = inner;
    loop {
        if let Ok(resolved) = fs::canonicalize(current) {
            let full = missing.iter().rev().fold(resolved, |acc: PathBuf, part| acc.join(part));
            return full != outer && full.starts_with(&outer);
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_owned());
                current = parent;
            }
            _ => return false,
        }
    }
}

fn copy_error(from: &Path, to: &Path, cause: io::Error) -> Error {
    let message = format!("copying to {}: {}", to.display(), cause);
    Error::fs(from, io::Error::new(cause.kind(), message))
}

fn same_file_error(from: &Path, to: &Path) -> Error {
    let message = format!("{} is the same file as or lies inside the source", to.display());
    Error::fs(from, io::Error::new(io::ErrorKind::InvalidInput, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_file_creates_parents() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("a.h");
        fs::write(&src, "int a;").unwrap();

        let dst = temp.path().join("out/nested/a.h");
        copy_file(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst).unwrap(), "int a;");
    }

    #[test]
    fn test_copy_file_missing_source_names_it() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("gone.h");
        let err = copy_file(&src, &temp.path().join("x.h")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { path, .. } if path == src));
    }

    #[test]
    fn test_copy_tree_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let from = temp.path().join("from");
        let to = temp.path().join("to");
        fs::create_dir_all(from.join("sub")).unwrap();
        fs::write(from.join("a.h"), "new").unwrap();
        fs::write(from.join("sub/b.h"), "b").unwrap();
        fs::create_dir_all(&to).unwrap();
        fs::write(to.join("a.h"), "old").unwrap();
        fs::write(to.join("keep.h"), "keep").unwrap();

        assert_eq!(copy_tree(&from, &to).unwrap(), 2);
        assert_eq!(fs::read_to_string(to.join("a.h")).unwrap(), "new");
        assert_eq!(fs::read_to_string(to.join("sub/b.h")).unwrap(), "b");
        assert_eq!(fs::read_to_string(to.join("keep.h")).unwrap(), "keep");
    }

    #[test]
    fn test_copy_file_onto_itself_keeps_contents() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("a.h");
        fs::write(&src, "int a;").unwrap();

        let err = copy_file(&src, &temp.path().join(".").join("a.h")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { ref path, .. } if path == &src));
        assert_eq!(fs::read_to_string(&src).unwrap(), "int a;");
    }

    #[test]
    fn test_copy_tree_into_own_subdirectory_refused() {
        let temp = tempfile::tempdir().unwrap();
        let from = temp.path().join("from");
        fs::create_dir_all(&from).unwrap();
        fs::write(from.join("a.h"), "a").unwrap();

        let err = copy_tree(&from, &from.join("nested/copy")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { ref path, .. } if path == &from));
        assert!(!from.join("nested").exists());
    }

    #[test]
    fn test_copy_file_parent_failure_names_source() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("a.h");
        fs::write(&src, "int a;").unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();

        let err = copy_file(&src, &blocker.join("a.h")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&src.display().to_string()));
        assert!(message.contains(&blocker.display().to_string()));
        assert!(matches!(err, Error::FileSystem { ref path, .. } if path == &src));
    }
}
