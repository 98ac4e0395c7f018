//! Core type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

/// The de-duplicated set of files a bundle needs.
///
/// Both lists keep first-seen order and reject exact duplicates, so the
/// strings pushed in must already be normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Absolute, normalized, in-scope header paths
    pub include_files: Vec<String>,
    /// Library file names as requested
    pub lib_files: Vec<String>,
}

impl BundleManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a header path. Returns false if it was already present.
    pub fn add_include(&mut self, path: impl Into<String>) -> bool {
        push_unique(&mut self.include_files, path.into())
    }

    /// Record a library file name. Returns false if it was already present.
    pub fn add_lib(&mut self, name: impl Into<String>) -> bool {
        push_unique(&mut self.lib_files, name.into())
    }

    /// Extend the library list, skipping names already recorded
    pub fn extend_libs<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_lib(name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include_files.is_empty() && self.lib_files.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: String) -> bool {
    if list.contains(&value) {
        return false;
    }
    list.push(value);
    true
}

/// Supported external preprocessors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerKind {
    /// Microsoft Visual C++ (`cl.exe`)
    Msvc,
    /// GNU `g++`
    Gcc,
}

impl CompilerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerKind::Msvc => "msvc",
            CompilerKind::Gcc => "gcc",
        }
    }
}

impl std::str::FromStr for CompilerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "msvc" | "cl" => Ok(CompilerKind::Msvc),
            "gcc" | "g++" => Ok(CompilerKind::Gcc),
            _ => Err(Error::Config(format!(
                "unknown compiler '{}', expected 'msvc' or 'gcc'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An explicit `source > destination` copy requested by the caller,
/// independent of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOperation {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl CopyOperation {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_rejects_duplicates() {
        let mut manifest = BundleManifest::new();
        assert!(manifest.add_include("/opt/zlib/zlib.h"));
        assert!(manifest.add_include("/opt/zlib/zconf.h"));
        assert!(!manifest.add_include("/opt/zlib/zlib.h"));
        assert!(manifest.add_lib("z.lib"));
        assert!(!manifest.add_lib("z.lib"));

        assert_eq!(
            manifest.include_files,
            vec!["/opt/zlib/zlib.h", "/opt/zlib/zconf.h"]
        );
        assert_eq!(manifest.lib_files, vec!["z.lib"]);
    }

    #[test]
    fn test_lib_names_are_case_sensitive() {
        let mut manifest = BundleManifest::new();
        manifest.extend_libs(["ws2_32.lib", "WS2_32.lib", "ws2_32.lib"]);
        assert_eq!(manifest.lib_files, vec!["ws2_32.lib", "WS2_32.lib"]);
    }

    #[test]
    fn test_compiler_kind_from_str() {
        assert_eq!("msvc".parse::<CompilerKind>().unwrap(), CompilerKind::Msvc);
        assert_eq!(" GCC ".parse::<CompilerKind>().unwrap(), CompilerKind::Gcc);
        assert!("clang".parse::<CompilerKind>().is_err());
    }
}
