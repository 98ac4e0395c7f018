//! Path Classifier
//!
//! Decides whether a header reported by the preprocessor belongs to one of
//! the caller's include directories. Anything outside every root (system
//! and standard library headers) is simply not part of the bundle.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::normalize::{normalize_path, PathShape};

/// Path shapes that are never bundled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// Network share or otherwise double-rooted path
    Unc,
    /// No root at all, e.g. `<built-in>` or a bare file name
    Relative,
    /// The suffix under the root contains `..`
    ParentTraversal,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::Unc => f.write_str("UNC path"),
            Unsupported::Relative => f.write_str("relative path"),
            Unsupported::ParentTraversal => f.write_str("path escapes its root"),
        }
    }
}

/// An in-scope path and where it lands relative to its root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeMatch<'a> {
    /// The matching root, normalized
    pub root: &'a str,
    /// Destination path relative to the staging directory
    pub relative: PathBuf,
}

/// Result of classifying one marker path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    InScope(ScopeMatch<'a>),
    OutOfScope,
    Unsupported(Unsupported),
}

impl Classification<'_> {
    pub fn is_in_scope(&self) -> bool {
        matches!(self, Classification::InScope(_))
    }
}

/// The set of directories whose headers are bundled
#[derive(Debug, Clone, Default)]
pub struct ScopeRoots {
    roots: Vec<String>,
}

impl ScopeRoots {
    /// Build from absolute directory paths
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut roots = Vec::new();
        for dir in dirs {
            let root = normalize_path(&dir.as_ref().to_string_lossy());
            if !root.is_empty() && !roots.contains(&root) {
                roots.push(root);
            }
        }
        Self { roots }
    }

    /// Roots in their normalized spelling
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Classify a normalized marker path.
    ///
    /// When several roots prefix the path the longest one wins.
    pub fn classify(&self, path: &str) -> Classification<'_> {
        let shape = PathShape::of(path);
        match shape {
            PathShape::Unc => return unsupported(path, Unsupported::Unc),
            PathShape::Relative => return unsupported(path, Unsupported::Relative),
            PathShape::Drive | PathShape::Posix => {}
        }

        let Some(root) = self
            .roots
            .iter()
            .filter(|root| path.starts_with(root.as_str()))
            .max_by_key(|root| root.len())
        else {
            return Classification::OutOfScope;
        };

        let suffix = path[root.len()..].trim_start_matches(['/', '\\']);
        let components: Vec<&str> = suffix.split(['/', '\\']).filter(|c| !c.is_empty()).collect();

        if components.is_empty() {
            return Classification::OutOfScope;
        }
        if components.iter().any(|c| *c == "..") {
            return unsupported(path, Unsupported::ParentTraversal);
        }

        Classification::InScope(ScopeMatch {
            root: root.as_str(),
            relative: components.iter().collect(),
        })
    }

    /// Destination path under the staging directory, if in scope
    pub fn relative_path(&self, path: &str) -> Option<PathBuf> {
        match self.classify(path) {
            Classification::InScope(found) => Some(found.relative),
            _ => None,
        }
    }
}

fn unsupported(path: &str, reason: Unsupported) -> Classification<'static> {
    debug!("Skipping {}: {}", path, reason);
    Classification::Unsupported(reason)
}
