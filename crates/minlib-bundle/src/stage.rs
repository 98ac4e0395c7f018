//! Staging tree layout

use minlib_core::{BundleConfig, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `minlib_stage/include` and `minlib_stage/lib` under the working directory.
///
/// The tree is wiped and recreated on every run and left in place afterwards.
#[derive(Debug, Clone)]
pub struct StageLayout {
    root: PathBuf,
}

impl StageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn for_config(config: &BundleConfig) -> Self {
        Self::new(config.stage_dir())
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    #[inline]
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Delete and recreate both staging directories, empty
    pub fn prepare(&self) -> Result<()> {
        for dir in [self.include_dir(), self.lib_dir()] {
            if dir.exists() {
                debug!("Clearing {}", dir.display());
                fs::remove_dir_all(&dir).map_err(|e| Error::fs(&dir, e))?;
            }
            fs::create_dir_all(&dir).map_err(|e| Error::fs(&dir, e))?;
        }
        Ok(())
    }
}
