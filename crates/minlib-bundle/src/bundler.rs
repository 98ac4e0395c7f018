//! Staging & Copy Orchestrator
//!
//! A strict linear pipeline:
//!
//! 1. wipe and recreate the staging directories
//! 2. copy in-scope headers into `stage/include`, keeping their layout
//!    relative to the matching include directory
//! 3. copy every requested library found in a library directory into
//!    `stage/lib`
//! 4. promote `stage/include` to the header output directory
//! 5. promote `stage/lib` to the library output directory
//! 6. run the ad-hoc copies
//!
//! A failing step stops the pipeline; nothing is rolled back.

use minlib_core::{BundleConfig, BundleManifest, CopyOperation, Error, Result};
use minlib_parser::{Classification, ScopeRoots};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::copy::{copy_file, copy_tree};
use crate::stage::StageLayout;

/// What a bundling run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct BundleReport {
    /// Header paths relative to the header output directory
    pub headers: Vec<PathBuf>,
    /// Libraries copied, by file name
    pub libraries: Vec<String>,
    /// Libraries requested but not present in any library directory
    pub missing_libraries: Vec<String>,
    /// Libraries found but skipped because an earlier library already
    /// staged a file under the same name
    pub shadowed_libraries: Vec<String>,
    /// Ad-hoc copies performed
    pub copies: Vec<CopyOperation>,
}

#[derive(Default)]
struct StagedLibraries {
    found: Vec<String>,
    missing: Vec<String>,
    shadowed: Vec<String>,
}

/// Runs the staging and promotion pipeline for one configuration
pub struct Bundler<'a> {
    config: &'a BundleConfig,
    layout: StageLayout,
    roots: ScopeRoots,
}

impl<'a> Bundler<'a> {
    pub fn new(config: &'a BundleConfig) -> Self {
        Self {
            config,
            layout: StageLayout::for_config(config),
            roots: ScopeRoots::new(config.include_dirs()),
        }
    }

    pub fn layout(&self) -> &StageLayout {
        &self.layout
    }

    pub fn roots(&self) -> &ScopeRoots {
        &self.roots
    }

    /// Run every step in order against `manifest`
    pub fn bundle(&self, mut manifest: BundleManifest) -> Result<BundleReport> {
        let mut report = BundleReport::default();

        self.layout.prepare()?;
        report.headers = self.stage_headers(&manifest)?;
        let libs = self.stage_libraries(&mut manifest)?;
        report.libraries = libs.found;
        report.missing_libraries = libs.missing;
        report.shadowed_libraries = libs.shadowed;

        let headers = copy_tree(&self.layout.include_dir(), self.config.include_out_dir())?;
        info!("Promoted {} headers to {}", headers, self.config.include_out_dir().display());
        let libs = copy_tree(&self.layout.lib_dir(), self.config.lib_out_dir())?;
        info!("Promoted {} libraries to {}", libs, self.config.lib_out_dir().display());

        report.copies = self.run_copies()?;
        Ok(report)
    }

    fn stage_headers(&self, manifest: &BundleManifest) -> Result<Vec<PathBuf>> {
        let stage = self.layout.include_dir();
        let mut staged = Vec::new();

        for header in &manifest.include_files {
            let relative = match self.roots.classify(header) {
                Classification::InScope(found) => found.relative,
                other => {
                    debug!("Not staging {}: {:?}", header, other);
                    continue;
                }
            };

            copy_file(Path::new(header), &stage.join(&relative))?;
            staged.push(relative);
        }

        info!("Staged {} headers", staged.len());
        Ok(staged)
    }

    fn stage_libraries(&self, manifest: &mut BundleManifest) -> Result<StagedLibraries> {
        manifest.extend_libs(self.config.libs().iter().cloned());

        let stage = self.layout.lib_dir();
        let mut staged = StagedLibraries::default();
        let mut names: Vec<(PathBuf, &str)> = Vec::new();

        for lib in &manifest.lib_files {
            let Some(source) = self.find_library(lib) else {
                warn!("Library {} not found in any library directory", lib);
                staged.missing.push(lib.clone());
                continue;
            };

            let name = source
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(lib));
            if let Some((_, first)) = names.iter().find(|(staged_name, _)| *staged_name == name) {
                warn!(
                    "Library {} skipped: {} is already staged as {}",
                    lib,
                    first,
                    name.display()
                );
                staged.shadowed.push(lib.clone());
                continue;
            }

            copy_file(&source, &stage.join(&name))?;
            names.push((name, lib));
            staged.found.push(lib.clone());
        }

        info!("Staged {} libraries", staged.found.len());
        Ok(staged)
    }

    /// First match across the library directories, in declaration order
    fn find_library(&self, name: &str) -> Option<PathBuf> {
        self.config
            .lib_dirs()
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    fn run_copies(&self) -> Result<Vec<CopyOperation>> {
        let mut done = Vec::new();

        for op in self.config.copies() {
            if !op.source.exists() {
                return Err(Error::MissingSource(op.source.clone()));
            }

            if op.source.is_dir() {
                copy_tree(&op.source, &op.destination)?;
            } else {
                let destination = match op.source.file_name() {
                    Some(name) if op.destination.is_dir() => op.destination.join(name),
                    _ => op.destination.clone(),
                };
                copy_file(&op.source, &destination)?;
            }

            debug!("Copied {} to {}", op.source.display(), op.destination.display());
            done.push(op.clone());
        }

        Ok(done)
    }
}

/// Stage and promote `manifest` according to `config`
pub fn bundle_library(config: &BundleConfig, manifest: BundleManifest) -> Result<BundleReport> {
    Bundler::new(config).bundle(manifest)
}
