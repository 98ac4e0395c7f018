//! MinLib Bundle
//!
//! Stages the files named by a [`BundleManifest`](minlib_core::BundleManifest)
//! under `<working_dir>/minlib_stage`, then promotes them to the configured
//! output directories.

mod bundler;
mod copy;
mod stage;

pub use bundler::{bundle_library, BundleReport, Bundler};
pub use copy::{copy_file, copy_tree};
pub use stage::StageLayout;
