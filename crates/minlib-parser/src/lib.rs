//! MinLib Parser
//!
//! Turns the text produced by a C/C++ preprocessor run into a
//! [`BundleManifest`](minlib_core::BundleManifest).
//!
//! ## Modules
//!
//! - `directive` - Line-marker and `#pragma comment(lib, ...)` recognition
//! - `normalize` - Separator and drive-letter normalization of marker paths
//! - `classify` - Scope-root membership and relative path computation
//! - `manifest` - Manifest assembly from preprocessor output
//! - `preprocessor` - Invocation plans for supported compilers and the runner

pub mod classify;
pub mod directive;
pub mod manifest;
pub mod normalize;
pub mod preprocessor;

pub use classify::{Classification, ScopeMatch, ScopeRoots, Unsupported};
pub use directive::{parse_directives, parse_line, Directive};
pub use manifest::{extract_manifest, extract_manifest_from_file};
pub use normalize::{normalize_path, PathShape};
