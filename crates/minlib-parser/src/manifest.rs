//! Manifest assembly
//!
//! Combines the directive parser and the scope classifier: in-scope headers
//! and every requested library end up in a duplicate-free
//! [`BundleManifest`].

use minlib_core::{BundleManifest, Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::classify::{Classification, ScopeRoots};
use crate::directive::{parse_directives, Directive};

/// Build a manifest from the text of a preprocessor run
pub fn extract_manifest(text: &str, roots: &ScopeRoots) -> BundleManifest {
    let mut manifest = BundleManifest::new();

    for directive in parse_directives(text) {
        match directive {
            Directive::IncludeMarker { path } => {
                if let Classification::InScope(_) = roots.classify(&path) {
                    if manifest.add_include(path.as_str()) {
                        debug!("Including header {}", path);
                    }
                }
            }
            Directive::LibraryPragma { raw_name } => {
                if manifest.add_lib(raw_name.as_str()) {
                    debug!("Requested library {}", raw_name);
                }
            }
            Directive::Ignorable => {}
        }
    }

    manifest
}

/// Build a manifest from a preprocessor output file.
///
/// A missing file means the preprocessor produced nothing, which yields an
/// empty manifest rather than an error.
pub fn extract_manifest_from_file(path: &Path, roots: &ScopeRoots) -> Result<BundleManifest> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Preprocessor output {} not found, nothing to bundle", path.display());
            return Ok(BundleManifest::new());
        }
        Err(e) => return Err(Error::fs(path, e)),
    };

    let text = String::from_utf8_lossy(&bytes);
    let manifest = extract_manifest(&text, roots);
    info!(
        "Found {} headers and {} libraries in {}",
        manifest.include_files.len(),
        manifest.lib_files.len(),
        path.display()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_manifest() {
        let text = r#"
# 1 "main.cpp"
# 1 "<built-in>" 1
# 1 "/opt/zlib/zlib.h" 1
# 1 "/opt/zlib/zconf.h" 1
# 1 "/usr/include/stdlib.h" 1 3 4
typedef unsigned int uInt;
# 40 "/opt/zlib/zlib.h" 2
#pragma comment(lib, "zlib.lib")
#pragma comment(lib, "zlib.lib")
"#;
        let roots = ScopeRoots::new(["/opt/zlib"]);
        let manifest = extract_manifest(text, &roots);

        assert_eq!(manifest.include_files, vec!["/opt/zlib/zlib.h", "/opt/zlib/zconf.h"]);
        assert_eq!(manifest.lib_files, vec!["zlib.lib"]);
    }

    #[test]
    fn test_missing_output_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manifest =
            extract_manifest_from_file(&dir.path().join("nope.txt"), &ScopeRoots::default())
                .unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_extract_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("preprocessor_output.txt");
        fs::write(&out, "# 1 \"/sdk/a.h\"\n#pragma comment(lib,\"a.lib\")\n").unwrap();

        let manifest = extract_manifest_from_file(&out, &ScopeRoots::new(["/sdk"])).unwrap();
        assert_eq!(manifest.include_files, vec!["/sdk/a.h"]);
        assert_eq!(manifest.lib_files, vec!["a.lib"]);
    }
}
