//! Marker path normalization
//!
//! Preprocessors print paths with escaped backslashes, mixed separators and
//! surrounding quotes. Every path is reduced to one canonical spelling so the
//! manifest can compare paths by plain string equality.

use once_cell::sync::Lazy;
use regex::Regex;

static DRIVE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]:").unwrap());

/// The shape of a normalized path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape {
    /// `C:\dir\file.h`
    Drive,
    /// `/dir/file.h`
    Posix,
    /// `//server/share/file.h`
    Unc,
    /// `file.h`, `<built-in>`
    Relative,
}

impl PathShape {
    pub fn of(path: &str) -> Self {
        if has_drive_prefix(path) {
            PathShape::Drive
        } else if path.starts_with("//") {
            PathShape::Unc
        } else if path.starts_with('/') {
            PathShape::Posix
        } else {
            PathShape::Relative
        }
    }
}

/// True when the first two characters are a drive letter and a colon
pub fn has_drive_prefix(path: &str) -> bool {
    DRIVE_PREFIX.is_match(path)
}

/// Normalize a path as printed in a line marker.
///
/// Doubled backslashes collapse to one, every separator becomes a backslash
/// and quotes are dropped. Paths that start with a drive letter keep the
/// backslashes; all others are converted to forward slashes.
pub fn normalize_path(raw: &str) -> String {
    let path = raw
        .replace(r"\\", r"\")
        .replace('/', r"\")
        .replace('"', "");

    if has_drive_prefix(&path) {
        path
    } else {
        path.replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_path_keeps_backslashes() {
        assert_eq!(normalize_path(r#""C:\\libs\\foo\\bar.h""#), r"C:\libs\foo\bar.h");
        assert_eq!(normalize_path(r#""C:/libs/foo\\bar.h""#), r"C:\libs\foo\bar.h");
    }

    #[test]
    fn test_posix_path_uses_forward_slashes() {
        assert_eq!(normalize_path(r#""/usr/include/stdio.h""#), "/usr/include/stdio.h");
        assert_eq!(normalize_path(r#""/opt\\zlib\\zlib.h""#), "/opt/zlib/zlib.h");
    }

    #[test]
    fn test_equivalent_spellings_normalize_identically() {
        let a = normalize_path(r#""D:\\sdk\\include\\a.h""#);
        let b = normalize_path(r#""D:/sdk/include/a.h""#);
        let c = normalize_path(r"D:\sdk\include\a.h");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_path_shapes() {
        assert_eq!(PathShape::of(r"c:\x.h"), PathShape::Drive);
        assert_eq!(PathShape::of("/usr/include/x.h"), PathShape::Posix);
        assert_eq!(PathShape::of("//server/share/x.h"), PathShape::Unc);
        assert_eq!(PathShape::of("<built-in>"), PathShape::Relative);
        assert_eq!(PathShape::of("test.c"), PathShape::Relative);
    }

    #[test]
    fn test_unc_path_survives_normalization_as_unc() {
        let path = normalize_path(r#""\\\\server\\share\\x.h""#);
        assert_eq!(path, "//server/share/x.h");
        assert_eq!(PathShape::of(&path), PathShape::Unc);
    }
}
