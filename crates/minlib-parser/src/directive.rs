//! Directive Parser
//!
//! Recognizes the two kinds of preprocessor output lines that matter for
//! bundling. Line markers name the file the following text came from:
//!
//! ```text
//! # 42 "/opt/zlib/zlib.h" 2        (gcc)
//! #line 42 "C:\\zlib\\zlib.h"      (msvc)
//! ```
//!
//! Library pragmas survive preprocessing verbatim:
//!
//! ```text
//! #pragma comment(lib, "ws2_32.lib")
//! ```

use crate::normalize::normalize_path;

/// Literal prefix of a library linkage pragma
pub const LIB_PRAGMA_PREFIX: &str = "#pragma comment(lib,";

/// One classified line of preprocessor output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Following content originates from `path` (normalized)
    IncludeMarker { path: String },
    /// The translation unit asks to link against `raw_name`
    LibraryPragma { raw_name: String },
    /// Code, blank lines and any other directive
    Ignorable,
}

/// Parse every line of a preprocessor run, preserving order
pub fn parse_directives(text: &str) -> impl Iterator<Item = Directive> + '_ {
    text.lines().map(parse_line)
}

/// Classify a single line of preprocessor output
pub fn parse_line(line: &str) -> Directive {
    let line = line.trim();
    if !line.starts_with('#') {
        return Directive::Ignorable;
    }

    parse_candidate(line).unwrap_or(Directive::Ignorable)
}

fn parse_candidate(line: &str) -> Option<Directive> {
    let (marker, rest) = next_token(line)?;

    // `#5 "file.h"` carries the line number glued to the marker
    let glued = &marker[1..];
    let (second, rest) = if is_line_number(glued) {
        (glued, rest)
    } else {
        next_token(rest)?
    };

    // Markers are decided before pragmas so an include line is never read
    // as a library request.
    if is_line_number(second) {
        let path = normalize_path(path_token(rest)?);
        return (!path.is_empty()).then_some(Directive::IncludeMarker { path });
    }

    library_name(line).map(|raw_name| Directive::LibraryPragma { raw_name })
}

/// Extract the library file name from a `#pragma comment(lib, ...)` line
pub fn library_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix(LIB_PRAGMA_PREFIX)?;
    let name: String = rest
        .chars()
        .filter(|c| !matches!(c, '"' | '(' | ')') && !c.is_whitespace())
        .collect();
    (!name.is_empty()).then_some(name)
}

fn is_line_number(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Split off the next whitespace-delimited token
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// The path token, read through its closing quote when it is quoted
fn path_token(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    if let Some(quoted) = rest.strip_prefix('"') {
        if let Some(end) = quoted.find('"') {
            return Some(&rest[..end + 2]);
        }
    }
    next_token(rest).map(|(token, _)| token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(path: &str) -> Directive {
        Directive::IncludeMarker {
            path: path.to_string(),
        }
    }

    fn pragma(name: &str) -> Directive {
        Directive::LibraryPragma {
            raw_name: name.to_string(),
        }
    }

    #[test]
    fn test_gcc_line_marker() {
        assert_eq!(
            parse_line(r#"# 1 "/usr/include/stdio.h" 1 3 4"#),
            marker("/usr/include/stdio.h")
        );
    }

    #[test]
    fn test_msvc_line_marker() {
        assert_eq!(
            parse_line(r#"#line 12 "C:\\libs\\foo\\bar.h""#),
            marker(r"C:\libs\foo\bar.h")
        );
    }

    #[test]
    fn test_glued_line_number() {
        assert_eq!(
            parse_line(r#"#5 "C:\\libs\\foo\\bar.h""#),
            marker(r"C:\libs\foo\bar.h")
        );
    }

    #[test]
    fn test_quoted_path_with_spaces() {
        assert_eq!(
            parse_line(r#"# 3 "/opt/my lib/include/a.h" 2"#),
            marker("/opt/my lib/include/a.h")
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_line("   # 7 \"/opt/x.h\"   "), marker("/opt/x.h"));
    }

    #[test]
    fn test_library_pragma() {
        assert_eq!(
            parse_line(r#"#pragma comment(lib,"ws2_32.lib")"#),
            pragma("ws2_32.lib")
        );
        assert_eq!(
            parse_line(r#"#pragma comment(lib, "libcrypto.lib" )"#),
            pragma("libcrypto.lib")
        );
    }

    #[test]
    fn test_other_directives_are_ignorable() {
        assert_eq!(parse_line("#pragma once"), Directive::Ignorable);
        assert_eq!(parse_line("#pragma comment(linker, \"/x\")"), Directive::Ignorable);
        assert_eq!(parse_line("#define FOO 1"), Directive::Ignorable);
        assert_eq!(parse_line("#"), Directive::Ignorable);
        assert_eq!(parse_line("# 1"), Directive::Ignorable);
        assert_eq!(parse_line("#pragma comment(lib,\"\")"), Directive::Ignorable);
    }

    #[test]
    fn test_code_lines_are_ignorable() {
        assert_eq!(parse_line("int main(void);"), Directive::Ignorable);
        assert_eq!(parse_line(""), Directive::Ignorable);
        assert_eq!(parse_line("  x = 1; # not a directive"), Directive::Ignorable);
    }

    #[test]
    fn test_marker_resembling_pragma_is_still_a_marker() {
        assert_eq!(
            parse_line(r#"# 9 "/opt/x/#pragma comment(lib,y).h""#),
            marker("/opt/x/#pragma comment(lib,y).h")
        );
    }

    #[test]
    fn test_parse_directives_keeps_order() {
        let text = "# 1 \"/a.h\"\nint a;\n#pragma comment(lib, \"a.lib\")\n# 2 \"/b.h\"\n";
        let directives: Vec<_> = parse_directives(text).collect();
        assert_eq!(
            directives,
            vec![
                marker("/a.h"),
                Directive::Ignorable,
                pragma("a.lib"),
                marker("/b.h"),
            ]
        );
    }
}
