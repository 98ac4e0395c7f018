//! Path string helpers used while resolving configuration

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use tracing::warn;

static POSIX_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{(\w+)\}").unwrap());
static WINDOWS_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"%(\w+)%").unwrap());

/// Split a space-delimited parameter value into its parts
pub fn split_values(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Expand `${VAR}` and `%VAR%` references from the process environment
pub fn expand_env(raw: &str) -> String {
    expand_with(raw, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` and `%VAR%` references using `lookup`.
///
/// Unknown variables expand to the empty string.
pub fn expand_with<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let replace = |caps: &Captures<'_>| {
        let name = &caps[1];
        lookup(name).unwrap_or_else(|| {
            warn!("Environment variable '{}' is not set", name);
            String::new()
        })
    };

    let expanded = POSIX_VAR.replace_all(raw, &replace);
    WINDOWS_VAR.replace_all(&expanded, &replace).into_owned()
}

/// Resolve `path` against `base` when it is relative
pub fn absolutize(path: impl AsRef<Path>, base: &Path) -> PathBuf {
    let path = path.as_ref();
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Expand environment references, then resolve against `base`
pub fn resolve(raw: &str, base: &Path) -> PathBuf {
    absolutize(expand_env(raw), base)
}
