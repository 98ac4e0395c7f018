//! Parameter collection
//!
//! Parameters come from `key=value` command-line arguments and, optionally,
//! a config file named by the one bare argument. Every key may be given only
//! once across both sources.

use minlib_core::{BundleConfig, BundleConfigBuilder, Error, Result};
use std::fs;
use std::path::Path;

/// Printed by `minlib --config`
pub const CONFIG_TEMPLATE: &str = "\
# *Required.  Specifies whether to use the MS Visual C++ (msvc) or GCC (g++) compiler.
compiler =

# *Required.  The file that contains all of the top-level includes.
input_file =

# MinLib will attempt to find 'vcvars32.bat' automatically, however if that fails you can specify the full path here.  Only needed for the msvc compiler.
msvc_vcvars32_bat =

# The working directory (all relative paths are based on this path).  Defaults to the directory minlib was run from.
working_dir =

# A space-delimited list of preprocessor definitions.  Should match the definitions normally used with the target library.
defs =

# A space-delimited list of include directories.  Only headers under these directories are bundled.  Defaults to the working directory.
include_dir =

# A space-delimited list of library directories, searched in order.  Defaults to the working directory.
lib_dir =

# A space-delimited list of additional library files.  Libraries named by '#pragma comment(lib, \"some_lib\")' are picked up automatically.
libs =

# The directory the extracted header files are copied to.  Defaults to 'include' within the working directory.
include_out_dir =

# The directory the referenced libraries are copied to.  Defaults to 'lib' within the working directory.
lib_out_dir =

# A space-delimited list of extra 'source>destination' copies.  Quote a whole spec to allow spaces: \"a b.txt>out/a b.txt\"
copy =
";

/// One parsed argument or config-file line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    KeyValue(String, String),
    Bare(String),
}

/// Parse `key = value` or a bare value. Blank lines and `#` comments yield `None`.
pub fn parse_param(raw: &str) -> Option<Param> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    Some(match raw.split_once('=') {
        Some((key, value)) => Param::KeyValue(key.trim().to_string(), value.trim().to_string()),
        None => Param::Bare(raw.to_string()),
    })
}

/// Read `key = value` lines from a config file
pub fn read_config_file(path: &Path) -> Result<Vec<(String, String)>> {
    if !path.is_file() {
        return Err(Error::Config(format!(
            "config file '{}' not found",
            path.display()
        )));
    }
    let content = fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;

    let mut pairs = Vec::new();
    for (number, line) in content.lines().enumerate() {
        match parse_param(line) {
            Some(Param::KeyValue(key, value)) => pairs.push((key, value)),
            Some(Param::Bare(_)) => {
                return Err(Error::Config(format!(
                    "{}:{}: expected 'key = value'",
                    path.display(),
                    number + 1
                )))
            }
            None => {}
        }
    }
    Ok(pairs)
}

/// Collect parameters from command-line arguments and the optional config file
pub fn collect(args: &[String]) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut config_file = None;

    for arg in args {
        match parse_param(arg) {
            Some(Param::KeyValue(key, value)) => pairs.push((key, value)),
            Some(Param::Bare(file)) => {
                if config_file.replace(file).is_some() {
                    return Err(Error::Config(
                        "only one argument, the config file name, can be supplied without a key; \
                         all other arguments must be passed as key=value"
                            .to_string(),
                    ));
                }
            }
            None => {}
        }
    }

    if let Some(file) = config_file {
        pairs.extend(read_config_file(Path::new(&file))?);
    }

    let mut seen: Vec<&str> = Vec::new();
    for (key, _) in &pairs {
        if key.is_empty() {
            return Err(Error::Config("parameter with an empty key".to_string()));
        }
        if seen.contains(&key.as_str()) {
            return Err(Error::Config(format!(
                "the argument '{}' was supplied twice, which is not allowed",
                key
            )));
        }
        seen.push(key);
    }

    Ok(pairs)
}

/// Feed collected parameters into a configuration builder
pub fn builder_from(pairs: Vec<(String, String)>) -> Result<BundleConfigBuilder> {
    pairs
        .into_iter()
        .try_fold(BundleConfig::builder(), |builder, (key, value)| builder.set(&key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param(" compiler = gcc "),
            Some(Param::KeyValue("compiler".into(), "gcc".into()))
        );
        assert_eq!(
            parse_param("defs=FOO=1 BAR"),
            Some(Param::KeyValue("defs".into(), "FOO=1 BAR".into()))
        );
        assert_eq!(
            parse_param("lib_out_dir="),
            Some(Param::KeyValue("lib_out_dir".into(), String::new()))
        );
        assert_eq!(parse_param("minlib.cfg"), Some(Param::Bare("minlib.cfg".into())));
        assert_eq!(parse_param("# comment = x"), None);
        assert_eq!(parse_param("   "), None);
    }

    #[test]
    fn test_collect_merges_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("minlib.cfg");
        fs::write(&file, "# zlib bundle\ncompiler = gcc\n\ninclude_dir = third_party/zlib\n").unwrap();

        let pairs = collect(&args(&["input_file=all.h", file.to_str().unwrap()])).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("input_file".to_string(), "all.h".to_string()),
                ("compiler".to_string(), "gcc".to_string()),
                ("include_dir".to_string(), "third_party/zlib".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_key_across_sources() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("minlib.cfg");
        fs::write(&file, "compiler = gcc\n").unwrap();

        let err = collect(&args(&["compiler=msvc", file.to_str().unwrap()])).unwrap_err();
        assert!(err.to_string().contains("'compiler' was supplied twice"));
    }

    #[test]
    fn test_two_bare_arguments() {
        assert!(collect(&args(&["a.cfg", "b.cfg"])).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = collect(&args(&["/nonexistent/minlib.cfg"])).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_builder_from_rejects_unknown_keys() {
        let pairs = vec![("colour".to_string(), "blue".to_string())];
        assert!(builder_from(pairs).is_err());
    }

    #[test]
    fn test_builder_from_resolves() {
        let pairs = vec![
            ("working_dir".to_string(), "/work".to_string()),
            ("lib_dir".to_string(), "lib".to_string()),
        ];
        let config = builder_from(pairs).unwrap().build().unwrap();
        assert_eq!(config.lib_dirs(), &[PathBuf::from("/work/lib")]);
    }

    #[test]
    fn test_template_lists_every_key() {
        for key in minlib_core::config::keys::ALL {
            assert!(
                CONFIG_TEMPLATE.contains(&format!("\n{} =", key))
                    || CONFIG_TEMPLATE.contains(&format!("{} =\n", key)),
                "template is missing {}",
                key
            );
        }
    }
}
