//! Configuration types
//!
//! Raw `key = value` parameters are collected into a [`BundleConfigBuilder`],
//! which resolves them once into an immutable [`BundleConfig`]: environment
//! references expanded, relative paths made absolute, defaults filled in and
//! copy specs validated.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::copy_spec::parse_copy_specs;
use crate::error::{Error, Result};
use crate::paths::{expand_env, resolve, split_values};
use crate::types::{CompilerKind, CopyOperation};

/// Name of the scratch directory created inside the working directory
pub const STAGE_DIR_NAME: &str = "minlib_stage";

/// Parameter keys
pub mod keys {
    pub const COMPILER: &str = "compiler";
    pub const INPUT_FILE: &str = "input_file";
    pub const MSVC_BAT: &str = "msvc_vcvars32_bat";
    pub const WORKING_DIR: &str = "working_dir";
    pub const DEFS: &str = "defs";
    pub const INCLUDE_DIR: &str = "include_dir";
    pub const LIB_DIR: &str = "lib_dir";
    pub const LIBS: &str = "libs";
    pub const INCLUDE_OUT_DIR: &str = "include_out_dir";
    pub const LIB_OUT_DIR: &str = "lib_out_dir";
    pub const COPY: &str = "copy";

    pub const ALL: [&str; 11] = [
        COMPILER,
        INPUT_FILE,
        MSVC_BAT,
        WORKING_DIR,
        DEFS,
        INCLUDE_DIR,
        LIB_DIR,
        LIBS,
        INCLUDE_OUT_DIR,
        LIB_OUT_DIR,
        COPY,
    ];
}

/// Locations searched for `vcvars32.bat` when none is configured
const VCVARS32_CANDIDATES: [&str; 4] = [
    r"C:\Program Files (x86)\Microsoft Visual Studio\2019\Professional\VC\Auxiliary\Build\vcvars32.bat",
    r"C:\Program Files (x86)\Microsoft Visual Studio\2019\Community\VC\Auxiliary\Build\vcvars32.bat",
    r"C:\Program Files (x86)\Microsoft Visual Studio\2017\Professional\VC\Auxiliary\Build\vcvars32.bat",
    r"C:\Program Files (x86)\Microsoft Visual Studio\2017\Community\VC\Auxiliary\Build\vcvars32.bat",
];

/// Fully resolved MinLib configuration
#[derive(Debug, Clone, Serialize)]
pub struct BundleConfig {
    working_dir: PathBuf,
    compiler: Option<CompilerKind>,
    input_file: Option<PathBuf>,
    msvc_vcvars32_bat: Option<PathBuf>,
    defs: Vec<String>,
    include_dirs: Vec<PathBuf>,
    lib_dirs: Vec<PathBuf>,
    libs: Vec<String>,
    include_out_dir: PathBuf,
    lib_out_dir: PathBuf,
    copies: Vec<CopyOperation>,
}

impl BundleConfig {
    pub fn builder() -> BundleConfigBuilder {
        BundleConfigBuilder::default()
    }

    /// Directory all relative paths were resolved against
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// `<working_dir>/minlib_stage`
    pub fn stage_dir(&self) -> PathBuf {
        self.working_dir.join(STAGE_DIR_NAME)
    }

    pub fn compiler(&self) -> Option<CompilerKind> {
        self.compiler
    }

    pub fn input_file(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }

    pub fn msvc_vcvars32_bat(&self) -> Option<&Path> {
        self.msvc_vcvars32_bat.as_deref()
    }

    /// Preprocessor definitions, passed through verbatim
    pub fn defs(&self) -> &[String] {
        &self.defs
    }

    /// Include directories; these are also the scope roots
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// Library directories, in search order
    pub fn lib_dirs(&self) -> &[PathBuf] {
        &self.lib_dirs
    }

    /// Libraries requested explicitly on top of `#pragma comment(lib, ...)`
    pub fn libs(&self) -> &[String] {
        &self.libs
    }

    pub fn include_out_dir(&self) -> &Path {
        &self.include_out_dir
    }

    pub fn lib_out_dir(&self) -> &Path {
        &self.lib_out_dir
    }

    pub fn copies(&self) -> &[CopyOperation] {
        &self.copies
    }
}

/// Collects raw parameter values and resolves them into a [`BundleConfig`]
#[derive(Debug, Clone, Default)]
pub struct BundleConfigBuilder {
    compiler: Option<String>,
    input_file: Option<String>,
    msvc_vcvars32_bat: Option<String>,
    working_dir: Option<String>,
    defs: Option<String>,
    include_dir: Option<String>,
    lib_dir: Option<String>,
    libs: Option<String>,
    include_out_dir: Option<String>,
    lib_out_dir: Option<String>,
    copy: Option<String>,
    require_preprocessor: bool,
}

impl BundleConfigBuilder {
    /// Set a parameter by its key name
    pub fn set(mut self, key: &str, value: impl Into<String>) -> Result<Self> {
        let slot = match key {
            keys::COMPILER => &mut self.compiler,
            keys::INPUT_FILE => &mut self.input_file,
            keys::MSVC_BAT => &mut self.msvc_vcvars32_bat,
            keys::WORKING_DIR => &mut self.working_dir,
            keys::DEFS => &mut self.defs,
            keys::INCLUDE_DIR => &mut self.include_dir,
            keys::LIB_DIR => &mut self.lib_dir,
            keys::LIBS => &mut self.libs,
            keys::INCLUDE_OUT_DIR => &mut self.include_out_dir,
            keys::LIB_OUT_DIR => &mut self.lib_out_dir,
            keys::COPY => &mut self.copy,
            _ => return Err(Error::Config(format!("unknown parameter '{}'", key))),
        };
        *slot = Some(value.into());
        Ok(self)
    }

    pub fn compiler(mut self, value: impl Into<String>) -> Self {
        self.compiler = Some(value.into());
        self
    }

    pub fn input_file(mut self, value: impl Into<String>) -> Self {
        self.input_file = Some(value.into());
        self
    }

    pub fn working_dir(mut self, value: impl Into<String>) -> Self {
        self.working_dir = Some(value.into());
        self
    }

    pub fn include_dir(mut self, value: impl Into<String>) -> Self {
        self.include_dir = Some(value.into());
        self
    }

    pub fn lib_dir(mut self, value: impl Into<String>) -> Self {
        self.lib_dir = Some(value.into());
        self
    }

    pub fn libs(mut self, value: impl Into<String>) -> Self {
        self.libs = Some(value.into());
        self
    }

    pub fn include_out_dir(mut self, value: impl Into<String>) -> Self {
        self.include_out_dir = Some(value.into());
        self
    }

    pub fn lib_out_dir(mut self, value: impl Into<String>) -> Self {
        self.lib_out_dir = Some(value.into());
        self
    }

    pub fn copy(mut self, value: impl Into<String>) -> Self {
        self.copy = Some(value.into());
        self
    }

    /// Fail resolution when `compiler` or `input_file` is missing
    pub fn require_preprocessor(mut self, required: bool) -> Self {
        self.require_preprocessor = required;
        self
    }

    /// Resolve against the process current directory
    pub fn build(self) -> Result<BundleConfig> {
        let current_dir = std::env::current_dir()?;
        self.build_in(&current_dir)
    }

    /// Resolve against an explicit current directory
    pub fn build_in(self, current_dir: &Path) -> Result<BundleConfig> {
        let working_dir = match non_empty(&self.working_dir) {
            Some(raw) => resolve(raw, current_dir),
            None => current_dir.to_path_buf(),
        };

        let compiler = non_empty(&self.compiler)
            .map(str::parse::<CompilerKind>)
            .transpose()?;
        let input_file = non_empty(&self.input_file).map(|raw| resolve(raw, &working_dir));

        if self.require_preprocessor {
            if compiler.is_none() {
                return Err(missing(keys::COMPILER));
            }
            if input_file.is_none() {
                return Err(missing(keys::INPUT_FILE));
            }
        }

        let msvc_vcvars32_bat = match (compiler, non_empty(&self.msvc_vcvars32_bat)) {
            (_, Some(raw)) => Some(resolve(raw, &working_dir)),
            (Some(CompilerKind::Msvc), None) => Some(find_vcvars32()?),
            _ => None,
        };

        let dir_list = |raw: &Option<String>| match non_empty(raw) {
            Some(raw) => split_values(raw)
                .iter()
                .map(|dir| resolve(dir, &working_dir))
                .collect(),
            None => vec![working_dir.clone()],
        };
        let include_dirs = dir_list(&self.include_dir);
        let lib_dirs = dir_list(&self.lib_dir);

        let include_out_dir = non_empty(&self.include_out_dir)
            .map(|raw| resolve(raw, &working_dir))
            .unwrap_or_else(|| working_dir.join("include"));
        let lib_out_dir = non_empty(&self.lib_out_dir)
            .map(|raw| resolve(raw, &working_dir))
            .unwrap_or_else(|| working_dir.join("lib"));

        let copies = match non_empty(&self.copy) {
            Some(raw) => parse_copy_specs(raw)?
                .into_iter()
                .map(|spec| {
                    CopyOperation::new(
                        resolve(&spec.source, &working_dir),
                        resolve(&spec.destination, &working_dir),
                    )
                })
                .collect(),
            None => Vec::new(),
        };

        let config = BundleConfig {
            working_dir,
            compiler,
            input_file,
            msvc_vcvars32_bat,
            defs: non_empty(&self.defs).map(split_values).unwrap_or_default(),
            include_dirs,
            lib_dirs,
            libs: non_empty(&self.libs)
                .map(|raw| split_values(&expand_env(raw)))
                .unwrap_or_default(),
            include_out_dir,
            lib_out_dir,
            copies,
        };

        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn missing(key: &str) -> Error {
    Error::Config(format!(
        "the argument '{}' is required but was not passed to the executable or found in the config file",
        key
    ))
}

fn find_vcvars32() -> Result<PathBuf> {
    VCVARS32_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
        .ok_or_else(|| {
            Error::Config(
                "could not find 'vcvars32.bat'; supply its path via 'msvc_vcvars32_bat'".to_string(),
            )
        })
}
