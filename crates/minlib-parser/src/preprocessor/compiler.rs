//! Invocation plans per compiler

use minlib_core::{BundleConfig, CompilerKind, Error, Result};
use std::path::{Path, PathBuf};

/// File the preprocessor writes inside the stage directory
pub const PREPROCESSOR_OUTPUT_FILE: &str = "preprocessor_output.txt";

const MSVC_SCRIPT_FILE: &str = "msvc.bat";

/// A file copied into the stage before the preprocessor starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedInput {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Everything needed to run one preprocessor pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to spawn
    pub program: String,
    /// Arguments, one per element
    pub args: Vec<String>,
    /// Directory the process runs in
    pub current_dir: PathBuf,
    /// Script to write before spawning, as (path, contents)
    pub script: Option<(PathBuf, String)>,
    /// Input to copy into the stage before spawning
    pub staged_input: Option<StagedInput>,
    /// Where the line-marker text ends up
    pub output: PathBuf,
}

impl Invocation {
    /// Plan a preprocessor run for `kind` from a resolved configuration
    pub fn plan(kind: CompilerKind, config: &BundleConfig) -> Result<Self> {
        let input = config.input_file().ok_or_else(|| {
            Error::Config("'input_file' is required to run the preprocessor".to_string())
        })?;

        match kind {
            CompilerKind::Gcc => Ok(plan_gcc(config, input)),
            CompilerKind::Msvc => plan_msvc(config, input),
        }
    }
}

/// `g++ -E` over a `.cpp` copy of the input so headers are read as C++
fn plan_gcc(config: &BundleConfig, input: &Path) -> Invocation {
    let stage = config.stage_dir();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    let staged = stage.join(format!("{}.cpp", stem));

    let mut args: Vec<String> = ["-E", "-Wall", "-x", "c++", "-o", PREPROCESSOR_OUTPUT_FILE]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for dir in config.include_dirs() {
        args.push(format!("-I{}", dir.display()));
    }
    for def in config.defs() {
        args.push("-D".to_string());
        args.push(def.clone());
    }
    args.push(staged.display().to_string());

    Invocation {
        program: "g++".to_string(),
        args,
        current_dir: stage.clone(),
        script: None,
        staged_input: Some(StagedInput {
            from: input.to_path_buf(),
            to: staged,
        }),
        output: stage.join(PREPROCESSOR_OUTPUT_FILE),
    }
}

/// `cl /P` from a batch script that first loads the MSVC environment
fn plan_msvc(config: &BundleConfig, input: &Path) -> Result<Invocation> {
    let vcvars = config.msvc_vcvars32_bat().ok_or_else(|| {
        Error::Config("'msvc_vcvars32_bat' is required for the msvc compiler".to_string())
    })?;
    let stage = config.stage_dir();

    let mut cl = format!("cl /P /MP /Fi:{}", PREPROCESSOR_OUTPUT_FILE);
    for dir in config.include_dirs() {
        cl.push_str(&format!(" /I\"{}\"", dir.display()));
    }
    for def in config.defs() {
        cl.push_str(&format!(" /D {}", def));
    }
    cl.push_str(&format!(" \"{}\"", input.display()));

    let script = format!(
        "@echo off\r\ncall \"{}\"\r\ncd \"{}\"\r\n{}\r\n",
        vcvars.display(),
        stage.display(),
        cl
    );
    let script_path = stage.join(MSVC_SCRIPT_FILE);

    Ok(Invocation {
        program: "cmd".to_string(),
        args: vec!["/C".to_string(), script_path.display().to_string()],
        current_dir: stage.clone(),
        script: Some((script_path, script)),
        staged_input: None,
        output: stage.join(PREPROCESSOR_OUTPUT_FILE),
    })
}
