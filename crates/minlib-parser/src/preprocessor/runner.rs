//! Preprocessor runner

use minlib_core::{BundleConfig, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use super::compiler::Invocation;

/// Recreate the stage directory and run the configured preprocessor.
///
/// Returns the path of the output artifact. The exit status is logged but
/// otherwise ignored: a failed run leaves partial or no output, which the
/// parser handles on a best-effort basis.
pub fn run_preprocessor(config: &BundleConfig) -> Result<PathBuf> {
    let kind = config.compiler().ok_or_else(|| {
        Error::Config("'compiler' is required to run the preprocessor".to_string())
    })?;
    let invocation = Invocation::plan(kind, config)?;

    reset_dir(&config.stage_dir())?;
    execute(&invocation)?;
    Ok(invocation.output)
}

/// Carry out a planned invocation inside an existing stage directory
pub fn execute(invocation: &Invocation) -> Result<()> {
    if let Some((path, contents)) = &invocation.script {
        fs::write(path, contents).map_err(|e| Error::fs(path, e))?;
    }

    if let Some(staged) = &invocation.staged_input {
        if !staged.from.exists() {
            return Err(Error::MissingSource(staged.from.clone()));
        }
        fs::copy(&staged.from, &staged.to).map_err(|e| Error::fs(&staged.from, e))?;
    }

    info!("Running {} in {}", invocation.program, invocation.current_dir.display());
    debug!("Preprocessor args: {:?}", invocation.args);

    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.current_dir)
        .status()
        .map_err(|e| {
            Error::Preprocess(format!("failed to launch '{}': {}", invocation.program, e))
        })?;

    if !status.success() {
        warn!("{} exited with {}", invocation.program, status);
    }

    Ok(())
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir).map_err(|e| Error::fs(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::fs(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessor::StagedInput;

    fn shell(stage: &Path, script: &str) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            current_dir: stage.to_path_buf(),
            script: None,
            staged_input: None,
            output: stage.join("preprocessor_output.txt"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_writes_output_in_stage() {
        let dir = tempfile::tempdir().unwrap();
        let plan = shell(dir.path(), "echo '# 1 \"/opt/a.h\"' > preprocessor_output.txt");

        execute(&plan).unwrap();
        let text = fs::read_to_string(&plan.output).unwrap();
        assert!(text.contains("/opt/a.h"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_exit_status_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let plan = shell(dir.path(), "exit 3");
        assert!(execute(&plan).is_ok());
    }

    #[test]
    fn test_missing_program_is_a_preprocess_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = shell(dir.path(), "");
        plan.program = "minlib-no-such-preprocessor".to_string();
        assert!(matches!(execute(&plan), Err(Error::Preprocess(_))));
    }

    #[test]
    fn test_missing_staged_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = shell(dir.path(), "");
        plan.staged_input = Some(StagedInput {
            from: dir.path().join("absent.h"),
            to: dir.path().join("absent.cpp"),
        });
        assert!(matches!(execute(&plan), Err(Error::MissingSource(p)) if p.ends_with("absent.h")));
    }
}
