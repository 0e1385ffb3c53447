//! Invocation of the external processing program
//!
//! Every request writes the submitted text to a fresh temporary file, runs
//! `<program> <args...> <input> --workflow <name>` to completion and looks for
//! `<name>-output.md` next to the input. The temporary input is removed on
//! every exit path.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info, warn};
use tempfile::{Builder, TempPath};

use crate::constants::{OUTPUT_SUFFIX, TEMP_INPUT_PREFIX, TEMP_INPUT_SUFFIX, WORKFLOW_FLAG};
use crate::credentials::CredentialStore;
use crate::errors::{file_operation_error, process_spawn_error, Error, Result};

/// The external program and the leading arguments it is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    program: String,
    args: Vec<String>,
}

impl EntryPoint {
    pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> Self {
        EntryPoint {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Build the command for one processing request
    pub fn command(&self, input: &Path, workflow: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(input)
            .arg(WORKFLOW_FLAG)
            .arg(workflow);
        command
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Terminal state of one processing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program exited successfully and produced its output file
    Completed { file_name: String, content: String },
    /// The program exited successfully but no output file appeared
    MissingOutput { stdout: String, stderr: String },
    /// The program exited with a non-zero status
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed { .. })
    }
}

/// Name of the output artifact produced for `workflow`
pub fn output_file_name(workflow: &str) -> String {
    format!("{workflow}{OUTPUT_SUFFIX}")
}

#[derive(Debug, Clone)]
pub struct Runner {
    entry_point: EntryPoint,
    work_dir: PathBuf,
}

impl Runner {
    /// Create a runner; temporary files go to `work_dir` or the system temp dir
    pub fn new(entry_point: EntryPoint, work_dir: Option<PathBuf>) -> Self {
        Runner {
            entry_point,
            work_dir: work_dir.unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run `workflow` over `input` and block until the program exits
    ///
    /// # Errors
    /// Returns an error if `input` is empty, the temporary input cannot be
    /// written or the program cannot be started. A non-zero exit status is a
    /// [`RunOutcome::Failed`], not an error.
    pub fn run(
        &self,
        input: &str,
        workflow: &str,
        credentials: &CredentialStore,
    ) -> Result<RunOutcome> {
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }

        let input_path = self.write_input(input)?;
        let outcome = self.invoke(&input_path, workflow, credentials);

        let removed = input_path.to_path_buf();
        match input_path.close() {
            Ok(()) => debug!("Removed temporary input {}", removed.display()),
            Err(e) => warn!(
                "Failed to remove temporary input {}: {e}",
                removed.display()
            ),
        }

        outcome
    }

    fn write_input(&self, input: &str) -> Result<TempPath> {
        let mut file = Builder::new()
            .prefix(TEMP_INPUT_PREFIX)
            .suffix(TEMP_INPUT_SUFFIX)
            .tempfile_in(&self.work_dir)
            .map_err(|e| file_operation_error(e, self.work_dir.clone(), "create temporary"))?;

        let path = file.path().to_path_buf();
        file.write_all(input.as_bytes())
            .map_err(|e| file_operation_error(e, path.clone(), "write"))?;

        debug!("Wrote {} byte(s) of input to {}", input.len(), path.display());
        Ok(file.into_temp_path())
    }

    fn invoke(
        &self,
        input_path: &Path,
        workflow: &str,
        credentials: &CredentialStore,
    ) -> Result<RunOutcome> {
        let directory = input_path.parent().unwrap_or(self.work_dir.as_path());
        let output_path = directory.join(output_file_name(workflow));
        remove_stale_output(&output_path)?;

        let mut command = self.entry_point.command(input_path, workflow);
        command.stdin(Stdio::null());
        credentials.apply_to(&mut command);

        info!("Running workflow '{workflow}' with {}", self.entry_point);
        let output = command
            .output()
            .map_err(|e| process_spawn_error(e, self.entry_point.program()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            warn!("Workflow '{workflow}' failed with {}", output.status);
            return Ok(RunOutcome::Failed {
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        if output_path.is_file() {
            let content = fs::read_to_string(&output_path)
                .map_err(|e| file_operation_error(e, output_path.clone(), "read"))?;
            info!("Workflow '{workflow}' produced {}", output_path.display());
            Ok(RunOutcome::Completed {
                file_name: output_file_name(workflow),
                content,
            })
        } else {
            warn!(
                "Workflow '{workflow}' exited successfully but {} was not found",
                output_path.display()
            );
            Ok(RunOutcome::MissingOutput { stdout, stderr })
        }
    }
}

// A leftover artifact from an earlier run must not pass for this run's output.
fn remove_stale_output(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale output {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(file_operation_error(e, path.to_path_buf(), "remove")),
    }
}

/// Whether `path` looks like a temporary input written by [`Runner`]
pub fn is_temporary_input(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| {
            name.starts_with(TEMP_INPUT_PREFIX) && name.ends_with(TEMP_INPUT_SUFFIX)
        })
}
