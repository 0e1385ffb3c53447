//! Command-line counterparts of the form: listing workflows and one-shot runs

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use log::{info, warn};

use crate::credentials::CredentialStore;
use crate::logging::format_message;
use crate::runner::RunOutcome;
use crate::settings::Settings;

/// Print every available workflow, one per line
pub fn list_command(settings: &Settings) -> Result<()> {
    let workspace = settings.workspace();
    let workflows = workspace.workflows().with_context(|| {
        format!(
            "Failed to list workflows in {}",
            workspace.config_dir().display()
        )
    })?;

    if workflows.is_empty() {
        warn!(
            "No workflow configurations found in {}",
            workspace.config_dir().display()
        );
    }

    let mut stdout = io::stdout().lock();
    for workflow in workflows {
        writeln!(
            stdout,
            "{}",
            format_message(&workflow, &workflow.green().to_string())
        )?;
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read input from standard input")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read input file {input}"))
    }
}

/// Process one input with `workflow` using credentials from the environment
///
/// The output artifact goes to `output` when given, otherwise to stdout. A
/// failing program is reported with its captured streams and turned into an
/// error.
pub fn run_command(
    settings: &Settings,
    input: &str,
    workflow: &str,
    output: Option<&Path>,
) -> Result<()> {
    let workspace = settings.workspace();
    workspace.load_config(workflow)?;

    let text = read_input(input)?;
    let credentials = CredentialStore::from_env();
    let outcome = workspace.runner().run(&text, workflow, &credentials)?;

    match outcome {
        RunOutcome::Completed { file_name, content } => match output {
            Some(path) => {
                fs::write(path, &content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote {file_name} to {}", path.display());
                Ok(())
            }
            None => {
                io::stdout().lock().write_all(content.as_bytes())?;
                Ok(())
            }
        },
        RunOutcome::MissingOutput { stdout, stderr } => {
            warn!("Output file not found. Displaying standard output and error for debugging:");
            io::stdout().lock().write_all(stdout.as_bytes())?;
            io::stderr().lock().write_all(stderr.as_bytes())?;
            Ok(())
        }
        RunOutcome::Failed {
            code,
            stdout,
            stderr,
        } => {
            io::stdout().lock().write_all(stdout.as_bytes())?;
            io::stderr().lock().write_all(stderr.as_bytes())?;
            Err(match code {
                Some(code) => anyhow!("Workflow '{workflow}' failed with exit code {code}"),
                None => anyhow!("Workflow '{workflow}' was terminated by a signal"),
            })
        }
    }
}
