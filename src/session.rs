//! Interactive session state and the handlers for each UI action
//!
//! The session is the single state store behind the form. Every user
//! interaction is an [`Action`] applied through [`Session::handle`]; rendering
//! only reads the resulting state.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::credentials::{CredentialForm, CredentialStore};
use crate::errors::Result;
use crate::runner::{RunOutcome, Runner};
use crate::workflow::{list_workflows, load_config, WorkflowConfig};

/// Message shown once on the next render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

impl Notice {
    fn new(level: NoticeLevel, message: &str) -> Self {
        Notice {
            level,
            message: message.to_string(),
        }
    }
}

pub const EMPTY_INPUT_WARNING: &str = "Please enter some text to process.";
pub const KEYS_CLEARED_MESSAGE: &str = "All API keys cleared";
pub const MISSING_OUTPUT_WARNING: &str =
    "Output file not found. Displaying standard output and error for debugging:";
pub const FAILED_RUN_ERROR: &str =
    "Error occurred. Displaying standard output and error for debugging:";

/// Result of the most recent processing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastRun {
    pub workflow: String,
    pub outcome: RunOutcome,
}

/// Everything a user can do with the form
#[derive(Debug, Clone)]
pub enum Action {
    SelectWorkflow(String),
    EditInput(String),
    UpdateCredentials(CredentialForm),
    ClearCredentials,
    Process { workflow: String, input: String },
}

/// Where workflows live and how they are run
#[derive(Debug, Clone)]
pub struct Workspace {
    config_dir: PathBuf,
    runner: Runner,
}

impl Workspace {
    pub fn new(config_dir: PathBuf, runner: Runner) -> Self {
        Workspace { config_dir, runner }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn workflows(&self) -> Result<Vec<String>> {
        list_workflows(&self.config_dir)
    }

    pub fn load_config(&self, workflow: &str) -> Result<WorkflowConfig> {
        load_config(&self.config_dir, workflow)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    credentials: CredentialStore,
    selected_workflow: Option<String>,
    input: String,
    last_run: Option<LastRun>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn selected_workflow(&self) -> Option<&str> {
        self.selected_workflow.as_deref()
    }

    /// The selected workflow if it still exists, otherwise the first available one
    pub fn current_workflow(&self, workflows: &[String]) -> Option<String> {
        self.selected_workflow
            .as_ref()
            .filter(|name| workflows.contains(*name))
            .or_else(|| workflows.first())
            .cloned()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn last_run(&self) -> Option<&LastRun> {
        self.last_run.as_ref()
    }

    /// Take the pending notice, if any
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// The last produced output artifact as `(file name, content)`
    pub fn download(&self) -> Option<(&str, &str)> {
        match self.last_run.as_ref().map(|run| &run.outcome) {
            Some(RunOutcome::Completed { file_name, content }) => {
                Some((file_name.as_str(), content.as_str()))
            }
            _ => None,
        }
    }

    /// Apply one user action
    ///
    /// # Errors
    /// Configuration errors and failures to start the external program are
    /// returned unhandled. Child failures and missing output files are stored
    /// as the outcome of the run instead.
    pub fn handle(&mut self, action: Action, workspace: &Workspace) -> Result<()> {
        match action {
            Action::SelectWorkflow(workflow) => {
                workspace.load_config(&workflow)?;
                debug!("Selected workflow '{workflow}'");
                self.selected_workflow = Some(workflow);
            }
            Action::EditInput(input) => {
                self.input = input;
            }
            Action::UpdateCredentials(form) => {
                self.credentials.update(&form);
            }
            Action::ClearCredentials => {
                self.credentials.clear_all();
                self.notice = Some(Notice::new(NoticeLevel::Success, KEYS_CLEARED_MESSAGE));
            }
            Action::Process { workflow, input } => {
                self.process(workflow, input, workspace)?;
            }
        }
        Ok(())
    }

    fn process(&mut self, workflow: String, input: String, workspace: &Workspace) -> Result<()> {
        self.input = input;
        if self.input.is_empty() {
            self.notice = Some(Notice::new(NoticeLevel::Warning, EMPTY_INPUT_WARNING));
            return Ok(());
        }

        workspace.load_config(&workflow)?;
        self.selected_workflow = Some(workflow.clone());
        self.last_run = None;

        let outcome = workspace
            .runner()
            .run(&self.input, &workflow, &self.credentials)?;
        info!(
            "Workflow '{workflow}' finished: {}",
            if outcome.is_success() { "success" } else { "failure" }
        );

        self.notice = match &outcome {
            RunOutcome::Completed { .. } => None,
            RunOutcome::MissingOutput { .. } => {
                Some(Notice::new(NoticeLevel::Warning, MISSING_OUTPUT_WARNING))
            }
            RunOutcome::Failed { .. } => Some(Notice::new(NoticeLevel::Error, FAILED_RUN_ERROR)),
        };
        self.last_run = Some(LastRun { workflow, outcome });
        Ok(())
    }
}
