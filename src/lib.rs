//! Front-end for named text-processing workflows
//!
//! A workflow is a `<name>.yaml` file in a configuration directory. The user
//! picks one, submits text and the configured external program processes it:
//! `<program> <args...> <input file> --workflow <name>`. Whatever the program
//! leaves in `<name>-output.md` next to the input is shown and offered for
//! download.

pub mod cli;
pub mod commands;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod logging;
pub mod runner;
pub mod session;
pub mod settings;
pub mod utils;
pub mod web;
pub mod workflow;

pub mod prelude {
    pub use crate::cli::{get_log_settings, get_matches, get_mode, Mode};
    pub use crate::commands::{list_command, run_command};
    pub use crate::credentials::{Credential, CredentialStore};
    pub use crate::errors::{Error, Result};
    pub use crate::logging::{format_message, init_logger, LogLevel, LogSettings};
    pub use crate::runner::{EntryPoint, RunOutcome, Runner};
    pub use crate::session::{Action, Session, Workspace};
    pub use crate::settings::Settings;
    pub use crate::workflow::{list_workflows, load_config, WorkflowConfig};
}
