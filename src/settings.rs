//! Run-time settings resolved from the command line and environment

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::ArgMatches;
use log::debug;

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_CONFIG_DIR, DEFAULT_ENTRY_ARG, DEFAULT_ENTRY_PROGRAM,
};
use crate::errors::{generic_error, Result};
use crate::runner::{EntryPoint, Runner};
use crate::session::Workspace;
use crate::utils::expand_path;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub entry_point: EntryPoint,
    pub work_dir: Option<PathBuf>,
    pub bind: SocketAddr,
}

impl Settings {
    /// Resolve settings from parsed command-line arguments
    ///
    /// # Errors
    /// Returns an error if the bind address is not a valid socket address
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let config_dir = matches
            .get_one::<String>("config_dir")
            .map(String::as_str)
            .unwrap_or(DEFAULT_CONFIG_DIR);

        let program = matches
            .get_one::<String>("entry_point")
            .map(String::as_str)
            .unwrap_or(DEFAULT_ENTRY_PROGRAM);
        // `app.py` belongs to the default program only; an explicit program
        // gets exactly the arguments it was given.
        let default_program =
            matches.value_source("entry_point") == Some(ValueSource::DefaultValue);
        let args = match matches.get_many::<String>("entry_arg") {
            Some(values) => values.map(|arg| expand_path(arg)).collect(),
            None if default_program => vec![DEFAULT_ENTRY_ARG.to_string()],
            None => Vec::new(),
        };

        let work_dir = matches
            .get_one::<String>("work_dir")
            .map(|dir| PathBuf::from(expand_path(dir)));

        let bind_str = matches
            .get_one::<String>("bind")
            .map(String::as_str)
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        let bind = bind_str
            .parse::<SocketAddr>()
            .map_err(|e| generic_error(&format!("Invalid bind address '{bind_str}': {e}")))?;

        let settings = Settings {
            config_dir: PathBuf::from(expand_path(config_dir)),
            entry_point: EntryPoint::new(expand_path(program), args),
            work_dir,
            bind,
        };
        debug!("Resolved settings: {settings:?}");
        Ok(settings)
    }

    pub fn runner(&self) -> Runner {
        Runner::new(self.entry_point.clone(), self.work_dir.clone())
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.config_dir.clone(), self.runner())
    }
}
