use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type shared by the workflow front-end
#[derive(Debug)]
pub enum Error {
    /// Error related to file operations
    FileOperation {
        source: io::Error,
        path: PathBuf,
        operation: String,
    },
    /// A workflow configuration file could not be parsed
    ConfigParsing {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    /// The requested workflow has no configuration file
    WorkflowNotFound { name: String, directory: PathBuf },
    /// The external entry point could not be started
    ProcessSpawn { source: io::Error, program: String },
    /// Processing was requested without any input text
    EmptyInput,
    /// Generic error with a message
    Generic { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileOperation {
                path, operation, ..
            } => {
                write!(f, "Failed to {} file: {}", operation, path.display())
            }
            Error::ConfigParsing { path, source } => {
                write!(
                    f,
                    "Failed to parse workflow configuration {}: {source}",
                    path.display()
                )
            }
            Error::WorkflowNotFound { name, directory } => {
                write!(
                    f,
                    "Workflow '{name}' not found in {}",
                    directory.display()
                )
            }
            Error::ProcessSpawn { program, .. } => {
                write!(f, "Failed to start external program: {program}")
            }
            Error::EmptyInput => write!(f, "Please enter some text to process."),
            Error::Generic { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FileOperation { source, .. } => Some(source),
            Error::ConfigParsing { source, .. } => Some(source),
            Error::ProcessSpawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::FileOperation {
            source: err,
            path: PathBuf::new(),
            operation: "perform operation on".to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create a file operation error
pub fn file_operation_error(err: io::Error, path: PathBuf, operation: &str) -> Error {
    Error::FileOperation {
        source: err,
        path,
        operation: operation.to_string(),
    }
}

/// Helper function to create a config parsing error
pub fn config_parsing_error(err: serde_yaml::Error, path: PathBuf) -> Error {
    Error::ConfigParsing { source: err, path }
}

/// Helper function to create a workflow-not-found error
pub fn workflow_not_found_error(name: &str, directory: PathBuf) -> Error {
    Error::WorkflowNotFound {
        name: name.to_string(),
        directory,
    }
}

/// Helper function to create a process spawn error
pub fn process_spawn_error(err: io::Error, program: &str) -> Error {
    Error::ProcessSpawn {
        source: err,
        program: program.to_string(),
    }
}

/// Helper function to create a generic error
pub fn generic_error(message: &str) -> Error {
    Error::Generic {
        message: message.to_string(),
    }
}

impl Error {
    /// Whether the error means the requested workflow does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::WorkflowNotFound { .. } => true,
            Error::FileOperation { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
