/// Constants used throughout the application
///
/// This module centralises all constants used in the application to make
/// them easier to manage and update.

/// Qualifier string used for application identification
pub const QUALIFIER: &str = "com";

/// Organisation name used for application identification
pub const ORGANIZATION: &str = "Ondřej Vágner";

/// Application name used for identification
///
/// Used for the per-user configuration directory that holds the log file.
pub const APPLICATION: &str = "text_workflow";

/// Extension of workflow configuration files
pub const WORKFLOW_EXTENSION: &str = "yaml";

/// Suffix appended to the workflow name to form the output artifact name
pub const OUTPUT_SUFFIX: &str = "-output.md";

/// Flag passed to the external program before the workflow name
pub const WORKFLOW_FLAG: &str = "--workflow";

/// Prefix of temporary input files
pub const TEMP_INPUT_PREFIX: &str = "twflow-";

/// Suffix of temporary input files
pub const TEMP_INPUT_SUFFIX: &str = ".txt";

/// Default directory holding `<workflow>.yaml` files
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Default external program
pub const DEFAULT_ENTRY_PROGRAM: &str = "python";

/// Argument passed to the default program before the input path
pub const DEFAULT_ENTRY_ARG: &str = "app.py";

/// Default address for the web form
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8501";

/// Default log file name
pub const LOG_FILE_DEFAULT: &str = "twflow.log";

/// Help text for the config directory option
pub const CONFIG_DIR_HELP: &str = "Directory containing <workflow>.yaml files";

/// Help text for the entry point option
pub const ENTRY_POINT_HELP: &str = "External program invoked for every processing request";

/// Help text for the entry argument option
pub const ENTRY_ARG_HELP: &str =
    "Argument placed before the input path, repeatable [default: app.py for the default program]";

/// Help text for the work directory option
pub const WORK_DIR_HELP: &str =
    "Directory for temporary input files and output artifacts [default: system temp dir]";

/// Help text for the bind option
pub const BIND_HELP: &str = "Address the web form listens on";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

/// Help text for the log level option
pub const LOG_LEVEL_HELP: &str = "Log level (error, warn, info, debug, trace); overrides -v";

/// Help text for the log file option
pub const LOG_FILE_HELP: &str = "Name of the log file, empty to disable file logging";

/// Help text for the local logging option
pub const LOCAL_LOGGING_HELP: &str =
    "Write the log file into the current directory instead of the user config directory";

/// Help text for the workflow option of `run`
pub const WORKFLOW_HELP: &str = "Name of the workflow to run";

/// Help text for the input argument of `run`
pub const INPUT_HELP: &str = "File with the text to process, or '-' to read standard input";

/// Help text for the output option of `run`
pub const OUTPUT_HELP: &str = "Write the output artifact to this path instead of standard output";
