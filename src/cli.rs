use std::path::PathBuf;
use std::str::FromStr;

use clap::{
    command, crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction,
    ArgMatches, Command,
};

use crate::constants::{
    BIND_HELP, CONFIG_DIR_HELP, DEFAULT_BIND_ADDRESS, DEFAULT_CONFIG_DIR, DEFAULT_ENTRY_PROGRAM,
    ENTRY_ARG_HELP, ENTRY_POINT_HELP, INPUT_HELP, LOCAL_LOGGING_HELP,
    LOG_FILE_DEFAULT, LOG_FILE_HELP, LOG_LEVEL_HELP, OUTPUT_HELP, VERBOSE_HELP, WORKFLOW_HELP,
    WORK_DIR_HELP,
};
use crate::errors::{generic_error, Result};
use crate::logging::{LogLevel, LogSettings};
use crate::utils::find_project_folder;

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Serve the web form (the default)
    Serve,
    /// Print the available workflows
    List,
    /// Process one input without the web form
    Run {
        input: String,
        workflow: String,
        output: Option<PathBuf>,
    },
}

/// Builds the command-line interface
///
/// Global options:
/// - `config_dir`: directory with `<workflow>.yaml` files
/// - `entry_point` / `entry_arg`: the external program and its leading arguments.
///   `app.py` is only implied when the default program is used
/// - `work_dir`: where temporary inputs and output artifacts are written
/// - `bind`: address of the web form
/// - `verbose`, `log_level`, `log_file`, `log_locally`: logging
pub fn build_command() -> Command {
    let arg_config_dir = Arg::new("config_dir")
        .short('c')
        .long("config-dir")
        .env("TWFLOW_CONFIG_DIR")
        .help(CONFIG_DIR_HELP)
        .default_value(DEFAULT_CONFIG_DIR)
        .global(true);

    let arg_entry_point = Arg::new("entry_point")
        .long("entry-point")
        .env("TWFLOW_ENTRY_POINT")
        .help(ENTRY_POINT_HELP)
        .default_value(DEFAULT_ENTRY_PROGRAM)
        .global(true);

    let arg_entry_arg = Arg::new("entry_arg")
        .long("entry-arg")
        .env("TWFLOW_ENTRY_ARG")
        .help(ENTRY_ARG_HELP)
        .action(ArgAction::Append)
        .allow_hyphen_values(true)
        .global(true);

    let arg_work_dir = Arg::new("work_dir")
        .short('w')
        .long("work-dir")
        .env("TWFLOW_WORK_DIR")
        .help(WORK_DIR_HELP)
        .global(true);

    let arg_bind = Arg::new("bind")
        .short('b')
        .long("bind")
        .env("TWFLOW_BIND")
        .help(BIND_HELP)
        .default_value(DEFAULT_BIND_ADDRESS)
        .global(true);

    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .action(ArgAction::Count)
        .global(true);

    let arg_log_level = Arg::new("log_level")
        .long("log-level")
        .env("TWFLOW_LOG_LEVEL")
        .help(LOG_LEVEL_HELP)
        .value_parser(LogLevel::from_str)
        .global(true);

    let log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .env("TWFLOW_LOG_FILE")
        .help(LOG_FILE_HELP)
        .default_value(LOG_FILE_DEFAULT)
        .global(true);

    let log_locally = Arg::new("log_locally")
        .short('L')
        .long("log-locally")
        .env("TWFLOW_LOG_LOCALLY")
        .help(LOCAL_LOGGING_HELP)
        .action(ArgAction::SetTrue)
        .global(true);

    let serve = Command::new("serve").about("Serve the workflow form (default)");

    let list = Command::new("list").about("List the available workflows");

    let run = Command::new("run")
        .about("Process one input with a workflow and print the result")
        .arg(Arg::new("input").help(INPUT_HELP).required(true))
        .arg(
            Arg::new("workflow")
                .long("workflow")
                .help(WORKFLOW_HELP)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help(OUTPUT_HELP),
        );

    command!()
        .author(crate_authors!())
        .about(crate_description!())
        .name(crate_name!())
        .version(crate_version!())
        .arg(arg_config_dir)
        .arg(arg_entry_point)
        .arg(arg_entry_arg)
        .arg(arg_work_dir)
        .arg(arg_bind)
        .arg(log_file)
        .arg(log_locally)
        .arg(arg_verbose)
        .arg(arg_log_level)
        .subcommand(serve)
        .subcommand(list)
        .subcommand(run)
}

/// Parses the process arguments
///
/// # Errors
/// Returns an error if the command-line arguments cannot be parsed
pub fn get_matches() -> Result<ArgMatches> {
    Ok(build_command().get_matches())
}

/// Determines the requested mode from the parsed arguments
///
/// # Errors
/// Returns an error if a required `run` argument is missing
pub fn get_mode(matches: &ArgMatches) -> Result<Mode> {
    match matches.subcommand() {
        None | Some(("serve", _)) => Ok(Mode::Serve),
        Some(("list", _)) => Ok(Mode::List),
        Some(("run", run)) => {
            let input = run
                .get_one::<String>("input")
                .cloned()
                .ok_or_else(|| generic_error("Input argument not found"))?;
            let workflow = run
                .get_one::<String>("workflow")
                .cloned()
                .ok_or_else(|| generic_error("Workflow argument not found"))?;
            let output = run.get_one::<String>("output").map(PathBuf::from);
            Ok(Mode::Run {
                input,
                workflow,
                output,
            })
        }
        Some((other, _)) => Err(generic_error(&format!("Unknown command: {other}"))),
    }
}

/// Gets the log level: `--log-level` wins, otherwise the number of -v flags
pub fn get_verbosity(matches: &ArgMatches) -> LogLevel {
    matches
        .get_one::<LogLevel>("log_level")
        .copied()
        .unwrap_or_else(|| LogLevel::from_occurrences(matches.get_count("verbose")))
}

/// Resolves the log file path, `None` when file logging is disabled
pub fn get_log_file(matches: &ArgMatches) -> Result<Option<PathBuf>> {
    let filename = matches
        .get_one::<String>("log_file")
        .cloned()
        .unwrap_or_else(|| LOG_FILE_DEFAULT.to_string());
    if filename.is_empty() {
        Ok(None)
    } else if matches.get_flag("log_locally") {
        Ok(Some(PathBuf::from(filename)))
    } else {
        let folder = find_project_folder()?;
        Ok(Some(folder.config_dir().join(filename)))
    }
}

pub fn get_log_settings(matches: &ArgMatches) -> Result<LogSettings> {
    Ok(LogSettings {
        level: get_verbosity(matches),
        file: get_log_file(matches)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        build_command().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_default_mode_is_serve() {
        assert_eq!(get_mode(&parse(&["twflow"])).unwrap(), Mode::Serve);
        assert_eq!(get_mode(&parse(&["twflow", "serve"])).unwrap(), Mode::Serve);
        assert_eq!(get_mode(&parse(&["twflow", "list"])).unwrap(), Mode::List);
    }

    #[test]
    fn test_run_mode() {
        let matches = parse(&[
            "twflow",
            "run",
            "input.txt",
            "--workflow",
            "summarize",
            "-o",
            "out.md",
        ]);
        assert_eq!(
            get_mode(&matches).unwrap(),
            Mode::Run {
                input: "input.txt".to_string(),
                workflow: "summarize".to_string(),
                output: Some(PathBuf::from("out.md")),
            }
        );
    }

    #[test]
    fn test_run_requires_workflow() {
        let result = build_command().try_get_matches_from(["twflow", "run", "input.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let matches = parse(&["twflow", "list", "-c", "workflows", "-vv"]);
        assert_eq!(
            matches.get_one::<String>("config_dir").map(String::as_str),
            Some("workflows")
        );
        assert_eq!(get_verbosity(&matches), LogLevel::Trace);
    }

    #[test]
    fn test_log_file_locally_or_disabled() {
        let matches = parse(&["twflow", "-L", "--log-file", "local.log"]);
        assert_eq!(
            get_log_file(&matches).unwrap(),
            Some(PathBuf::from("local.log"))
        );

        let matches = parse(&["twflow", "--log-file", ""]);
        assert_eq!(get_log_file(&matches).unwrap(), None);
    }

    #[test]
    fn test_log_level_option() {
        let matches = parse(&["twflow", "--log-level", "warn", "--log-file", ""]);
        let settings = get_log_settings(&matches).unwrap();
        assert_eq!(settings.level, LogLevel::Warning);
        assert_eq!(settings.file, None);

        let result = build_command().try_get_matches_from(["twflow", "--log-level", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_command() {
        build_command().debug_assert();
    }
}
