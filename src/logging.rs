use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;
use log::LevelFilter;

/// Verbosity level for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warning,
    /// Default
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Unknown log level: {s}")),
        }
    }
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }

    /// Level selected by repeating `-v`
    pub fn from_occurrences(occurrences: u8) -> Self {
        match occurrences {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Where and how much to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    /// Timestamped log file, `None` disables file logging
    pub file: Option<PathBuf>,
}

/// Install the global logger
///
/// The console goes to stderr so `run` can stream workflow output on stdout.
/// The web server and HTTP stack stay at `warn` below `trace`.
pub fn init_logger(settings: &LogSettings) -> Result<()> {
    let level = settings.level.to_level_filter();
    let library_level = if settings.level == LogLevel::Trace {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    };

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::White)
        .trace(Color::BrightBlack);
    let colored = atty::is(atty::Stream::Stderr);

    let console = Dispatch::new()
        .format(move |out, message, record| {
            if colored {
                out.finish(format_args!(
                    "\x1B[{}m{}\x1B[0m",
                    colors.get_color(&record.level()).to_fg_str(),
                    message
                ))
            } else {
                out.finish(format_args!("{}: {}", record.level(), message))
            }
        })
        .chain(std::io::stderr());

    let mut logger = Dispatch::new()
        .level(level)
        .level_for("hyper", library_level)
        .level_for("mio", library_level)
        .level_for("tokio", library_level)
        .chain(console);

    if let Some(file) = &settings.file {
        let log_file = fern::log_file(file)
            .with_context(|| format!("Failed to open log file {}", file.display()))?;
        logger = logger.chain(
            Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(log_file),
        );
    }

    logger.apply()?;
    log::debug!("Logger initialized: {settings:?}");
    Ok(())
}

/// Pick the coloured variant of a message when stdout is a terminal
pub fn format_message(message: &str, colored_message: &str) -> String {
    if atty::is(atty::Stream::Stdout) {
        colored_message.to_string()
    } else {
        message.to_string()
    }
}
