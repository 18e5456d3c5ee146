//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use timetracker_core::TracingOutputFormat;

/// gcal-time-tracker - authorize against Google Calendar and list calendars
#[derive(Debug, Parser)]
#[command(name = "gcal-time-tracker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this directory instead of the per-user application directory
    #[arg(long, global = true, env = "GCAL_TIME_TRACKER_DIR")]
    pub app_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true, short = 'v')]
    pub debug: bool,

    /// Log record format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Also try to open the authorization URL in the default browser
    #[arg(long, global = true, env = "GCAL_TIME_TRACKER_OPEN_BROWSER")]
    pub open_browser: bool,

    /// Print calendars as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List calendars (default)
    Calendars,

    /// Authorize and store a token without listing calendars
    Auth {
        /// Re-authorize even if a token is already stored
        #[arg(long, short)]
        force: bool,
    },

    /// Show the application directory and file paths
    Paths,
}

/// Log record formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line human-readable records
    Pretty,
    /// Single-line records
    #[default]
    Compact,
    /// JSON records
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_lists_calendars() {
        let cli = Cli::try_parse_from(["gcal-time-tracker"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.log_format, LogFormat::Compact);
    }

    #[test]
    fn auth_force_flag() {
        let cli = Cli::try_parse_from(["gcal-time-tracker", "auth", "--force"]).unwrap();
        assert_eq!(cli.command, Some(Command::Auth { force: true }));
    }

    #[test]
    fn global_flags() {
        let cli = Cli::try_parse_from([
            "gcal-time-tracker",
            "--app-dir",
            "/tmp/tracker",
            "--log-format",
            "json",
            "--json",
            "-v",
            "calendars",
        ])
        .unwrap();
        assert_eq!(cli.app_dir, Some(PathBuf::from("/tmp/tracker")));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.json);
        assert!(cli.debug);
        assert_eq!(cli.command, Some(Command::Calendars));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gcal-time-tracker",
            "calendars",
            "--json",
            "--open-browser",
            "--app-dir",
            "/tmp/tracker",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Calendars));
        assert!(cli.json);
        assert!(cli.open_browser);
        assert_eq!(cli.app_dir, Some(PathBuf::from("/tmp/tracker")));

        let cli = Cli::try_parse_from(["gcal-time-tracker", "auth", "--force", "-v"]).unwrap();
        assert_eq!(cli.command, Some(Command::Auth { force: true }));
        assert!(cli.debug);
    }

    #[test]
    fn log_format_maps_to_tracing_format() {
        assert_eq!(
            TracingOutputFormat::from(LogFormat::Pretty),
            TracingOutputFormat::Pretty
        );
        assert_eq!(
            TracingOutputFormat::from(LogFormat::Json),
            TracingOutputFormat::Json
        );
    }
}
