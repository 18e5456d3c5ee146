//! gcal-time-tracker CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use timetracker_cli::cli::{Cli, Command};
use timetracker_cli::commands;
use timetracker_cli::{ClientResult, ConsolePrompt, Severity};
use timetracker_core::{AppDir, TracingConfig, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing.with_format(cli.log_format.into())) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.severity() {
            Severity::Reported => {
                println!("{}", e);
                ExitCode::SUCCESS
            }
            Severity::Fatal => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let dir = match cli.app_dir {
        Some(path) => AppDir::new(path),
        None => AppDir::from_home_dir()?,
    };
    tracing::debug!(root = %dir.root().display(), "using application directory");

    let mut out = io::stdout();
    match cli.command.unwrap_or(Command::Calendars) {
        Command::Calendars => {
            let mut prompt = ConsolePrompt::stdio(cli.open_browser);
            commands::calendars::run(&dir, cli.json, &mut prompt, &mut out).await
        }
        Command::Auth { force } => {
            let mut prompt = ConsolePrompt::stdio(cli.open_browser);
            commands::auth::run(&dir, force, &mut prompt, &mut out).await
        }
        Command::Paths => commands::paths::run(&dir, &mut out),
    }
}
