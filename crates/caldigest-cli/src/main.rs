//! caldigest CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use caldigest_core::DigestBuilder;
use caldigest_core::tracing::{TracingConfig, init_tracing};
use caldigest_google::GoogleCalendarClient;
use clap::Parser;
use tokio::runtime::Runtime;
use tracing::info;

use caldigest_cli::cli::{Cli, Command};
use caldigest_cli::config::{FileConfig, Settings};
use caldigest_cli::error::ClientResult;
use caldigest_cli::{mail, serve};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else if matches!(cli.command, Some(Command::Serve { .. })) {
        TracingConfig::serve()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    let file = match cli.config {
        Some(ref path) => FileConfig::load_from(path)?,
        None => FileConfig::load()?,
    };
    let settings = Settings::resolve(&cli, file)?;

    match cli.command {
        Some(Command::Serve { ref bind }) => serve::run(&settings, bind),
        None => run_digest(&settings),
    }
}

/// Fetches the calendar once, builds the digest, and delivers it.
fn run_digest(settings: &Settings) -> ClientResult<()> {
    let runtime = Runtime::new()?;
    let client = GoogleCalendarClient::new(settings.api_key.clone(), Duration::from_secs(30))?;
    let raw_events = runtime.block_on(client.upcoming_events(&settings.calendar_id))?;

    let builder = DigestBuilder::new(settings.linkprefs.clone(), settings.templates.clone());
    let Some(digest) = builder.build(&raw_events)? else {
        info!("no upcoming events, nothing to send");
        return Ok(());
    };

    if let Some(ref path) = settings.textfile {
        std::fs::write(path, &digest.plaintext)?;
        info!("wrote plaintext digest to {}", path.display());
    }
    if let Some(ref path) = settings.htmlfile {
        std::fs::write(path, &digest.html)?;
        info!("wrote HTML digest to {}", path.display());
    }

    // The email is only composed when something consumes it.
    if settings.emailfile.is_none() && settings.no_send {
        return Ok(());
    }
    let email = mail::compose(settings, &digest)?;

    if let Some(ref path) = settings.emailfile {
        std::fs::write(path, email.formatted())?;
        info!("wrote email message to {}", path.display());
    }
    if settings.no_send {
        info!("--no-send set, skipping delivery");
        return Ok(());
    }
    mail::send(settings, &email)
}
