//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// caldigest - Email digests of upcoming calendar events
#[derive(Debug, Parser)]
#[command(name = "caldigest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALDIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Calendar flags ---
    /// Google Calendar API key
    #[arg(long, short = 'k', env = "CALDIGEST_API_KEY")]
    pub key: Option<String>,

    /// Calendar ID to digest
    #[arg(long, short = 'i')]
    pub calendar_id: Option<String>,

    /// Preferred description labels to pull event links from, comma-separated
    #[arg(long, short = 'l')]
    pub linkprefs: Option<String>,

    // --- Mail flags ---
    /// Subject line for the digest email
    #[arg(long, short = 'S')]
    pub subject: Option<String>,

    /// Recipient address
    #[arg(long, short = 'r')]
    pub recipient: Option<String>,

    /// Sender address
    #[arg(long, short = 'f')]
    pub sender: Option<String>,

    /// SMTP relay hostname
    #[arg(long)]
    pub smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long)]
    pub smtp_port: Option<u16>,

    /// SMTP username
    #[arg(long)]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, env = "CALDIGEST_SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Build the digest but do not send any email
    #[arg(long, short = 'N')]
    pub no_send: bool,

    // --- Output flags ---
    /// Directory containing template files
    #[arg(long, short = 't')]
    pub template_dir: Option<PathBuf>,

    /// Also write the plaintext digest to this file
    #[arg(long, short = 'T')]
    pub textfile: Option<PathBuf>,

    /// Also write the HTML digest to this file
    #[arg(long, short = 'O')]
    pub htmlfile: Option<PathBuf>,

    /// Also write the full email message to this file
    #[arg(long, short = 'E')]
    pub emailfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve digests over HTTP instead of sending mail
    Serve {
        /// Address to bind the HTTP listener to
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}
