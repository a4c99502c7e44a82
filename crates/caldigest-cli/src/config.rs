//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/caldigest/config.toml` by default. Every value can be
//! overridden on the command line; CLI flags win over the file.

use std::path::{Path, PathBuf};

use caldigest_core::TemplateSet;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};

/// Default description labels scanned for event links, in preference order.
pub const DEFAULT_LINKPREFS: &str = "wikipage, wiki, webpage, website, homepage, site, event, \
                                     info, more info, more information, googlecalendar";

/// Configuration file contents (`config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Google Calendar API key.
    pub key: Option<String>,

    /// Calendar ID to digest.
    pub calendar_id: Option<String>,

    /// Preferred link labels, comma-separated.
    pub linkprefs: Option<String>,

    /// Subject line for the digest email.
    pub subject: Option<String>,

    /// Directory containing template files.
    pub template_dir: Option<PathBuf>,

    /// Mail delivery settings.
    #[serde(default)]
    pub mail: MailConfig,

    /// Inline template overrides.
    #[serde(default)]
    pub templates: TemplateOverrides,
}

/// Mail delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Recipient address.
    pub recipient: Option<String>,

    /// Sender address.
    pub sender: Option<String>,

    /// SMTP relay hostname.
    pub smtp_host: String,

    /// SMTP relay port.
    pub smtp_port: u16,

    /// SMTP username.
    pub smtp_username: Option<String>,

    /// SMTP password.
    pub smtp_password: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            recipient: None,
            sender: None,
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
            smtp_username: None,
            smtp_password: None,
        }
    }
}

/// Inline templates from the `[templates]` table. Fields left unset here
/// must be supplied by the template directory; a template configured in
/// neither place is a configuration error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOverrides {
    pub plaintext_document: Option<String>,
    pub plaintext_summary: Option<String>,
    pub plaintext_detail: Option<String>,
    pub html_document: Option<String>,
    pub html_summary: Option<String>,
    pub html_detail: Option<String>,
}

impl FileConfig {
    /// Loads configuration from the default path; a missing file means
    /// defaults.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read config: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("caldigest")
            .join("config.toml")
    }
}

/// Fully resolved settings for one run, CLI flags layered over the file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub calendar_id: String,
    pub linkprefs: Vec<String>,
    pub templates: TemplateSet,
    pub subject: String,
    pub recipient: Option<String>,
    pub sender: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub textfile: Option<PathBuf>,
    pub htmlfile: Option<PathBuf>,
    pub emailfile: Option<PathBuf>,
    pub no_send: bool,
}

impl Settings {
    /// Merges CLI flags over the configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the API key or calendar ID is set in neither place, when
    /// a template directory cannot be read, or when any of the six
    /// templates is configured in neither the `[templates]` table nor the
    /// template directory.
    pub fn resolve(cli: &Cli, file: FileConfig) -> ClientResult<Self> {
        let api_key = cli
            .key
            .clone()
            .or(file.key)
            .ok_or_else(|| ClientError::Config("no API key set (--key or `key`)".to_string()))?;
        let calendar_id = cli.calendar_id.clone().or(file.calendar_id).ok_or_else(|| {
            ClientError::Config("no calendar ID set (--calendar-id or `calendar_id`)".to_string())
        })?;

        let linkprefs = parse_linkprefs(
            cli.linkprefs
                .as_deref()
                .or(file.linkprefs.as_deref())
                .unwrap_or(DEFAULT_LINKPREFS),
        );

        let template_dir = cli.template_dir.clone().or(file.template_dir.clone());
        let templates = resolve_templates(file.templates.clone(), template_dir.as_deref())?;

        Ok(Self {
            api_key,
            calendar_id,
            linkprefs,
            templates,
            subject: cli
                .subject
                .clone()
                .or(file.subject)
                .unwrap_or_else(|| "Upcoming events".to_string()),
            recipient: cli.recipient.clone().or(file.mail.recipient),
            sender: cli.sender.clone().or(file.mail.sender),
            smtp_host: cli.smtp_host.clone().unwrap_or(file.mail.smtp_host),
            smtp_port: cli.smtp_port.unwrap_or(file.mail.smtp_port),
            smtp_username: cli.smtp_username.clone().or(file.mail.smtp_username),
            smtp_password: cli.smtp_password.clone().or(file.mail.smtp_password),
            textfile: cli.textfile.clone(),
            htmlfile: cli.htmlfile.clone(),
            emailfile: cli.emailfile.clone(),
            no_send: cli.no_send,
        })
    }
}

/// Splits a comma-separated preference list, dropping empty entries.
pub fn parse_linkprefs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Assembles the six templates from the inline table and the template
/// directory; the directory wins per template. A template found in
/// neither place fails resolution before the core runs.
fn resolve_templates(
    mut sources: TemplateOverrides,
    template_dir: Option<&Path>,
) -> ClientResult<TemplateSet> {
    if let Some(dir) = template_dir {
        load_template_dir(&mut sources, dir)?;
    }

    let mut missing = Vec::new();
    let mut require = |name: &'static str, value: Option<String>| {
        value.unwrap_or_else(|| {
            missing.push(name);
            String::new()
        })
    };
    let templates = TemplateSet {
        plaintext_document: require("plaintext_document", sources.plaintext_document),
        plaintext_summary: require("plaintext_summary", sources.plaintext_summary),
        plaintext_detail: require("plaintext_detail", sources.plaintext_detail),
        html_document: require("html_document", sources.html_document),
        html_summary: require("html_summary", sources.html_summary),
        html_detail: require("html_detail", sources.html_detail),
    };

    if missing.is_empty() {
        Ok(templates)
    } else {
        Err(ClientError::Config(format!(
            "no template configured for {} (add [templates] entries or --template-dir files)",
            missing.join(", ")
        )))
    }
}

/// Overlays templates from `<dir>/<name>.tmpl` files; absent files keep
/// the inline value, if any.
fn load_template_dir(templates: &mut TemplateOverrides, dir: &Path) -> ClientResult<()> {
    let fields: [(&str, &mut Option<String>); 6] = [
        ("plaintext_document", &mut templates.plaintext_document),
        ("plaintext_summary", &mut templates.plaintext_summary),
        ("plaintext_detail", &mut templates.plaintext_detail),
        ("html_document", &mut templates.html_document),
        ("html_summary", &mut templates.html_summary),
        ("html_detail", &mut templates.html_detail),
    ];
    for (name, target) in fields {
        let path = dir.join(format!("{name}.tmpl"));
        if path.exists() {
            *target = Some(std::fs::read_to_string(&path).map_err(|e| {
                ClientError::Config(format!("failed to read template {}: {}", path.display(), e))
            })?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("caldigest").chain(args.iter().copied()))
    }

    fn full_config() -> FileConfig {
        toml::from_str(
            r#"
key = "file-key"
calendar_id = "file-cal"

[templates]
plaintext_document = "{date}\n{summary}\n{details}"
plaintext_summary = "{index}. {title}"
plaintext_detail = "{title}: {description}"
html_document = "<html>{summary}{details}</html>"
html_summary = "<li>{title}</li>"
html_detail = "<p>{description}</p>"
"#,
        )
        .unwrap()
    }

    #[test]
    fn default_linkprefs_parse_in_order() {
        let prefs = parse_linkprefs(DEFAULT_LINKPREFS);
        assert_eq!(prefs.first().map(String::as_str), Some("wikipage"));
        assert_eq!(prefs.last().map(String::as_str), Some("googlecalendar"));
        assert_eq!(prefs.len(), 11);
    }

    #[test]
    fn linkprefs_drop_empty_entries() {
        assert_eq!(parse_linkprefs("wiki, , site,"), vec!["wiki", "site"]);
    }

    #[test]
    fn cli_overrides_file() {
        let mut file = full_config();
        file.subject = Some("From the file".to_string());
        let settings =
            Settings::resolve(&cli(&["--key", "cli-key"]), file).expect("resolve failed");
        assert_eq!(settings.api_key, "cli-key");
        assert_eq!(settings.calendar_id, "file-cal");
        assert_eq!(settings.subject, "From the file");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = Settings::resolve(&cli(&["--calendar-id", "cal"]), FileConfig::default())
            .expect_err("resolve should fail");
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn missing_calendar_id_is_a_config_error() {
        let err = Settings::resolve(&cli(&["--key", "k"]), FileConfig::default())
            .expect_err("resolve should fail");
        assert!(err.to_string().contains("calendar ID"));
    }

    #[test]
    fn mail_defaults_apply() {
        let settings = Settings::resolve(&cli(&[]), full_config()).expect("resolve failed");
        assert_eq!(settings.smtp_host, "localhost");
        assert_eq!(settings.smtp_port, 25);
        assert!(settings.recipient.is_none());
    }

    #[test]
    fn inline_templates_are_used() {
        let mut file = full_config();
        file.templates.plaintext_summary = Some("* {title}".to_string());
        let settings = Settings::resolve(&cli(&[]), file).expect("resolve failed");
        assert_eq!(settings.templates.plaintext_summary, "* {title}");
        assert_eq!(settings.templates.html_summary, "<li>{title}</li>");
    }

    #[test]
    fn no_templates_configured_is_a_config_error() {
        let file: FileConfig = toml::from_str(
            r#"
key = "k"
calendar_id = "cal"
"#,
        )
        .unwrap();
        let err = Settings::resolve(&cli(&[]), file).expect_err("resolve should fail");
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("no template configured"));
    }

    #[test]
    fn partially_configured_templates_name_the_missing_ones() {
        let mut file = full_config();
        file.templates.html_detail = None;
        file.templates.plaintext_detail = None;
        let err = Settings::resolve(&cli(&[]), file).expect_err("resolve should fail");
        let message = err.to_string();
        assert!(message.contains("plaintext_detail"));
        assert!(message.contains("html_detail"));
        assert!(!message.contains("plaintext_document"));
    }

    #[test]
    fn template_dir_without_files_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let file: FileConfig = toml::from_str(
            r#"
key = "k"
calendar_id = "cal"
"#,
        )
        .unwrap();
        let err = Settings::resolve(
            &cli(&["--template-dir", dir.path().to_str().unwrap()]),
            file,
        )
        .expect_err("resolve should fail");
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("plaintext_document"));
    }

    #[test]
    fn template_dir_overrides_inline() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        std::fs::write(dir.path().join("plaintext_summary.tmpl"), "- {title}")
            .expect("write failed");

        let settings = Settings::resolve(
            &cli(&["--template-dir", dir.path().to_str().unwrap()]),
            full_config(),
        )
        .expect("resolve failed");
        assert_eq!(settings.templates.plaintext_summary, "- {title}");
        assert_eq!(settings.templates.html_summary, "<li>{title}</li>");
    }

    #[test]
    fn template_dir_fills_templates_missing_inline() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        std::fs::write(dir.path().join("html_detail.tmpl"), "<div>{description}</div>")
            .expect("write failed");

        let mut file = full_config();
        file.templates.html_detail = None;
        let settings = Settings::resolve(
            &cli(&["--template-dir", dir.path().to_str().unwrap()]),
            file,
        )
        .expect("resolve failed");
        assert_eq!(settings.templates.html_detail, "<div>{description}</div>");
    }

    #[test]
    fn bad_config_toml_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "key = [not toml").expect("write failed");
        let err = FileConfig::load_from(&path).expect_err("load should fail");
        assert!(matches!(err, ClientError::Config(_)));
    }
}
