//! Digest email composition and SMTP delivery.
//!
//! The digest goes out as a `multipart/alternative` message carrying the
//! plaintext and HTML renderings of the same event list.

use caldigest_core::Digest;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::config::Settings;
use crate::error::{ClientError, ClientResult};

/// Builds the digest email message.
///
/// # Errors
///
/// Fails when sender or recipient is unset or does not parse as an
/// address.
pub fn compose(settings: &Settings, digest: &Digest) -> ClientResult<Message> {
    let sender = mailbox(settings.sender.as_deref(), "sender")?;
    let recipient = mailbox(settings.recipient.as_deref(), "recipient")?;

    Message::builder()
        .from(sender)
        .to(recipient)
        .subject(settings.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            digest.plaintext.clone(),
            digest.html.clone(),
        ))
        .map_err(|e| ClientError::Mail(format!("failed to build message: {}", e)))
}

/// Delivers the message through the configured SMTP relay.
pub fn send(settings: &Settings, email: &Message) -> ClientResult<()> {
    let mut builder =
        SmtpTransport::builder_dangerous(settings.smtp_host.as_str()).port(settings.smtp_port);

    if let (Some(username), Some(password)) =
        (&settings.smtp_username, &settings.smtp_password)
    {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    let transport = builder.build();
    transport
        .send(email)
        .map_err(|e| ClientError::Mail(format!("SMTP delivery failed: {}", e)))?;

    info!(
        "digest sent to {} via {}:{}",
        settings.recipient.as_deref().unwrap_or("?"),
        settings.smtp_host,
        settings.smtp_port
    );
    Ok(())
}

fn mailbox(address: Option<&str>, role: &str) -> ClientResult<Mailbox> {
    let address =
        address.ok_or_else(|| ClientError::Mail(format!("no {} address configured", role)))?;
    address
        .parse()
        .map_err(|e| ClientError::Mail(format!("invalid {} address {}: {}", role, address, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::{FileConfig, Settings};
    use clap::Parser;

    fn settings() -> Settings {
        let file: FileConfig = toml::from_str(
            r#"
[templates]
plaintext_document = "{date}\n{summary}\n{details}"
plaintext_summary = "{index}. {title}"
plaintext_detail = "{title}: {description}"
html_document = "<html>{summary}{details}</html>"
html_summary = "<li>{title}</li>"
html_detail = "<p>{description}</p>"
"#,
        )
        .expect("invalid test config");
        let cli = Cli::parse_from([
            "caldigest",
            "--key",
            "k",
            "--calendar-id",
            "cal",
            "--sender",
            "digest@example.org",
            "--recipient",
            "list@example.org",
            "--subject",
            "This week",
        ]);
        Settings::resolve(&cli, file).expect("resolve failed")
    }

    fn digest() -> Digest {
        Digest {
            plaintext: "plain body".to_string(),
            html: "<p>html body</p>".to_string(),
        }
    }

    #[test]
    fn composes_multipart_alternative() {
        let email = compose(&settings(), &digest()).expect("compose failed");
        let formatted = String::from_utf8(email.formatted()).expect("invalid message bytes");
        assert!(formatted.contains("Subject: This week"));
        assert!(formatted.contains("From: digest@example.org"));
        assert!(formatted.contains("To: list@example.org"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("plain body"));
        assert!(formatted.contains("<p>html body</p>"));
    }

    #[test]
    fn missing_recipient_is_a_mail_error() {
        let mut settings = settings();
        settings.recipient = None;
        let err = compose(&settings, &digest()).expect_err("compose should fail");
        assert!(matches!(err, ClientError::Mail(_)));
        assert!(err.to_string().contains("recipient"));
    }

    #[test]
    fn invalid_sender_is_a_mail_error() {
        let mut settings = settings();
        settings.sender = Some("not an address".to_string());
        let err = compose(&settings, &digest()).expect_err("compose should fail");
        assert!(err.to_string().contains("sender"));
    }
}
