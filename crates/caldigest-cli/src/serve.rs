//! HTTP serving of on-demand digests.
//!
//! Each request fetches the calendar and renders a fresh digest; nothing
//! is cached between requests. The listener is synchronous, so calendar
//! fetches run on a dedicated tokio runtime owned by the serve loop.

use std::io::Cursor;
use std::time::Duration;

use caldigest_core::DigestBuilder;
use caldigest_google::GoogleCalendarClient;
use tiny_http::{Header, Response, Server};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::error::{ClientError, ClientResult};
use crate::mail;

/// The digest representations the server can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestFormat {
    Plaintext,
    Html,
    Email,
}

impl DigestFormat {
    fn content_type(&self) -> &'static str {
        match self {
            Self::Plaintext => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Email => "message/rfc822",
        }
    }
}

/// What a request path asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Digest(DigestFormat),
    NotFound,
}

/// Maps a request path to a route, ignoring any query string.
pub fn classify_path(path: &str) -> Route {
    let path = path.split('?').next().unwrap_or(path);
    match path {
        "/" | "/index.html" => Route::Index,
        "/digest.txt" => Route::Digest(DigestFormat::Plaintext),
        "/digest.html" => Route::Digest(DigestFormat::Html),
        "/digest.eml" => Route::Digest(DigestFormat::Email),
        _ => Route::NotFound,
    }
}

const INDEX_PAGE: &str = "\
<html>
<head><title>caldigest</title></head>
<body>
<h1>caldigest</h1>
<ul>
<li><a href=\"/digest.txt\">digest.txt</a></li>
<li><a href=\"/digest.html\">digest.html</a></li>
<li><a href=\"/digest.eml\">digest.eml</a></li>
</ul>
</body>
</html>
";

/// Runs the HTTP listener until the process is terminated.
pub fn run(settings: &Settings, bind: &str) -> ClientResult<()> {
    let runtime = Runtime::new()?;
    let client = GoogleCalendarClient::new(settings.api_key.clone(), Duration::from_secs(30))?;
    let builder = DigestBuilder::new(settings.linkprefs.clone(), settings.templates.clone());

    let server = Server::http(bind)
        .map_err(|e| ClientError::Serve(format!("failed to bind {}: {}", bind, e)))?;
    info!("serving digests on http://{}", bind);

    for request in server.incoming_requests() {
        let route = classify_path(request.url());
        info!("{} {}", request.method(), request.url());

        let response = match route {
            Route::Index => page(200, "text/html; charset=utf-8", INDEX_PAGE.as_bytes()),
            Route::Digest(format) => {
                match fetch_digest(settings, &runtime, &client, &builder, format) {
                    Ok(Some(body)) => page(200, format.content_type(), &body),
                    Ok(None) => page(
                        200,
                        "text/plain; charset=utf-8",
                        b"No upcoming events.\n",
                    ),
                    Err(e) => {
                        error!("digest request failed: {}", e);
                        page(500, "text/plain; charset=utf-8", b"digest unavailable\n")
                    }
                }
            }
            Route::NotFound => page(404, "text/plain; charset=utf-8", b"not found\n"),
        };

        if let Err(e) = request.respond(response) {
            warn!("failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Fetches the calendar and renders one digest representation.
fn fetch_digest(
    settings: &Settings,
    runtime: &Runtime,
    client: &GoogleCalendarClient,
    builder: &DigestBuilder,
    format: DigestFormat,
) -> ClientResult<Option<Vec<u8>>> {
    let raw_events = runtime.block_on(client.upcoming_events(&settings.calendar_id))?;
    let Some(digest) = builder.build(&raw_events)? else {
        return Ok(None);
    };

    let body = match format {
        DigestFormat::Plaintext => digest.plaintext.into_bytes(),
        DigestFormat::Html => digest.html.into_bytes(),
        DigestFormat::Email => mail::compose(settings, &digest)?.formatted(),
    };
    Ok(Some(body))
}

fn page(status: u16, content_type: &str, body: &[u8]) -> Response<Cursor<Vec<u8>>> {
    let header = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
        .expect("invalid content-type header");
    Response::from_data(body.to_vec())
        .with_status_code(status)
        .with_header(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_cover_all_formats() {
        assert_eq!(classify_path("/"), Route::Index);
        assert_eq!(classify_path("/index.html"), Route::Index);
        assert_eq!(classify_path("/digest.txt"), Route::Digest(DigestFormat::Plaintext));
        assert_eq!(classify_path("/digest.html"), Route::Digest(DigestFormat::Html));
        assert_eq!(classify_path("/digest.eml"), Route::Digest(DigestFormat::Email));
    }

    #[test]
    fn query_strings_are_ignored() {
        assert_eq!(
            classify_path("/digest.txt?cachebust=1"),
            Route::Digest(DigestFormat::Plaintext)
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(classify_path("/other.txt"), Route::NotFound);
        assert_eq!(classify_path("/digest.json"), Route::NotFound);
    }

    #[test]
    fn content_types_match_formats() {
        assert_eq!(DigestFormat::Email.content_type(), "message/rfc822");
        assert!(DigestFormat::Html.content_type().starts_with("text/html"));
    }
}
