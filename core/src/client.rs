//! Authenticated request building and response parsing for the archive API.
//!
//! # Design
//! `ArchivingClient` holds credentials, a base path and a `Transport`, and
//! carries no mutable state between calls. Every operation goes through
//! `request`, which is split the same way as the transport boundary:
//! `build_request` produces an `HttpRequest`, the transport executes it, and
//! `parse_response` turns the `HttpResponse` into a `Response`. Non-2xx
//! statuses are returned as data; only local and transport failures are
//! errors.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ArchiveError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{RequestOptions, JSON_CONTENT_TYPE};
use crate::transport::{DefaultTransport, Transport};
use crate::types::ArchiveAction;

pub const DEFAULT_ENDPOINT: &str = "https://api.opentok.com";

/// Header carrying `{api_key}:{api_secret}` on every request. The upstream
/// service expects the secret verbatim; there is no signing.
pub const AUTH_HEADER: &str = "X-TB-PARTNER-AUTH";

/// Listing window used by `list_archives`.
pub const DEFAULT_LIST_COUNT: u32 = 1000;

/// Partner API key and secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    fn auth_value(&self) -> String {
        format!("{}:{}", self.api_key, self.api_secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The response declared `Content-Type: application/json`.
    Json(Value),
    /// Any other content type, or none. The payload is untouched;
    /// `UreqTransport` refuses bodies that are not UTF-8 instead of
    /// replacing bytes.
    Text(String),
}

/// Status and body of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Body,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Opt-in strict mode: turn a non-2xx status into an error.
    ///
    /// 401 and 403 become `ArchiveError::Auth`; every other failure status
    /// becomes `ArchiveError::Generic`. The server's `message` (or `error`)
    /// field is used when the body is JSON.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = format!("HTTP {}: {}", self.status, self.server_message());
        match self.status {
            401 | 403 => Err(ArchiveError::Auth(message)),
            _ => Err(ArchiveError::Generic(message)),
        }
    }

    /// Deserialize a JSON body into `T`, e.g. `Archive` or `ArchiveList`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.body {
            Body::Json(value) => Ok(T::deserialize(value)?),
            Body::Text(_) => Err(ArchiveError::Generic(format!(
                "expected a JSON body (status {}), got text",
                self.status
            ))),
        }
    }

    fn server_message(&self) -> String {
        match &self.body {
            Body::Json(value) => value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            Body::Text(text) => text.clone(),
        }
    }
}

/// Client for the partner archive API.
///
/// Cheap to share: the configuration is immutable after construction, so
/// concurrent calls through one instance need no synchronization.
#[derive(Debug, Clone)]
pub struct ArchivingClient<T = DefaultTransport> {
    credentials: Credentials,
    base_path: String,
    transport: T,
}

impl ArchivingClient<DefaultTransport> {
    /// Client against the production endpoint using the default transport.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::with_transport(
            Credentials::new(api_key, api_secret),
            DefaultTransport::default(),
        )
    }
}

impl<T: Transport> ArchivingClient<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        let base_path = base_path(DEFAULT_ENDPOINT, credentials.api_key());
        Self {
            credentials,
            base_path,
            transport,
        }
    }

    /// Point the client at another host, e.g. a staging server.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.base_path = base_path(endpoint, self.credentials.api_key());
        self
    }

    /// `{endpoint}/v2/partner/{api_key}`; every request path is appended to it.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        options: Option<&RequestOptions>,
    ) -> HttpRequest {
        let mut headers = vec![(AUTH_HEADER.to_string(), self.credentials.auth_value())];
        let mut body = None;

        if let Some(options) = options.filter(|_| method.carries_body()) {
            let data = options.data_string();
            headers.push(("Content-Type".to_string(), options.content_type().to_string()));
            headers.push(("Content-Length".to_string(), data.len().to_string()));
            body = Some(data);
        }

        HttpRequest {
            method,
            url: format!("{}{path}", self.base_path),
            headers,
            body,
        }
    }

    pub fn parse_response(&self, response: HttpResponse) -> Result<Response> {
        let is_json = response
            .header_map()
            .get("content-type")
            .is_some_and(|ct| ct.eq_ignore_ascii_case(JSON_CONTENT_TYPE));

        let body = if is_json {
            match serde_json::from_str(&response.body) {
                Ok(value) => Body::Json(value),
                Err(e) => {
                    warn!(status = response.status, error = %e, "JSON response body did not parse");
                    return Err(ArchiveError::Generic(format!(
                        "malformed JSON body (status {}): {e}",
                        response.status
                    )));
                }
            }
        } else {
            Body::Text(response.body)
        };

        Ok(Response {
            status: response.status,
            body,
        })
    }

    /// Send one authenticated request. `path` is appended to `base_path()`.
    ///
    /// Fails with `ArchiveError::Request` before touching the network when
    /// the transport is unavailable.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: Option<&RequestOptions>,
    ) -> Result<Response> {
        if !self.transport.is_available() {
            return Err(ArchiveError::Request(
                "no HTTP transport is available in this build; enable the `ureq` feature \
                 or supply a Transport so that API calls can be made"
                    .to_string(),
            ));
        }

        let request = self.build_request(method, path, options);
        debug!(method = method.as_str(), url = %request.url, "sending archive API request");

        let response = self.transport.execute(&request)?;
        debug!(
            method = method.as_str(),
            url = %request.url,
            status = response.status,
            "archive API responded"
        );

        self.parse_response(response)
    }

    pub fn get(&self, path: &str, options: Option<&RequestOptions>) -> Result<Response> {
        self.request(HttpMethod::Get, path, options)
    }

    pub fn post(&self, path: &str, options: Option<&RequestOptions>) -> Result<Response> {
        self.request(HttpMethod::Post, path, options)
    }

    pub fn put(&self, path: &str, options: Option<&RequestOptions>) -> Result<Response> {
        self.request(HttpMethod::Put, path, options)
    }

    pub fn delete(&self, path: &str, options: Option<&RequestOptions>) -> Result<Response> {
        self.request(HttpMethod::Delete, path, options)
    }

    /// Start recording `session` under the archive name `name`.
    pub fn start_archiving_session(&self, session: &str, name: &str) -> Result<Response> {
        let options = RequestOptions::json(&ArchiveAction::start(session, name))?;
        self.post("/archive", Some(&options))
    }

    pub fn stop_archiving_session(&self, archive_id: &str) -> Result<Response> {
        let options = RequestOptions::json(&ArchiveAction::stop())?;
        self.post(&format!("/archive/{archive_id}"), Some(&options))
    }

    pub fn delete_archive(&self, archive_id: &str) -> Result<Response> {
        self.delete(&format!("/archive/{archive_id}"), None)
    }

    pub fn get_archive(&self, archive_id: &str) -> Result<Response> {
        self.get(&format!("/archive/{archive_id}"), None)
    }

    /// One page of archives. `offset` and `count` go into the query string
    /// as given.
    pub fn get_archives(&self, offset: u32, count: u32) -> Result<Response> {
        self.get(&format!("/archive?offset={offset}&count={count}"), None)
    }

    /// The first `DEFAULT_LIST_COUNT` archives, most recent first.
    pub fn list_archives(&self) -> Result<Response> {
        self.get_archives(0, DEFAULT_LIST_COUNT)
    }
}

fn base_path(endpoint: &str, api_key: &str) -> String {
    format!("{}/v2/partner/{api_key}", endpoint.trim_end_matches('/'))
}
