//! Pluggable HTTP transports.
//!
//! # Design
//! `ArchivingClient` never opens sockets itself. It hands an `HttpRequest`
//! to a `Transport` and parses whatever `HttpResponse` comes back. The
//! default transport is ureq-backed; builds without the `ureq` feature get
//! `UnavailableTransport`, which makes every call fail up front with a
//! `Request` error instead of attempting the network.

use crate::error::{ArchiveError, Result};
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx statuses as data. Only failures to
/// complete the exchange (DNS, connect, I/O) are errors, and those should be
/// `ArchiveError::Request`.
pub trait Transport: Send + Sync {
    /// Whether this transport can make calls at all in the current build.
    fn is_available(&self) -> bool {
        true
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Stand-in used when no HTTP backend is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTransport;

impl Transport for UnavailableTransport {
    fn is_available(&self) -> bool {
        false
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        Err(ArchiveError::Request(format!(
            "no HTTP transport available for {} {}",
            request.method.as_str(),
            request.url
        )))
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_backend::{UreqTransport, MAX_BODY_BYTES};

/// Transport picked by `ArchivingClient::new`.
#[cfg(feature = "ureq")]
pub type DefaultTransport = UreqTransport;

/// Transport picked by `ArchivingClient::new`.
#[cfg(not(feature = "ureq"))]
pub type DefaultTransport = UnavailableTransport;

#[cfg(feature = "ureq")]
mod ureq_backend {
    use std::fmt;
    use std::time::Duration;

    use ureq::typestate::WithBody;
    use ureq::{Agent, RequestBuilder};

    use crate::error::{ArchiveError, Result};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    use super::Transport;

    /// Largest response body read before the call fails with a `Request`
    /// error. Raised from ureq's 10 MiB default so large archive listings fit.
    pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

    /// Blocking transport backed by a ureq `Agent`.
    ///
    /// Status codes are never turned into errors, and there is no timeout
    /// unless `with_timeout` is used. Bodies are capped at `MAX_BODY_BYTES`
    /// and must be valid UTF-8; anything else is rejected rather than
    /// rewritten.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("UreqTransport").finish_non_exhaustive()
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::build(None)
        }

        /// Bound every round trip, connect through body read, by `timeout`.
        pub fn with_timeout(timeout: Duration) -> Self {
            Self::build(Some(timeout))
        }

        fn build(timeout: Option<Duration>) -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            let url = request.url.as_str();
            let body = request.body.as_deref();

            let result = match request.method {
                HttpMethod::Get => with_headers(self.agent.get(url), request).call(),
                HttpMethod::Delete => with_headers(self.agent.delete(url), request).call(),
                HttpMethod::Post => send(with_headers(self.agent.post(url), request), body),
                HttpMethod::Put => send(with_headers(self.agent.put(url), request), body),
            };
            let mut response = result.map_err(|e| transport_error(request, e))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let bytes = response
                .body_mut()
                .with_config()
                .limit(MAX_BODY_BYTES)
                .read_to_vec()
                .map_err(|e| transport_error(request, e))?;
            let body = String::from_utf8(bytes).map_err(|e| {
                ArchiveError::Generic(format!(
                    "{} {} returned a body that is not UTF-8: {e}",
                    request.method.as_str(),
                    request.url
                ))
            })?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
        for (name, value) in &request.headers {
            // ureq derives the length from the body it sends.
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn send(
        builder: RequestBuilder<WithBody>,
        body: Option<&str>,
    ) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        match body {
            Some(body) => builder.send(body.as_bytes()),
            None => builder.send_empty(),
        }
    }

    fn transport_error(request: &HttpRequest, err: ureq::Error) -> ArchiveError {
        ArchiveError::Request(format!(
            "{} {} failed: {err}",
            request.method.as_str(),
            request.url
        ))
    }
}
