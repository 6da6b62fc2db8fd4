//! Client for the OpenTok partner archiving API.
//!
//! # Overview
//! Starts, stops, fetches, deletes and lists archives (recordings of video
//! sessions). Each call builds one authenticated `HttpRequest`, hands it to a
//! `Transport`, and parses the `HttpResponse` into a `Response` whose body is
//! JSON when the server says `application/json` and raw text otherwise.
//!
//! # Design
//! - `ArchivingClient` is stateless beyond its immutable credentials, base
//!   path and transport, so one instance can serve concurrent callers.
//! - The transport is injected. `UreqTransport` (default `ureq` feature) does
//!   real HTTP; tests swap in a recording fake. Without a usable transport
//!   every call fails with `ArchiveError::Request` before any I/O.
//! - HTTP error statuses are data, not errors. `Response::error_for_status`
//!   is the opt-in strict mode.
//! - Typed DTOs (`Archive`, `ArchiveList`) are available through
//!   `Response::decode` but never required.
//!
//! ```no_run
//! use archiving_core::{Archive, ArchivingClient};
//!
//! # fn main() -> archiving_core::Result<()> {
//! let client = ArchivingClient::new("100", "my-secret");
//! let response = client.start_archiving_session("2_MX4xMDB", "demo")?.error_for_status()?;
//! let archive: Archive = response.decode()?;
//! println!("recording {}", archive.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod options;
pub mod transport;
pub mod types;

pub use client::{ArchivingClient, Body, Credentials, Response, AUTH_HEADER, DEFAULT_ENDPOINT};
pub use error::{ArchiveError, ErrorKind, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::RequestOptions;
#[cfg(feature = "ureq")]
pub use transport::{UreqTransport, MAX_BODY_BYTES};
pub use transport::{DefaultTransport, Transport, UnavailableTransport};
pub use types::{Archive, ArchiveAction, ArchiveList, ArchiveStatus};
