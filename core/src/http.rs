//! HTTP transport types described as plain data.
//!
//! # Design
//! The client builds `HttpRequest` values and parses `HttpResponse` values
//! without knowing how the bytes move. A `Transport` implementation sits in
//! between and performs the round trip, so request building and response
//! parsing stay deterministic and testable with a fake transport.
//!
//! All fields use owned types (`String`, `Vec`) so values can be recorded
//! and replayed freely in tests.

use std::collections::HashMap;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Only POST and PUT ever send a body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ArchivingClient::build_request`. `url` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport`, then handed to `ArchivingClient::parse_response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Lower-cased header names mapped to trimmed values. A repeated header
    /// keeps its last value.
    pub fn header_map(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_post_and_put_carry_bodies() {
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Put.carries_body());
        assert!(!HttpMethod::Get.carries_body());
        assert!(!HttpMethod::Delete.carries_body());
    }

    #[test]
    fn header_map_trims_names_and_values() {
        let resp = HttpResponse {
            status: 201,
            headers: vec![
                ("Content-Type".into(), "  application/json ".into()),
                ("X-Request-Id".into(), "abc:def".into()),
            ],
            body: "{}".into(),
        };
        let map = resp.header_map();
        assert_eq!(map["content-type"], "application/json");
        assert_eq!(map["x-request-id"], "abc:def");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn header_map_lowercases_and_keeps_last_duplicate() {
        let resp = HttpResponse {
            status: 200,
            headers: vec![
                ("Set-Cookie".into(), "a=1".into()),
                ("SET-COOKIE".into(), " b=2 ".into()),
            ],
            body: String::new(),
        };
        assert_eq!(resp.header_map()["set-cookie"], "b=2");
    }

    #[test]
    fn request_header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://x".into(),
            headers: vec![("X-TB-PARTNER-AUTH".into(), "k:s".into())],
            body: None,
        };
        assert_eq!(req.header("x-tb-partner-auth"), Some("k:s"));
        assert_eq!(req.header("content-type"), None);
    }
}
