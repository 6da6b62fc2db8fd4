//! Request body encodings.
//!
//! A `RequestOptions` pairs a request body with the content type that labels
//! it on the wire. The transport code only ever asks for `data_string()` and
//! `content_type()`, so it never needs to know which encoding was chosen.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body of a POST or PUT request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOptions {
    /// Any JSON-serializable structure, encoded at send time.
    Json(Value),
    /// A body already encoded as `key=value&key=value`. Sent untouched.
    Form(String),
}

impl RequestOptions {
    /// Capture `value` as a JSON body.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(RequestOptions::Json(serde_json::to_value(value)?))
    }

    pub fn form(encoded: impl Into<String>) -> Self {
        RequestOptions::Form(encoded.into())
    }

    /// The exact bytes that go on the wire, as a string.
    pub fn data_string(&self) -> String {
        match self {
            // Serializing a `Value` cannot fail: its keys are always strings.
            RequestOptions::Json(value) => value.to_string(),
            RequestOptions::Form(encoded) => encoded.clone(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RequestOptions::Json(_) => JSON_CONTENT_TYPE,
            RequestOptions::Form(_) => FORM_CONTENT_TYPE,
        }
    }
}
