//! Typed views of archive responses.
//!
//! # Design
//! The client itself passes bodies through untouched. These DTOs are an
//! opt-in layer on top: call `Response::decode::<Archive>()` when a typed
//! value is wanted. Every field except `id` is optional or defaulted so a
//! server that adds or omits fields does not break decoding. They mirror the
//! mock server's schema but are defined independently; integration tests
//! catch drift.

use serde::{Deserialize, Serialize};

/// Request payload for the start and stop calls. Field order is the order
/// the fields appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveAction {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ArchiveAction {
    pub fn start(session_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            action: "start".to_string(),
            session_id: Some(session_id.into()),
            name: Some(name.into()),
        }
    }

    pub fn stop() -> Self {
        Self {
            action: "stop".to_string(),
            session_id: None,
            name: None,
        }
    }
}

/// Lifecycle state reported by the archive API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStatus {
    Started,
    Stopped,
    Available,
    Uploaded,
    Deleted,
    Failed,
    Expired,
    #[serde(other)]
    Unknown,
}

/// A single archive as returned by the start, stop and get calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    pub id: String,
    pub status: ArchiveStatus,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub partner_id: Option<u64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Seconds.
    #[serde(default)]
    pub duration: u64,
    /// Bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Page of archives returned by the list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveList {
    /// Total archives for the partner, not the length of `items`.
    pub count: u64,
    pub items: Vec<Archive>,
}
