use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const AUTH_HEADER: &str = "x-tb-partner-auth";
const DEFAULT_COUNT: usize = 50;
const MAX_COUNT: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStatus {
    Started,
    Stopped,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    pub id: Uuid,
    pub status: ArchiveStatus,
    pub name: Option<String>,
    pub session_id: String,
    pub partner_id: Option<u64>,
    pub created_at: i64,
    pub duration: u64,
    pub size: u64,
    pub url: Option<String>,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArchiveList {
    pub count: usize,
    pub items: Vec<Archive>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveAction {
    pub action: String,
    pub session_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub offset: Option<usize>,
    pub count: Option<usize>,
}

/// Partner key and secret the server accepts.
#[derive(Clone, Debug)]
pub struct Partner {
    pub api_key: String,
    pub api_secret: String,
}

impl Partner {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

#[derive(Default)]
struct Store {
    next_seq: u64,
    archives: HashMap<Uuid, (u64, Archive)>,
}

#[derive(Clone)]
struct AppState {
    partner: Arc<Partner>,
    db: Arc<RwLock<Store>>,
}

/// Error reply with a JSON `{"message": ...}` body.
struct ApiFailure(StatusCode, &'static str);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "code": self.0.as_u16(), "message": self.1 }))).into_response()
    }
}

pub fn app(partner: Partner) -> Router {
    let state = AppState {
        partner: Arc::new(partner),
        db: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route("/v2/partner/{key}/archive", get(list_archives).post(start_archive))
        .route(
            "/v2/partner/{key}/archive/{id}",
            get(get_archive).post(stop_archive).delete(delete_archive),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, partner: Partner) -> Result<(), std::io::Error> {
    axum::serve(listener, app(partner)).await
}

fn authorize(state: &AppState, key: &str, headers: &HeaderMap) -> Result<(), ApiFailure> {
    let expected = format!("{}:{}", state.partner.api_key, state.partner.api_secret);
    let presented = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());
    if key == state.partner.api_key && presented == Some(expected.as_str()) {
        Ok(())
    } else {
        tracing::warn!(key, "rejected partner credentials");
        Err(ApiFailure(StatusCode::FORBIDDEN, "Invalid API_KEY or PARTNER_SECRET"))
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

async fn list_archives(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ArchiveList>, ApiFailure> {
    authorize(&state, &key, &headers)?;
    let offset = params.offset.unwrap_or(0);
    let count = params.count.unwrap_or(DEFAULT_COUNT).min(MAX_COUNT);

    let store = state.db.read().await;
    let mut entries: Vec<&(u64, Archive)> = store.archives.values().collect();
    // Most recently started first.
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    let items = entries
        .into_iter()
        .skip(offset)
        .take(count)
        .map(|(_, archive)| archive.clone())
        .collect();

    Ok(Json(ArchiveList {
        count: store.archives.len(),
        items,
    }))
}

async fn start_archive(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(input): Json<ArchiveAction>,
) -> Result<Json<Archive>, ApiFailure> {
    authorize(&state, &key, &headers)?;
    let session_id = match (input.action.as_str(), input.session_id) {
        ("start", Some(session_id)) if !session_id.is_empty() => session_id,
        _ => {
            return Err(ApiFailure(
                StatusCode::BAD_REQUEST,
                "Invalid SessionId or invalid action",
            ))
        }
    };

    let mut store = state.db.write().await;
    let already_recording = store
        .archives
        .values()
        .any(|(_, a)| a.session_id == session_id && a.status == ArchiveStatus::Started);
    if already_recording {
        return Err(ApiFailure(StatusCode::CONFLICT, "Session already being recorded"));
    }

    let archive = Archive {
        id: Uuid::new_v4(),
        status: ArchiveStatus::Started,
        name: input.name,
        session_id,
        partner_id: key.parse().ok(),
        created_at: now_millis(),
        duration: 0,
        size: 0,
        url: None,
        reason: String::new(),
    };
    let seq = store.next_seq;
    store.next_seq += 1;
    store.archives.insert(archive.id, (seq, archive.clone()));
    tracing::info!(archive_id = %archive.id, session_id = %archive.session_id, "archive started");
    Ok(Json(archive))
}

async fn get_archive(
    State(state): State<AppState>,
    Path((key, id)): Path<(String, Uuid)>,
    headers: HeaderMap,
) -> Result<Json<Archive>, ApiFailure> {
    authorize(&state, &key, &headers)?;
    let store = state.db.read().await;
    store
        .archives
        .get(&id)
        .map(|(_, archive)| Json(archive.clone()))
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "Archive not found"))
}

async fn stop_archive(
    State(state): State<AppState>,
    Path((key, id)): Path<(String, Uuid)>,
    headers: HeaderMap,
    Json(input): Json<ArchiveAction>,
) -> Result<Json<Archive>, ApiFailure> {
    authorize(&state, &key, &headers)?;
    if input.action != "stop" {
        return Err(ApiFailure(StatusCode::BAD_REQUEST, "Invalid action"));
    }

    let mut store = state.db.write().await;
    let (_, archive) = store
        .archives
        .get_mut(&id)
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "Archive not found"))?;
    if archive.status != ArchiveStatus::Started {
        return Err(ApiFailure(StatusCode::CONFLICT, "Archive is not currently recording"));
    }
    archive.status = ArchiveStatus::Stopped;
    archive.duration = ((now_millis() - archive.created_at).max(0) / 1000) as u64;
    tracing::info!(archive_id = %id, duration = archive.duration, "archive stopped");
    Ok(Json(archive.clone()))
}

async fn delete_archive(
    State(state): State<AppState>,
    Path((key, id)): Path<(String, Uuid)>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiFailure> {
    authorize(&state, &key, &headers)?;
    let mut store = state.db.write().await;
    store
        .archives
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "Archive not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_serializes_camel_case() {
        let archive = Archive {
            id: Uuid::nil(),
            status: ArchiveStatus::Started,
            name: Some("demo".to_string()),
            session_id: "s1".to_string(),
            partner_id: Some(100),
            created_at: 1,
            duration: 0,
            size: 0,
            url: None,
            reason: String::new(),
        };
        let json = serde_json::to_value(&archive).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["status"], "started");
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["partnerId"], 100);
        assert!(json["url"].is_null());
    }

    #[test]
    fn start_action_parses_client_payload() {
        let input: ArchiveAction =
            serde_json::from_str(r#"{"action":"start","sessionId":"s1","name":"n"}"#).unwrap();
        assert_eq!(input.action, "start");
        assert_eq!(input.session_id.as_deref(), Some("s1"));
        assert_eq!(input.name.as_deref(), Some("n"));
    }

    #[test]
    fn stop_action_needs_only_action() {
        let input: ArchiveAction = serde_json::from_str(r#"{"action":"stop"}"#).unwrap();
        assert!(input.session_id.is_none());
        assert!(input.name.is_none());
    }

    #[test]
    fn action_is_required() {
        let result: Result<ArchiveAction, _> = serde_json::from_str(r#"{"sessionId":"s1"}"#);
        assert!(result.is_err());
    }
}
