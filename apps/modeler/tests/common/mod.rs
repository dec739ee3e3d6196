//! Fake REST backend for integration tests.
//!
//! An axum router serving the objects/fields/records endpoints from memory,
//! bound to an ephemeral port on 127.0.0.1. Knobs on [`Backend`] let tests
//! force unusual answers.

#![allow(dead_code, clippy::unwrap_used, clippy::panic)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use modeler::AppConfig;
use modeler::SyncPolicy;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How one list request is answered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListStep {
    /// Wait this long after reading state, before answering.
    pub delay_ms: u64,
    /// Answer 500 instead of the list.
    pub fail: bool,
}

impl ListStep {
    pub fn slow(delay_ms: u64) -> Self {
        Self { delay_ms, fail: false }
    }

    pub fn slow_failure(delay_ms: u64) -> Self {
        Self { delay_ms, fail: true }
    }
}

/// In-memory server state.
#[derive(Default)]
pub struct Backend {
    pub objects: Vec<Value>,
    pub fields: BTreeMap<String, Vec<Value>>,
    pub records: BTreeMap<String, Vec<Value>>,
    next_id: u64,
    /// Status answered by every create (entity is still stored).
    pub create_status: Option<u16>,
    /// Make every list endpoint answer 500.
    pub fail_lists: bool,
    /// Make every list endpoint answer this body instead of the stored list.
    pub list_body: Option<Value>,
    /// Per-request script for list endpoints, consumed front to back.
    /// Requests beyond the script are answered at once.
    pub list_script: VecDeque<ListStep>,
    /// Number of list requests served.
    pub list_calls: usize,
    /// `METHOD path` of every request served.
    pub requests: Vec<String>,
}

impl Backend {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

pub type Shared = Arc<Mutex<Backend>>;

/// A running fake backend.
pub struct FakeServer {
    pub base_url: String,
    pub state: Shared,
}

impl FakeServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Backend::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self, policy: SyncPolicy) -> AppConfig {
        let mut config = AppConfig::default();
        config.api.base_url = self.base_url.clone();
        config.api.timeout_ms = 2_000;
        config.store.sync_policy = policy;
        config
    }

    pub fn backend(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.state.lock().unwrap()
    }

    pub fn seed_object(&self, uuid: &str, name: &str) {
        self.backend()
            .objects
            .push(json!({"object_uuid": uuid, "name": name}));
    }

    pub fn seed_field(&self, object: &str, uuid: &str, name: &str) {
        self.backend()
            .fields
            .entry(object.to_string())
            .or_default()
            .push(json!({"field_uuid": uuid, "object_uuid": object, "name": name}));
    }

    pub fn seed_record(&self, object: &str, uuid: &str, values: Value) {
        let mut record = json!({"record_uuid": uuid, "object_uuid": object});
        if let (Some(map), Value::Object(extra)) = (record.as_object_mut(), values) {
            map.extend(extra);
        }
        self.backend()
            .records
            .entry(object.to_string())
            .or_default()
            .push(record);
    }
}

/// An address nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// =============================================================================
// ROUTER
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/objects", get(list_objects).post(create_object))
        .route(
            "/objects/{uuid}",
            get(get_object).put(update_object).delete(delete_object),
        )
        .route("/objects/{uuid}/fields", get(list_fields).post(create_field))
        .route(
            "/objects/{uuid}/fields/{field}",
            axum::routing::put(update_field).delete(delete_field),
        )
        .route("/objects/{uuid}/records/", get(list_records).post(create_record))
        .route(
            "/objects/{uuid}/records/{record}",
            axum::routing::put(update_record).delete(delete_record),
        )
        .with_state(state)
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

fn merge(target: &mut Value, payload: Value) {
    if let (Some(map), Value::Object(extra)) = (target.as_object_mut(), payload) {
        map.extend(extra);
    }
}

/// Answer a list request. State is read when the request arrives; a
/// scripted delay only holds back the answer.
async fn list(state: &Shared, route: String, pick: impl FnOnce(&Backend) -> Vec<Value>) -> Response {
    let (step, response) = {
        let mut backend = state.lock().unwrap();
        backend.requests.push(route);
        backend.list_calls += 1;
        let step = backend.list_script.pop_front().unwrap_or_default();
        let response = if backend.fail_lists || step.fail {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        } else if let Some(body) = backend.list_body.clone() {
            Json(body).into_response()
        } else {
            Json(Value::Array(pick(&*backend))).into_response()
        };
        (step, response)
    };
    if step.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
    }
    response
}

fn created(backend: &Backend, entity: Value) -> Response {
    match backend.create_status {
        Some(code) => (status(code), Json(json!({"message": "accepted"}))).into_response(),
        None => (StatusCode::CREATED, Json(entity)).into_response(),
    }
}

fn with_id(payload: Value, key: &str, id: &str, object: Option<&str>) -> Value {
    let mut map = match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    map.insert(key.to_string(), json!(id));
    if let Some(object) = object {
        map.insert("object_uuid".to_string(), json!(object));
    }
    Value::Object(map)
}

// -----------------------------------------------------------------------------
// OBJECTS
// -----------------------------------------------------------------------------

async fn list_objects(State(state): State<Shared>) -> Response {
    list(&state, "GET /objects".to_string(), |b| b.objects.clone()).await
}

async fn get_object(State(state): State<Shared>, Path(uuid): Path<String>) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("GET /objects/{uuid}"));
    match backend.objects.iter().find(|o| o["object_uuid"] == json!(uuid)) {
        Some(object) => Json(object.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no such object").into_response(),
    }
}

async fn create_object(State(state): State<Shared>, Json(payload): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push("POST /objects".to_string());
    let id = backend.id("obj");
    let object = with_id(payload, "object_uuid", &id, None);
    backend.objects.push(object.clone());
    created(&backend, object)
}

async fn update_object(
    State(state): State<Shared>,
    Path(uuid): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("PUT /objects/{uuid}"));
    match backend.objects.iter_mut().find(|o| o["object_uuid"] == json!(uuid)) {
        Some(object) => {
            merge(object, payload);
            // Updated objects come back wrapped in an envelope.
            Json(json!({"object": object.clone()})).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such object").into_response(),
    }
}

async fn delete_object(State(state): State<Shared>, Path(uuid): Path<String>) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("DELETE /objects/{uuid}"));
    backend.objects.retain(|o| o["object_uuid"] != json!(uuid));
    backend.fields.remove(&uuid);
    backend.records.remove(&uuid);
    StatusCode::NO_CONTENT.into_response()
}

// -----------------------------------------------------------------------------
// FIELDS
// -----------------------------------------------------------------------------

async fn list_fields(State(state): State<Shared>, Path(uuid): Path<String>) -> Response {
    let route = format!("GET /objects/{uuid}/fields");
    list(&state, route, |b| b.fields.get(&uuid).cloned().unwrap_or_default()).await
}

async fn create_field(
    State(state): State<Shared>,
    Path(uuid): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("POST /objects/{uuid}/fields"));
    let id = backend.id("fld");
    let field = with_id(payload, "field_uuid", &id, Some(&uuid));
    // Newest first, as the real service orders fields.
    backend.fields.entry(uuid).or_default().insert(0, field.clone());
    created(&backend, field)
}

async fn update_field(
    State(state): State<Shared>,
    Path((uuid, field)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("PUT /objects/{uuid}/fields/{field}"));
    let found = backend
        .fields
        .get_mut(&uuid)
        .and_then(|fields| fields.iter_mut().find(|f| f["field_uuid"] == json!(field)));
    match found {
        Some(entry) => {
            merge(entry, payload);
            Json(entry.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such field").into_response(),
    }
}

async fn delete_field(
    State(state): State<Shared>,
    Path((uuid, field)): Path<(String, String)>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("DELETE /objects/{uuid}/fields/{field}"));
    if let Some(fields) = backend.fields.get_mut(&uuid) {
        fields.retain(|f| f["field_uuid"] != json!(field));
    }
    StatusCode::NO_CONTENT.into_response()
}

// -----------------------------------------------------------------------------
// RECORDS
// -----------------------------------------------------------------------------

async fn list_records(State(state): State<Shared>, Path(uuid): Path<String>) -> Response {
    let route = format!("GET /objects/{uuid}/records/");
    list(&state, route, |b| b.records.get(&uuid).cloned().unwrap_or_default()).await
}

async fn create_record(
    State(state): State<Shared>,
    Path(uuid): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("POST /objects/{uuid}/records/"));
    let id = backend.id("rec");
    let record = with_id(payload, "record_uuid", &id, Some(&uuid));
    backend.records.entry(uuid).or_default().push(record.clone());
    created(&backend, record)
}

async fn update_record(
    State(state): State<Shared>,
    Path((uuid, record)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("PUT /objects/{uuid}/records/{record}"));
    let found = backend
        .records
        .get_mut(&uuid)
        .and_then(|records| records.iter_mut().find(|r| r["record_uuid"] == json!(record)));
    match found {
        Some(entry) => {
            merge(entry, payload);
            Json(entry.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such record").into_response(),
    }
}

async fn delete_record(
    State(state): State<Shared>,
    Path((uuid, record)): Path<(String, String)>,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.requests.push(format!("DELETE /objects/{uuid}/records/{record}"));
    if let Some(records) = backend.records.get_mut(&uuid) {
        records.retain(|r| r["record_uuid"] != json!(record));
    }
    // Records answer 200 with a small body instead of 204.
    Json(json!({"deleted": record})).into_response()
}
