//! In-memory stand-in for the configuration API.
//!
//! Services spring into existence when their first version is created.
//! Version state (active, locked, clones) is enforced here the way the real
//! API does it, and logging endpoints are stored as raw JSON objects keyed by
//! endpoint kind. Lists come back in storage order; versions are listed
//! newest first.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Logging endpoint kinds served under `/logging/{kind}`.
pub const SINK_KINDS: &[&str] = &["bigquery", "s3"];

/// Format assigned when a logging endpoint is created without one.
pub const DEFAULT_LOG_FORMAT: &str = r#"%h %l %u %t "%r" %>s %b"#;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Version {
    pub service_id: String,
    pub number: u32,
    pub active: bool,
    pub locked: bool,
    pub deployed: bool,
    pub staging: bool,
    pub testing: bool,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Writable part of a version. Omitted fields reset to their defaults.
#[derive(Deserialize)]
pub struct VersionUpdate {
    #[serde(default)]
    pub comment: String,
}

type Record = Map<String, Value>;

#[derive(Debug)]
struct VersionEntry {
    version: Version,
    sinks: HashMap<String, Vec<Record>>,
}

#[derive(Debug, Default)]
pub struct Store {
    services: HashMap<String, Vec<VersionEntry>>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the `{"msg", "detail"}` shape the API uses.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    msg: &'static str,
    detail: String,
}

impl Failure {
    fn new(status: StatusCode, msg: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            msg,
            detail: detail.into(),
        }
    }

    fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Record not found", detail)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "msg": self.msg, "detail": self.detail })),
        )
            .into_response()
    }
}

type Reply<T> = Result<T, Failure>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route(
            "/service/{service_id}/version",
            get(list_versions).post(create_version),
        )
        .route(
            "/service/{service_id}/version/{number}",
            get(get_version).put(update_version),
        )
        .route(
            "/service/{service_id}/version/{number}/validate",
            get(validate_version),
        )
        .route(
            "/service/{service_id}/version/{number}/activate",
            put(activate_version),
        )
        .route(
            "/service/{service_id}/version/{number}/deactivate",
            put(deactivate_version),
        )
        .route(
            "/service/{service_id}/version/{number}/clone",
            put(clone_version),
        )
        .route(
            "/service/{service_id}/version/{number}/lock",
            put(lock_version),
        )
        .route(
            "/service/{service_id}/version/{number}/logging/{kind}",
            get(list_sinks).post(create_sink),
        )
        .route(
            "/service/{service_id}/version/{number}/logging/{kind}/{name}",
            get(get_sink).put(update_sink).delete(delete_sink),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
}

impl Store {
    fn versions_mut(&mut self, service_id: &str) -> Reply<&mut Vec<VersionEntry>> {
        self.services
            .get_mut(service_id)
            .ok_or_else(|| Failure::not_found(format!("service {service_id}")))
    }

    fn entry(&self, service_id: &str, number: u32) -> Reply<&VersionEntry> {
        self.services
            .get(service_id)
            .and_then(|versions| versions.iter().find(|e| e.version.number == number))
            .ok_or_else(|| Failure::not_found(format!("version {number} of service {service_id}")))
    }

    fn entry_mut(&mut self, service_id: &str, number: u32) -> Reply<&mut VersionEntry> {
        self.versions_mut(service_id)?
            .iter_mut()
            .find(|e| e.version.number == number)
            .ok_or_else(|| Failure::not_found(format!("version {number} of service {service_id}")))
    }

    /// Entry that may still be edited.
    fn draft_mut(&mut self, service_id: &str, number: u32) -> Reply<&mut VersionEntry> {
        let entry = self.entry_mut(service_id, number)?;
        if entry.version.locked {
            return Err(Failure::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Version is locked",
                format!("version {number} can no longer be modified"),
            ));
        }
        Ok(entry)
    }
}

impl VersionEntry {
    /// Position of a named endpoint. Lookups never create a collection for `kind`.
    fn find_sink(&mut self, kind: &str, name: &str) -> Reply<(&mut Vec<Record>, usize)> {
        let missing = || Failure::not_found(format!("{kind} endpoint {name}"));
        let records = self.sinks.get_mut(kind).ok_or_else(missing)?;
        let index = records
            .iter()
            .position(|r| record_name(r) == Some(name))
            .ok_or_else(missing)?;
        Ok((records, index))
    }
}

fn new_version(service_id: &str, number: u32, comment: String) -> Version {
    let stamp = now();
    Version {
        service_id: service_id.to_string(),
        number,
        active: false,
        locked: false,
        deployed: false,
        staging: false,
        testing: false,
        comment,
        created_at: stamp.clone(),
        updated_at: stamp,
    }
}

async fn list_versions(
    State(db): State<Db>,
    Path(service_id): Path<String>,
) -> Reply<Json<Vec<Version>>> {
    let store = db.read().await;
    let versions = store
        .services
        .get(&service_id)
        .ok_or_else(|| Failure::not_found(format!("service {service_id}")))?;
    Ok(Json(
        versions.iter().rev().map(|e| e.version.clone()).collect(),
    ))
}

async fn create_version(
    State(db): State<Db>,
    Path(service_id): Path<String>,
) -> (StatusCode, Json<Version>) {
    let mut store = db.write().await;
    let versions = store.services.entry(service_id.clone()).or_default();
    let version = new_version(&service_id, versions.len() as u32 + 1, String::new());
    versions.push(VersionEntry {
        version: version.clone(),
        sinks: HashMap::new(),
    });
    (StatusCode::CREATED, Json(version))
}

async fn get_version(
    State(db): State<Db>,
    Path((service_id, number)): Path<(String, u32)>,
) -> Reply<Json<Version>> {
    let store = db.read().await;
    Ok(Json(store.entry(&service_id, number)?.version.clone()))
}

async fn update_version(
    State(db): State<Db>,
    Path((service_id, number)): Path<(String, u32)>,
    Json(input): Json<VersionUpdate>,
) -> Reply<Json<Version>> {
    let mut store = db.write().await;
    let entry = store.draft_mut(&service_id, number)?;
    entry.version.comment = input.comment;
    entry.version.updated_at = now();
    Ok(Json(entry.version.clone()))
}

async fn validate_version(
    State(db): State<Db>,
    Path((service_id, number)): Path<(String, u32)>,
) -> Reply<Json<Value>> {
    let store = db.read().await;
    store.entry(&service_id, number)?;
    Ok(Json(json!({ "status": "ok", "errors": [] })))
}

async fn activate_version(
    State(db): State<Db>,
    Path((service_id, number)): Path<(String, u32)>,
) -> Reply<Json<Version>> {
    let mut store = db.write().await;
    store.entry_mut(&service_id, number)?;
    let stamp = now();
    let mut activated = None;
    for entry in store.versions_mut(&service_id)?.iter_mut() {
        let target = entry.version.number == number;
        entry.version.active = target;
        if target {
            entry.version.locked = true;
            entry.version.deployed = true;
            entry.version.updated_at = stamp.clone();
            activated = Some(entry.version.clone());
        }
    }
    activated
        .map(Json)
        .ok_or_else(|| Failure::not_found(format!("version {number} of service {service_id}")))
}

async fn deactivate_version(
    State(db): State<Db>,
    Path((service_id, number)): Path<(String, u32)>,
) -> Reply<Json<Version>> {
    let mut store = db.write().await;
    let entry = store.entry_mut(&service_id, number)?;
    if !entry.version.active {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            "Version is not active",
            format!("version {number} is not the active version"),
        ));
    }
    entry.version.active = false;
    entry.version.updated_at = now();
    Ok(Json(entry.version.clone()))
}

async fn clone_version(
    State(db): State<Db>,
    Path((service_id, number)): Path<(String, u32)>,
) -> Reply<Json<Version>> {
    let mut store = db.write().await;
    let (comment, sinks) = {
        let source = store.entry(&service_id, number)?;
        (source.version.comment.clone(), source.sinks.clone())
    };
    let versions = store.versions_mut(&service_id)?;
    let next = versions.len() as u32 + 1;
    let version = new_version(&service_id, next, comment);
    let sinks = sinks
        .into_iter()
        .map(|(kind, records)| {
            let records = records
                .into_iter()
                .map(|mut record| {
                    record.insert("version".to_string(), Value::String(next.to_string()));
                    record
                })
                .collect();
            (kind, records)
        })
        .collect();
    versions.push(VersionEntry {
        version: version.clone(),
        sinks,
    });
    Ok(Json(version))
}

async fn lock_version(
    State(db): State<Db>,
    Path((service_id, number)): Path<(String, u32)>,
) -> Reply<Json<Version>> {
    let mut store = db.write().await;
    let entry = store.entry_mut(&service_id, number)?;
    entry.version.locked = true;
    entry.version.updated_at = now();
    Ok(Json(entry.version.clone()))
}

fn check_kind(kind: &str) -> Reply<()> {
    if SINK_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(Failure::not_found(format!("logging endpoint kind {kind}")))
    }
}

/// Normalise an incoming endpoint into the representation the API returns.
fn canonical(mut record: Record, service_id: &str, number: u32, name: &str) -> Record {
    record.insert("service_id".to_string(), Value::String(service_id.to_string()));
    record.insert("version".to_string(), Value::String(number.to_string()));
    record.insert("name".to_string(), Value::String(name.to_string()));
    let has_format = record
        .get("format")
        .and_then(Value::as_str)
        .is_some_and(|f| !f.is_empty());
    if !has_format {
        record.insert(
            "format".to_string(),
            Value::String(DEFAULT_LOG_FORMAT.to_string()),
        );
    }
    record
}

fn record_name(record: &Record) -> Option<&str> {
    record
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
}

async fn list_sinks(
    State(db): State<Db>,
    Path((service_id, number, kind)): Path<(String, u32, String)>,
) -> Reply<Json<Vec<Record>>> {
    check_kind(&kind)?;
    let store = db.read().await;
    let entry = store.entry(&service_id, number)?;
    Ok(Json(entry.sinks.get(&kind).cloned().unwrap_or_default()))
}

async fn create_sink(
    State(db): State<Db>,
    Path((service_id, number, kind)): Path<(String, u32, String)>,
    Json(input): Json<Record>,
) -> Reply<(StatusCode, Json<Record>)> {
    check_kind(&kind)?;
    let name = record_name(&input)
        .ok_or_else(|| {
            Failure::new(
                StatusCode::BAD_REQUEST,
                "Missing name",
                "logging endpoints need a non-empty name",
            )
        })?
        .to_string();
    let mut store = db.write().await;
    let entry = store.draft_mut(&service_id, number)?;
    let records = entry.sinks.entry(kind).or_default();
    if records.iter().any(|r| record_name(r) == Some(name.as_str())) {
        return Err(Failure::new(
            StatusCode::CONFLICT,
            "Duplicate record",
            format!("an endpoint named {name} already exists"),
        ));
    }
    let record = canonical(input, &service_id, number, &name);
    records.push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_sink(
    State(db): State<Db>,
    Path((service_id, number, kind, name)): Path<(String, u32, String, String)>,
) -> Reply<Json<Record>> {
    check_kind(&kind)?;
    let store = db.read().await;
    store
        .entry(&service_id, number)?
        .sinks
        .get(&kind)
        .and_then(|records| records.iter().find(|r| record_name(r) == Some(name.as_str())))
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::not_found(format!("{kind} endpoint {name}")))
}

async fn update_sink(
    State(db): State<Db>,
    Path((service_id, number, kind, name)): Path<(String, u32, String, String)>,
    Json(input): Json<Record>,
) -> Reply<Json<Record>> {
    check_kind(&kind)?;
    let new_name = record_name(&input).unwrap_or(name.as_str()).to_string();
    let mut store = db.write().await;
    let entry = store.draft_mut(&service_id, number)?;
    let (records, index) = entry.find_sink(&kind, &name)?;
    let clash = records
        .iter()
        .enumerate()
        .any(|(i, r)| i != index && record_name(r) == Some(new_name.as_str()));
    if clash {
        return Err(Failure::new(
            StatusCode::CONFLICT,
            "Duplicate record",
            format!("an endpoint named {new_name} already exists"),
        ));
    }
    records[index] = canonical(input, &service_id, number, &new_name);
    Ok(Json(records[index].clone()))
}

async fn delete_sink(
    State(db): State<Db>,
    Path((service_id, number, kind, name)): Path<(String, u32, String, String)>,
) -> Reply<Json<Value>> {
    check_kind(&kind)?;
    let mut store = db.write().await;
    let entry = store.draft_mut(&service_id, number)?;
    let (records, index) = entry.find_sink(&kind, &name)?;
    records.remove(index);
    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_fills_server_fields() {
        let input: Record = serde_json::from_value(json!({"name": "ignored", "dataset": "logs"})).unwrap();
        let record = canonical(input, "svc", 3, "events");
        assert_eq!(record["service_id"], "svc");
        assert_eq!(record["version"], "3");
        assert_eq!(record["name"], "events");
        assert_eq!(record["format"], DEFAULT_LOG_FORMAT);
        assert_eq!(record["dataset"], "logs");
    }

    #[test]
    fn canonical_keeps_explicit_format() {
        let input: Record = serde_json::from_value(json!({"format": "%h"})).unwrap();
        let record = canonical(input, "svc", 1, "x");
        assert_eq!(record["format"], "%h");
    }

    #[test]
    fn empty_names_are_treated_as_missing() {
        let record: Record = serde_json::from_value(json!({"name": ""})).unwrap();
        assert_eq!(record_name(&record), None);
    }

    #[test]
    fn version_update_defaults_comment() {
        let input: VersionUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(input.comment, "");
    }

    #[test]
    fn failure_renders_msg_and_detail() {
        let response = Failure::not_found("service nope").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn locked_versions_reject_edits() {
        let mut store = Store::default();
        let mut version = new_version("svc", 1, String::new());
        version.locked = true;
        store.services.insert(
            "svc".to_string(),
            vec![VersionEntry {
                version,
                sinks: HashMap::new(),
            }],
        );
        let err = store.draft_mut("svc", 1).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(store.draft_mut("svc", 2).is_err());
    }

    fn db_with_draft() -> Db {
        let mut store = Store::default();
        store.services.insert(
            "svc".to_string(),
            vec![VersionEntry {
                version: new_version("svc", 1, String::new()),
                sinks: HashMap::new(),
            }],
        );
        Arc::new(RwLock::new(store))
    }

    #[tokio::test]
    async fn missing_endpoint_leaves_no_empty_kind_behind() {
        let db = db_with_draft();
        let path = || Path(("svc".to_string(), 1, "s3".to_string(), "ghost".to_string()));

        let err = delete_sink(State(db.clone()), path()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        let err = update_sink(State(db.clone()), path(), Json(Record::new()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let store = db.read().await;
        assert!(store.services["svc"][0].sinks.is_empty());
    }
}