//! In-memory backend for integration tests: serves `/api/v1/<resource>` CRUD
//! from memory and counts every request it sees.

#![allow(dead_code)]

use async_trait::async_trait;
use coop_data::{ApiRequest, ApiResponse, ClientConfig, ClientError, DataContext, Method, Transport};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Default)]
struct Inner {
    /// collection path -> records in insertion order
    collections: BTreeMap<String, Vec<Value>>,
    log: Vec<(Method, String)>,
    failures: VecDeque<Failure>,
    /// One-shot failures for a specific request, whatever order it arrives in.
    targeted: Vec<(Method, String, Failure)>,
    held_reads: VecDeque<oneshot::Receiver<()>>,
}

enum Failure {
    Status(u16, Value),
    Network,
}

pub struct MockBackend {
    inner: Mutex<Inner>,
    bulk_delete: bool,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Self::with_bulk_delete(true)
    }

    pub fn with_bulk_delete(bulk_delete: bool) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            bulk_delete,
        })
    }

    pub fn seed(&self, collection: &str, records: Vec<Value>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(records);
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        let inner = self.inner.lock().unwrap();
        inner.collections.get(collection).cloned().unwrap_or_default()
    }

    /// Fail the next request with this status and body.
    pub fn fail_next(&self, status: u16, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .push_back(Failure::Status(status, body));
    }

    /// Fail the first `method path` request with this status and body.
    pub fn fail_request(&self, method: Method, path: &str, status: u16, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .targeted
            .push((method, path.to_string(), Failure::Status(status, body)));
    }

    pub fn drop_next(&self) {
        self.inner.lock().unwrap().failures.push_back(Failure::Network);
    }

    /// The next GET computes its response immediately but only returns once `release` fires.
    pub fn hold_next_read(&self, release: oneshot::Receiver<()>) {
        self.inner.lock().unwrap().held_reads.push_back(release);
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.inner.lock().unwrap().log.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|(m, p)| *m == method && p == path)
            .count()
    }

    pub fn total(&self) -> usize {
        self.inner.lock().unwrap().log.len()
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let mut inner = self.inner.lock().unwrap();
        let (collection, id) = split_path(&request.path);
        let records = inner.collections.entry(collection.clone()).or_default();
        match (request.method, id) {
            (Method::Get, None) => {
                let query: BTreeMap<&str, &str> = request
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                let filtered: Vec<Value> = records
                    .iter()
                    .filter(|r| matches_filter(r, query.get("filter").copied()))
                    .cloned()
                    .collect();
                match (query.get("pageIndex"), query.get("pageSize")) {
                    (Some(index), Some(size)) => {
                        let index: usize = index.parse().unwrap_or(0);
                        let size: usize = size.parse().unwrap_or(10);
                        let page: Vec<Value> =
                            filtered.iter().skip(index * size).take(size).cloned().collect();
                        ok(json!({
                            "data": page,
                            "totalSize": filtered.len(),
                            "pageSize": size,
                            "pageIndex": index,
                        }))
                    }
                    _ => ok(json!({ "data": filtered })),
                }
            }
            (Method::Get, Some(id)) => match records.iter().find(|r| r["id"] == id) {
                Some(record) => ok(json!({ "data": record })),
                None => not_found(&id),
            },
            (Method::Post, None) => {
                let body = request.body.clone().unwrap_or(Value::Null);
                if let Some(resp) = reject_blank_name(&body) {
                    return resp;
                }
                let mut record = body.as_object().cloned().unwrap_or_default();
                record.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
                record.insert("createdAt".into(), json!(chrono::Utc::now().to_rfc3339()));
                let record = Value::Object(record);
                records.push(record.clone());
                ApiResponse {
                    status: 201,
                    body: json!({ "data": record }),
                }
            }
            (Method::Put, Some(id)) => {
                let body = request.body.clone().unwrap_or(Value::Null);
                if let Some(resp) = reject_blank_name(&body) {
                    return resp;
                }
                match records.iter_mut().find(|r| r["id"] == id) {
                    Some(record) => {
                        merge(record, &body);
                        ok(json!({ "data": record.clone() }))
                    }
                    None => not_found(&id),
                }
            }
            (Method::Delete, Some(id)) => {
                let before = records.len();
                records.retain(|r| r["id"] != id);
                if records.len() == before {
                    not_found(&id)
                } else {
                    ApiResponse {
                        status: 204,
                        body: Value::Null,
                    }
                }
            }
            (Method::Delete, None) => {
                let ids: Vec<Value> = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("ids"))
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                records.retain(|r| !ids.contains(&r["id"]));
                ApiResponse {
                    status: 204,
                    body: Value::Null,
                }
            }
            _ => ApiResponse {
                status: 405,
                body: json!({ "error": { "code": "method_not_allowed", "message": "method not allowed" } }),
            },
        }
    }
}

#[async_trait]
impl Transport for MockBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let (failure, hold) = {
            let mut inner = self.inner.lock().unwrap();
            inner.log.push((request.method, request.path.clone()));
            let hold = if request.method == Method::Get {
                inner.held_reads.pop_front()
            } else {
                None
            };
            let targeted = inner
                .targeted
                .iter()
                .position(|(m, p, _)| *m == request.method && *p == request.path);
            let failure = match targeted {
                Some(pos) => Some(inner.targeted.remove(pos).2),
                None => inner.failures.pop_front(),
            };
            (failure, hold)
        };
        let response = match failure {
            Some(Failure::Network) => return Err(ClientError::Network("connection reset".into())),
            Some(Failure::Status(status, body)) => ApiResponse { status, body },
            None => self.handle(&request),
        };
        if let Some(release) = hold {
            let _ = release.await;
        }
        Ok(response)
    }

    fn supports_bulk_delete(&self) -> bool {
        self.bulk_delete
    }
}

fn split_path(path: &str) -> (String, Option<String>) {
    let rest = path.trim_start_matches("/api/v1/");
    match rest.split_once('/') {
        Some((collection, id)) => (collection.to_string(), Some(id.to_string())),
        None => (rest.to_string(), None),
    }
}

/// Filters look like `name:Cash`; an opaque string as far as the client is concerned.
fn matches_filter(record: &Value, filter: Option<&str>) -> bool {
    let Some((field, value)) = filter.and_then(|f| f.split_once(':')) else {
        return true;
    };
    record.get(field).and_then(Value::as_str) == Some(value)
}

fn reject_blank_name(body: &Value) -> Option<ApiResponse> {
    match body.get("name").and_then(Value::as_str) {
        Some(name) if name.trim().is_empty() => Some(ApiResponse {
            status: 422,
            body: json!({
                "error": {
                    "code": "validation_error",
                    "message": "name is required",
                    "details": { "name": ["must not be blank"] }
                }
            }),
        }),
        _ => None,
    }
}

fn merge(record: &mut Value, patch: &Value) {
    if let (Some(target), Some(source)) = (record.as_object_mut(), patch.as_object()) {
        for (k, v) in source {
            target.insert(k.clone(), v.clone());
        }
    }
}

fn ok(body: Value) -> ApiResponse {
    ApiResponse { status: 200, body }
}

fn not_found(id: &str) -> ApiResponse {
    ApiResponse {
        status: 404,
        body: json!({ "error": { "code": "not_found", "message": format!("not found: {}", id) } }),
    }
}

pub fn context(backend: &Arc<MockBackend>) -> DataContext {
    context_with(backend, ClientConfig::default())
}

pub fn context_with(backend: &Arc<MockBackend>, config: ClientConfig) -> DataContext {
    DataContext::new(config, backend.clone())
}

pub fn long_stale_time() -> ClientConfig {
    ClientConfig::default().with_stale_time(Duration::from_secs(3600))
}

pub fn payment_type(name: &str, kind: &str) -> Value {
    let mut record = Map::new();
    record.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
    record.insert("name".into(), json!(name));
    record.insert("type".into(), json!(kind));
    Value::Object(record)
}
