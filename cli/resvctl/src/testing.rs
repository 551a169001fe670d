//! Test doubles for the transport and printer seams.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use resv_resources::MasterCall;

use crate::client::Transport;
use crate::error::ResvError;
use crate::output::{ExecutorResourceRow, Printer, ResourceRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One request seen by [`RecordingTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn master_call(&self) -> MasterCall {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Transport that records every request and replays canned responses.
///
/// Unconfigured GETs fail with a 404; unconfigured POSTs succeed with an
/// empty body, like the master's `202 Accepted`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    gets: Mutex<HashMap<String, Bytes>>,
    posts: Mutex<HashMap<String, Bytes>>,
    fail_post_at: Mutex<Option<usize>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_get(&self, path: &str, body: impl Into<Bytes>) {
        self.gets.lock().unwrap().insert(path.to_string(), body.into());
    }

    pub fn respond_post(&self, path: &str, body: impl Into<Bytes>) {
        self.posts.lock().unwrap().insert(path.to_string(), body.into());
    }

    /// Reject the POST with this zero-based index with a 409.
    pub fn fail_post_at(&self, index: usize) {
        *self.fail_post_at.lock().unwrap() = Some(index);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Decoded master calls, in order.
    pub fn master_calls(&self) -> Vec<MasterCall> {
        self.requests()
            .iter()
            .filter(|r| r.method == Method::Post && r.path == "/mesos/api/v1")
            .map(RecordedRequest::master_call)
            .collect()
    }

    fn record(&self, method: Method, path: &str, body: Bytes) -> usize {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });
        requests.iter().filter(|r| r.method == method).count() - 1
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, path: &str) -> Result<Bytes, ResvError> {
        self.record(Method::Get, path, Bytes::new());
        self.gets
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ResvError::transport(path, Some(404), "Not Found"))
    }

    async fn post_json(&self, path: &str, body: Bytes) -> Result<Bytes, ResvError> {
        let index = self.record(Method::Post, path, body);
        if *self.fail_post_at.lock().unwrap() == Some(index) {
            return Err(ResvError::transport(path, Some(409), "Conflict"));
        }
        Ok(self.posts.lock().unwrap().get(path).cloned().unwrap_or_default())
    }
}

/// Printer that keeps everything it is given.
#[derive(Default)]
pub struct RecordingPrinter {
    pub messages: Mutex<Vec<String>>,
    pub resources: Mutex<Vec<ResourceRow>>,
    pub executor_resources: Mutex<Vec<ExecutorResourceRow>>,
}

impl RecordingPrinter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Printer for RecordingPrinter {
    fn message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn resources(&self, rows: &[ResourceRow]) {
        self.resources.lock().unwrap().extend_from_slice(rows);
    }

    fn executor_resources(&self, rows: &[ExecutorResourceRow]) {
        self.executor_resources
            .lock()
            .unwrap()
            .extend_from_slice(rows);
    }
}

/// Agent `/state` body holding `resources` under `role`.
pub fn agent_state(role: &str, resources: Vec<serde_json::Value>) -> String {
    let mut roles = serde_json::Map::new();
    roles.insert(role.to_string(), serde_json::Value::Array(resources));

    serde_json::json!({
        "id": "a1",
        "reserved_resources_full": roles
    })
    .to_string()
}

/// Agent-reported dynamic memory reservation.
pub fn mem_json(principal: &str, resource_id: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "mem",
        "type": "SCALAR",
        "scalar": { "value": 512.0 },
        "role": "slave_public",
        "reservations": [{
            "type": "DYNAMIC",
            "role": "slave_public",
            "principal": principal,
            "labels": { "labels": [{ "key": "resource_id", "value": resource_id }] }
        }]
    })
}

/// Agent-reported persistent volume on a dynamic disk reservation.
pub fn volume_json(principal: &str, resource_id: &str, persistence_id: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "disk",
        "type": "SCALAR",
        "scalar": { "value": 1024.0 },
        "role": "slave_public",
        "reservations": [{
            "type": "DYNAMIC",
            "role": "slave_public",
            "principal": principal,
            "labels": { "labels": [{ "key": "resource_id", "value": resource_id }] }
        }],
        "disk": {
            "persistence": { "id": persistence_id, "principal": principal },
            "volume": { "mode": "RW", "container_path": "data" }
        }
    })
}
