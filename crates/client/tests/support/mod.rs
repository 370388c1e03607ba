//! Scripted stand-in for the dashboard API.
//!
//! Every request is recorded. Replies come from per-route queues: each call
//! pops the front entry, and the last entry keeps answering once the queue
//! is down to one.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use fleetdesk_auth::{CredentialProvider, MemoryTokenStore};
use fleetdesk_client::{ClientConfig, Services};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl Canned {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct Inner {
    requests: Vec<Recorded>,
    routes: HashMap<(String, String), VecDeque<Canned>>,
}

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Inner>>);

pub struct MockApi {
    pub base_url: String,
    shared: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl MockApi {
    pub async fn spawn() -> Self {
        let shared = Shared::default();
        let app = Router::new().fallback(handle).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            shared,
            handle,
        }
    }

    /// Queue a reply for `method path` (path without the `/api` prefix).
    pub fn on(&self, method: &str, path: &str, reply: Canned) -> &Self {
        self.shared
            .0
            .lock()
            .unwrap()
            .routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.0.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(format!("{}/api", self.base_url))
    }

    /// Services over an in-memory token store seeded with `token`.
    pub async fn services(&self, token: Option<&str>) -> Services {
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let credentials = CredentialProvider::restore(Arc::new(store))
            .await
            .expect("memory store never fails");
        Services::new(self.config(), Arc::new(credentials)).expect("client builds")
    }

    /// Wait until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.requests().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("mock API did not receive {count} requests in time");
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let reply = {
        let mut inner = shared.0.lock().unwrap();
        inner.requests.push(Recorded {
            method: method.to_string(),
            path: path.clone(),
            authorization: header_text(header::AUTHORIZATION),
            content_type: header_text(header::CONTENT_TYPE),
            body: body.to_vec(),
        });

        inner
            .routes
            .get_mut(&(method.to_string(), path.clone()))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
    };

    let reply = reply.unwrap_or_else(|| Canned::json(404, json!({ "message": "Route not found" })));
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

pub fn vehicle_json(id: i64, plate: &str, kilometer: i64) -> Value {
    json!({
        "id": id,
        "vehicleName": "Tipper",
        "vehicleNumber": plate,
        "insurance": "2030-01-01",
        "pollution": "2030-01-01",
        "rcDate": "2030-01-01",
        "kilometer": kilometer,
        "isActive": true
    })
}

pub fn fuel_json(id: i64, vehicle_id: i64, verified: bool) -> Value {
    json!({
        "fuelId": id,
        "vehicleId": vehicle_id,
        "bunkId": 2,
        "volume": 40,
        "amount": 4200,
        "date": "2025-02-01T00:00:00.000Z",
        "kilometer": 470,
        "isVerified": verified,
        "vehicle": { "id": vehicle_id, "vehicleName": "Tipper", "vehicleNumber": "TN 38 AB 1234" },
        "bunk": { "id": 2, "bunkName": "HP Auto Nagar" }
    })
}

pub fn bunk_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "bunkName": name,
        "ownerName": "Selvam",
        "phoneNumber": "9000000000",
        "address": "Salem",
        "amount": 0,
        "createdAt": "2025-01-01T10:00:00.000Z",
        "updatedAt": "2025-01-01T10:00:00.000Z"
    })
}

pub fn user_json(id: i64, name: &str, role: u8) -> Value {
    json!({
        "userid": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phoneNumber": "9876543210",
        "amount": 5000,
        "userRole": role,
        "imageUrl": null
    })
}
