//! An axum stub of the statistical service.
//!
//! `/upload`, `/train` and `/predict` are served at the root and under
//! `/api`. Each route answers with the reply scripted for its full path, or a
//! 404 HTML page when none is scripted. Requests are recorded so tests can
//! inspect exactly what the client sent.

use axum::extract::{Multipart, OriginalUri, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Body of a recorded request, as decoded by the route's extractor.
#[derive(Debug, Clone)]
pub enum CapturedBody {
    Multipart(Vec<UploadedPart>),
    Json(Value),
}

/// A request as received by the stub.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub body: CapturedBody,
}

impl CapturedRequest {
    pub fn json(&self) -> &Value {
        match &self.body {
            CapturedBody::Json(value) => value,
            other => panic!("expected a JSON body, got {other:?}"),
        }
    }

    pub fn parts(&self) -> &[UploadedPart] {
        match &self.body {
            CapturedBody::Multipart(parts) => parts,
            other => panic!("expected a multipart body, got {other:?}"),
        }
    }
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

#[derive(Default)]
struct StubState {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

impl StubState {
    fn record(&self, path: &str, body: CapturedBody) -> Response {
        self.requests.lock().unwrap().push(CapturedRequest {
            path: path.to_string(),
            body,
        });

        match self.replies.lock().unwrap().get(path).cloned() {
            Some(reply) => (
                reply.status,
                [(header::CONTENT_TYPE, reply.content_type)],
                reply.body,
            )
                .into_response(),
            None => not_found().into_response(),
        }
    }
}

type Shared = Arc<StubState>;

/// Running stub server. The serve task lives until the test runtime shuts down.
pub struct StubServer {
    base_url: String,
    state: Shared,
}

impl StubServer {
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new()
            .merge(service_routes())
            .nest("/api", service_routes())
            .fallback(not_found_handler)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `POST path` with a JSON body.
    pub fn route_json(&self, path: &str, status: u16, body: Value) -> &Self {
        self.route(path, status, "application/json", body.to_string())
    }

    /// Answer `POST path` with an arbitrary body.
    pub fn route(&self, path: &str, status: u16, content_type: &'static str, body: String) -> &Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.state.replies.lock().unwrap().insert(
            path.to_string(),
            Reply {
                status,
                content_type,
                body,
            },
        );
        self
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

fn service_routes() -> Router<Shared> {
    Router::new()
        .route("/upload", post(upload))
        .route("/train", post(json_body))
        .route("/predict", post(json_body))
}

async fn upload(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    mut multipart: Multipart,
) -> Response {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(UploadedPart {
            name,
            file_name,
            bytes,
        });
    }
    state.record(uri.path(), CapturedBody::Multipart(parts))
}

async fn json_body(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> Response {
    state.record(uri.path(), CapturedBody::Json(body))
}

async fn not_found_handler() -> impl IntoResponse {
    not_found()
}

fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>"))
}
