#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use document_portal::config::DocumentServiceSettings;
use document_portal::portal::Portal;
use document_portal::services::DocumentClient;
use document_portal::startup::build_router;
use document_portal::AppState;
use serde_json::json;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const BOUNDARY: &str = "portal-test-boundary";

#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: u64,
    pub filename: String,
    pub content: Vec<u8>,
    pub uploaded_at: String,
}

impl StoredDocument {
    fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "filename": self.filename,
            "uploaded_at": self.uploaded_at,
            "file_size": self.content.len(),
        })
    }
}

/// In-memory stand-in for the document backend, speaking its REST contract.
#[derive(Default)]
pub struct BackendState {
    documents: Mutex<Vec<StoredDocument>>,
    next_id: AtomicU64,
    upload_fields: Mutex<Vec<String>>,
    list_requests: AtomicUsize,
    upload_requests: AtomicUsize,
    download_requests: AtomicUsize,
    delete_requests: AtomicUsize,
}

impl BackendState {
    fn insert(&self, filename: &str, content: Vec<u8>) -> StoredDocument {
        let document = StoredDocument {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            filename: filename.to_string(),
            content,
            uploaded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        // Newest first, like the backend's default ordering.
        self.documents.lock().unwrap().insert(0, document.clone());
        document
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn list(State(state): State<Arc<BackendState>>) -> impl IntoResponse {
    state.list_requests.fetch_add(1, Ordering::SeqCst);
    let documents = state.documents.lock().unwrap();
    Json(documents.iter().map(StoredDocument::to_json).collect::<Vec<_>>())
}

async fn upload(State(state): State<Arc<BackendState>>, mut multipart: Multipart) -> Response {
    state.upload_requests.fetch_add(1, Ordering::SeqCst);

    let mut file = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        state.upload_fields.lock().unwrap().push(name.clone());
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content = field.bytes().await.unwrap_or_default().to_vec();
            file = Some((filename, content));
        }
    }

    let Some((filename, content)) = file else {
        return error(StatusCode::BAD_REQUEST, "No file provided");
    };
    if !filename.to_lowercase().ends_with(".pdf") {
        return error(StatusCode::BAD_REQUEST, "Only PDF files are allowed");
    }

    let document = state.insert(&filename, content);
    (StatusCode::CREATED, Json(document.to_json())).into_response()
}

async fn download(State(state): State<Arc<BackendState>>, Path(id): Path<u64>) -> Response {
    state.download_requests.fetch_add(1, Ordering::SeqCst);
    let documents = state.documents.lock().unwrap();
    match documents.iter().find(|doc| doc.id == id) {
        Some(doc) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            doc.content.clone(),
        )
            .into_response(),
        None => error(StatusCode::NOT_FOUND, "Document not found"),
    }
}

async fn delete(State(state): State<Arc<BackendState>>, Path(id): Path<u64>) -> Response {
    state.delete_requests.fetch_add(1, Ordering::SeqCst);
    let mut documents = state.documents.lock().unwrap();
    let before = documents.len();
    documents.retain(|doc| doc.id != id);
    if documents.len() == before {
        return error(StatusCode::NOT_FOUND, "Document not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

pub struct TestBackend {
    pub address: String,
    pub state: Arc<BackendState>,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/documents", get(list))
            .route("/documents/upload", post(upload))
            .route("/documents/:id", get(download).delete(delete))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        TestBackend {
            address: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn seed(&self, filename: &str, content: &[u8]) -> u64 {
        self.state.insert(filename, content.to_vec()).id
    }

    pub fn filenames(&self) -> Vec<String> {
        let documents = self.state.documents.lock().unwrap();
        documents.iter().map(|doc| doc.filename.clone()).collect()
    }

    pub fn upload_fields(&self) -> Vec<String> {
        self.state.upload_fields.lock().unwrap().clone()
    }

    pub fn list_requests(&self) -> usize {
        self.state.list_requests.load(Ordering::SeqCst)
    }

    pub fn upload_requests(&self) -> usize {
        self.state.upload_requests.load(Ordering::SeqCst)
    }

    pub fn download_requests(&self) -> usize {
        self.state.download_requests.load(Ordering::SeqCst)
    }

    pub fn delete_requests(&self) -> usize {
        self.state.delete_requests.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> DocumentClient {
        client_for(&self.address)
    }

    pub fn portal(&self, message_display_window: Duration) -> Portal {
        Portal::new(Arc::new(self.client()), message_display_window)
    }

    pub fn router(&self) -> Router {
        router_for(&self.address)
    }
}

/// An address nothing listens on.
pub async fn unreachable_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn client_for(address: &str) -> DocumentClient {
    DocumentClient::new(DocumentServiceSettings {
        url: address.to_string(),
    })
}

pub fn router_for(address: &str) -> Router {
    let portal = Portal::new(Arc::new(client_for(address)), Duration::from_secs(3));
    build_router(AppState::new(Arc::new(portal)), 20 * 1024 * 1024)
}

/// A browser-style multipart body with a single `file` field.
/// `None` mimics submitting the form without choosing a file.
pub fn upload_request(filename: Option<&str>, content: &[u8]) -> Request<Body> {
    let (name, mime) = match filename {
        Some(name) => (name, "application/pdf"),
        None => ("", "application/octet-stream"),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
