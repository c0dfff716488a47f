//! In-memory [`DocumentStore`] for unit tests.

use crate::models::{Document, DocumentId, SelectedFile};
use crate::services::{DocumentStore, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn uploaded_at() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z").unwrap()
}

pub fn document(id: &str, filename: &str, file_size: u64) -> Document {
    Document {
        id: DocumentId::new(id),
        filename: filename.to_string(),
        file_size,
        uploaded_at: uploaded_at(),
    }
}

#[derive(Default)]
pub struct FakeStore {
    documents: Mutex<Vec<Document>>,
    next_id: AtomicU64,
    upload_rejection: Mutex<Option<Option<String>>>,
    reject_deletes: AtomicBool,
    hold_uploads: AtomicBool,
    delete_gate: Mutex<Option<Arc<Notify>>>,
    list_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    download_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let store = Self::default();
        store.next_id.store(documents.len() as u64, Ordering::SeqCst);
        *store.documents.lock().unwrap() = documents;
        store
    }

    pub fn reject_uploads_with(&self, message: Option<&str>) {
        *self.upload_rejection.lock().unwrap() = Some(message.map(str::to_string));
    }

    pub fn reject_deletes(&self) {
        self.reject_deletes.store(true, Ordering::SeqCst);
    }

    /// Uploads never get an answer while set.
    pub fn hold_uploads(&self, hold: bool) {
        self.hold_uploads.store(hold, Ordering::SeqCst);
    }

    /// Deletes wait until the returned gate is notified, once per delete.
    pub fn hold_deletes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.delete_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

fn not_found() -> StoreError {
    StoreError::Rejected {
        status: StatusCode::NOT_FOUND,
        message: Some("Document not found".to_string()),
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn upload_document(&self, file: SelectedFile) -> Result<Document, StoreError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if self.hold_uploads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        if let Some(message) = self.upload_rejection.lock().unwrap().clone() {
            return Err(StoreError::Rejected {
                status: StatusCode::BAD_REQUEST,
                message,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let document = document(&id.to_string(), &file.filename, file.size());
        self.documents.lock().unwrap().insert(0, document.clone());
        Ok(document)
    }

    async fn download_document(&self, id: &DocumentId) -> Result<Bytes, StoreError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);

        let documents = self.documents.lock().unwrap();
        documents
            .iter()
            .find(|doc| &doc.id == id)
            .map(|doc| Bytes::from(format!("%PDF-{}", doc.filename)))
            .ok_or_else(not_found)
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.delete_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.reject_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            });
        }

        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|doc| &doc.id != id);
        if documents.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
