//! Top-level state container for the portal page.
//!
//! Owns the single in-memory document list and the upload flow. Views get
//! snapshots ([`PortalView`]); every change to the list comes from a fresh
//! full fetch after an action completes.

use crate::error::PortalError;
use crate::flow::UploadFlow;
use crate::models::{Document, DocumentId, SelectedFile};
use crate::services::{metrics, DocumentStore};
use crate::views::{DocumentListView, PortalView};
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load documents. Make sure the backend server is running.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete document";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download document";
pub const DELETE_CONFIRMATION_PROMPT: &str = "Are you sure you want to delete this document?";

/// Asks the user to confirm a destructive action.
pub trait Confirm: Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Saves downloaded bytes under a suggested file name.
pub trait FileSaver: Send {
    fn save(&mut self, filename: &str, content: Bytes) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user said no; nothing was sent.
    Declined,
    /// A delete for the same id is still running; nothing was sent.
    AlreadyInFlight,
}

#[derive(Debug)]
struct ListState {
    documents: Vec<Document>,
    loading: bool,
    error: Option<String>,
    alert: Option<String>,
    /// Set by a successful fetch, consumed by the next page render.
    fresh: bool,
}

pub struct Portal {
    store: Arc<dyn DocumentStore>,
    list: RwLock<ListState>,
    pending_deletes: Mutex<HashSet<DocumentId>>,
    upload: UploadFlow,
}

/// Removes an id from the in-flight set when the delete finishes.
struct PendingDelete<'a> {
    pending: &'a Mutex<HashSet<DocumentId>>,
    id: DocumentId,
}

impl Drop for PendingDelete<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl Portal {
    pub fn new(store: Arc<dyn DocumentStore>, message_display_window: Duration) -> Self {
        Self {
            store,
            list: RwLock::new(ListState {
                documents: Vec::new(),
                loading: true,
                error: None,
                alert: None,
                fresh: false,
            }),
            pending_deletes: Mutex::new(HashSet::new()),
            upload: UploadFlow::new(message_display_window),
        }
    }

    fn read_list(&self) -> std::sync::RwLockReadGuard<'_, ListState> {
        self.list.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_list(&self) -> std::sync::RwLockWriteGuard<'_, ListState> {
        self.list.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> MutexGuard<'_, HashSet<DocumentId>> {
        self.pending_deletes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn upload_flow(&self) -> &UploadFlow {
        &self.upload
    }

    /// Replace the list with a fresh fetch.
    ///
    /// On failure the list is left as it was and the page banner is set.
    pub async fn refresh(&self) -> Result<(), PortalError> {
        {
            let mut list = self.write_list();
            list.loading = true;
            list.error = None;
            list.fresh = false;
        }

        let result = self.store.list_documents().await;

        let mut list = self.write_list();
        list.loading = false;
        match result {
            Ok(documents) => {
                list.documents = documents;
                list.fresh = true;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Error fetching documents");
                list.error = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(PortalError::Network(LOAD_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Refresh before rendering the page, unless an action just did.
    ///
    /// Actions redirect back to the page, so this keeps each of them at a
    /// single list fetch.
    pub async fn refresh_for_page(&self) -> Result<(), PortalError> {
        let fresh = std::mem::take(&mut self.write_list().fresh);
        if fresh {
            return Ok(());
        }

        let result = self.refresh().await;
        self.write_list().fresh = false;
        result
    }

    pub fn documents(&self) -> Vec<Document> {
        self.read_list().documents.clone()
    }

    pub fn find(&self, id: &DocumentId) -> Option<Document> {
        self.read_list()
            .documents
            .iter()
            .find(|doc| &doc.id == id)
            .cloned()
    }

    pub fn is_delete_pending(&self, id: &DocumentId) -> bool {
        self.pending().contains(id)
    }

    /// Snapshot for rendering. Consumes the pending alert.
    pub fn view(&self) -> PortalView {
        let pending = self.pending().clone();
        let mut list = self.write_list();

        let documents = (!list.loading && list.error.is_none())
            .then(|| DocumentListView::new(&list.documents, &pending));

        PortalView {
            loading: list.loading,
            error: list.error.clone(),
            alert: list.alert.take(),
            documents,
            upload: self.upload.view(),
        }
    }

    fn raise_alert(&self, message: &str) {
        self.write_list().alert = Some(message.to_string());
    }

    /// Select `file` and submit it; refreshes the list once on success.
    pub async fn upload(&self, file: Option<SelectedFile>) -> Result<Document, PortalError> {
        self.upload.select(file)?;
        self.upload
            .submit(self.store.as_ref(), || async {
                self.refresh().await.ok();
            })
            .await
    }

    /// Delete after confirmation; refreshes the list once on success.
    pub async fn delete(
        &self,
        id: &DocumentId,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, PortalError> {
        if !confirm.confirm(DELETE_CONFIRMATION_PROMPT) {
            tracing::debug!(document_id = %id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if !self.pending().insert(id.clone()) {
            tracing::debug!(document_id = %id, "Delete already in flight");
            return Ok(DeleteOutcome::AlreadyInFlight);
        }
        let guard = PendingDelete {
            pending: &self.pending_deletes,
            id: id.clone(),
        };

        let result = self.store.delete_document(id).await;
        drop(guard);

        match result {
            Ok(()) => {
                metrics::record_delete("succeeded");
                self.refresh().await.ok();
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                metrics::record_delete("failed");
                tracing::error!(document_id = %id, error = %err, "Failed to delete document");
                self.raise_alert(DELETE_FAILED_MESSAGE);
                Err(PortalError::Action(DELETE_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Fetch a document's bytes and hand them to `saver` under its original
    /// file name.
    pub async fn download(
        &self,
        id: &DocumentId,
        saver: &mut dyn FileSaver,
    ) -> Result<(), PortalError> {
        let filename = match self.find(id) {
            Some(document) => document.filename,
            // Links can outlive the list they were rendered from.
            None => {
                self.refresh().await.ok();
                match self.find(id) {
                    Some(document) => document.filename,
                    None => {
                        tracing::warn!(document_id = %id, "Download requested for unknown document");
                        return Err(self.download_failed());
                    }
                }
            }
        };

        let content = match self.store.download_document(id).await {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(document_id = %id, error = %err, "Failed to download document");
                return Err(self.download_failed());
            }
        };

        if let Err(err) = saver.save(&filename, content) {
            tracing::error!(document_id = %id, error = %err, "Failed to save document");
            return Err(self.download_failed());
        }

        metrics::record_download("succeeded");
        Ok(())
    }

    fn download_failed(&self) -> PortalError {
        metrics::record_download("failed");
        self.raise_alert(DOWNLOAD_FAILED_MESSAGE);
        PortalError::Action(DOWNLOAD_FAILED_MESSAGE.to_string())
    }
}
