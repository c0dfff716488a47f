//! HTTP client for the document backend.
//!
//! One request per call, no retries and no timeout override; failures are
//! returned as [`StoreError`] and turned into user-facing messages by the
//! caller.

use crate::config::DocumentServiceSettings;
use crate::models::{Document, DocumentId, ErrorBody, SelectedFile};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, StatusCode, Url};
use service_core::observability::TracedClientExt;
use thiserror::Error;

const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document service unreachable: {0}")]
    Network(#[source] reqwest::Error),

    #[error("document service rejected the request ({status})")]
    Rejected {
        status: StatusCode,
        /// The `error` field of the response body, if there was one.
        message: Option<String>,
    },

    #[error("unexpected response from document service: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("invalid document URL: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    /// Message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            StoreError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// The four remote document operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError>;

    /// Send a file as the multipart field `file`.
    async fn upload_document(&self, file: SelectedFile) -> Result<Document, StoreError>;

    async fn download_document(&self, id: &DocumentId) -> Result<Bytes, StoreError>;

    async fn delete_document(&self, id: &DocumentId) -> Result<(), StoreError>;
}

pub struct DocumentClient {
    client: Client,
    settings: DocumentServiceSettings,
}

impl DocumentClient {
    pub fn new(settings: DocumentServiceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        self.settings.url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// `{base}/documents/{id}` with the id as a single encoded path segment.
    fn document_url(&self, id: &DocumentId) -> Result<Url, StoreError> {
        let invalid = || StoreError::InvalidUrl(format!("{}/documents/{}", self.base_url(), id));

        // Dot segments would be dropped from the path instead of encoded.
        if matches!(id.as_str(), "" | "." | "..") {
            return Err(invalid());
        }

        let mut url = Url::parse(self.base_url()).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("documents")
            .push(id.as_str());
        Ok(url)
    }
}

/// Build a `Rejected` error, reading `{"error": ...}` from the body if present.
async fn rejection(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let message = response.json::<ErrorBody>().await.ok().map(|body| body.error);
    StoreError::Rejected { status, message }
}

#[async_trait]
impl DocumentStore for DocumentClient {
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        let url = self.url("/documents");

        let response = self.client.traced_get(&url).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to reach document service");
            StoreError::Network(e)
        })?;

        if !response.status().is_success() {
            let err = rejection(response).await;
            tracing::error!(url = %url, error = %err, "List documents failed");
            return Err(err);
        }

        let documents = response.json::<Vec<Document>>().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to decode document list");
            StoreError::Decode(e)
        })?;

        tracing::debug!(count = documents.len(), "Fetched document list");
        Ok(documents)
    }

    async fn upload_document(&self, file: SelectedFile) -> Result<Document, StoreError> {
        let url = self.url("/documents/upload");
        let filename = file.filename.clone();
        let size = file.size();

        let part = multipart::Part::bytes(file.content.to_vec())
            .file_name(file.filename)
            .mime_str(PDF_MIME_TYPE)
            .map_err(StoreError::Request)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .traced_post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(filename = %filename, error = %e, "Upload request failed");
                StoreError::Network(e)
            })?;

        if !response.status().is_success() {
            let err = rejection(response).await;
            tracing::warn!(
                filename = %filename,
                error = %err,
                server_message = ?err.server_message(),
                "Upload rejected"
            );
            return Err(err);
        }

        let document = response.json::<Document>().await.map_err(|e| {
            tracing::error!(filename = %filename, error = %e, "Failed to decode upload response");
            StoreError::Decode(e)
        })?;

        tracing::info!(
            document_id = %document.id,
            filename = %filename,
            size = size,
            "Document uploaded"
        );
        Ok(document)
    }

    async fn download_document(&self, id: &DocumentId) -> Result<Bytes, StoreError> {
        let url = self.document_url(id)?;

        let response = self.client.traced_get(url.as_str()).send().await.map_err(|e| {
            tracing::error!(document_id = %id, error = %e, "Download request failed");
            StoreError::Network(e)
        })?;

        if !response.status().is_success() {
            let err = rejection(response).await;
            tracing::warn!(document_id = %id, error = %err, "Download failed");
            return Err(err);
        }

        let content = response.bytes().await.map_err(|e| {
            tracing::error!(document_id = %id, error = %e, "Failed to read document bytes");
            StoreError::Decode(e)
        })?;

        tracing::info!(document_id = %id, size = content.len(), "Document downloaded");
        Ok(content)
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), StoreError> {
        let url = self.document_url(id)?;

        let response = self
            .client
            .traced_delete(url.as_str())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(document_id = %id, error = %e, "Delete request failed");
                StoreError::Network(e)
            })?;

        if !response.status().is_success() {
            let err = rejection(response).await;
            tracing::warn!(document_id = %id, error = %err, "Delete failed");
            return Err(err);
        }

        tracing::info!(document_id = %id, "Document deleted");
        Ok(())
    }
}
