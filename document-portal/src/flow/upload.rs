//! Upload form state machine and its async driver.
//!
//! `Idle -> Validating -> Uploading -> {Succeeded, Failed} -> Idle`.
//! Local validation never touches the network. A success message is cleared
//! after the display window; an error message stays until the next
//! selection or submission.

use crate::error::PortalError;
use crate::models::{Document, SelectedFile};
use crate::services::{metrics, DocumentStore, StoreError};
use crate::views::UploadFormView;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const NO_FILE_MESSAGE: &str = "Please select a PDF file!";
pub const NOT_PDF_MESSAGE: &str = "Only PDF files are allowed!";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "✓ Uploaded successfully!";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed! Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Validating,
    Uploading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl UploadMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == MessageKind::Success
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            MessageKind::Success => "message-success",
            MessageKind::Error => "message-error",
        }
    }
}

/// Client-side checks: a file is present and named `*.pdf`.
pub fn validate_selection(file: Option<&SelectedFile>) -> Result<&SelectedFile, PortalError> {
    let file = file.ok_or_else(|| PortalError::Validation(NO_FILE_MESSAGE.to_string()))?;

    if !file.has_pdf_extension() {
        return Err(PortalError::Validation(NOT_PDF_MESSAGE.to_string()));
    }

    Ok(file)
}

#[derive(Debug, Default)]
pub struct UploadForm {
    phase: UploadPhase,
    selected: Option<SelectedFile>,
    message: Option<UploadMessage>,
}

impl UploadForm {
    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn message(&self) -> Option<&UploadMessage> {
        self.message.as_ref()
    }

    /// Replace the selection and clear any previous message.
    pub fn select(&mut self, file: Option<SelectedFile>) -> Result<(), PortalError> {
        if self.is_uploading() {
            return Err(PortalError::Busy);
        }

        self.message = None;
        self.selected = file;
        Ok(())
    }

    /// Validate the selection and move to `Uploading`.
    ///
    /// Returns the file to send. On a validation failure the message is set
    /// and the form stays `Idle`.
    pub fn begin_submit(&mut self) -> Result<SelectedFile, PortalError> {
        if self.is_uploading() {
            return Err(PortalError::Busy);
        }

        self.phase = UploadPhase::Validating;
        let file = match validate_selection(self.selected.as_ref()) {
            Ok(file) => file.clone(),
            Err(err) => {
                self.message = Some(UploadMessage::error(err.message()));
                self.phase = UploadPhase::Idle;
                return Err(err);
            }
        };

        self.message = None;
        self.phase = UploadPhase::Uploading;
        Ok(file)
    }

    /// Record the backend's answer and return to `Idle`.
    ///
    /// Returns the terminal phase the upload went through.
    pub fn complete(&mut self, result: &Result<Document, StoreError>) -> UploadPhase {
        let outcome = match result {
            Ok(_) => {
                self.message = Some(UploadMessage::success(UPLOAD_SUCCESS_MESSAGE));
                self.selected = None;
                UploadPhase::Succeeded
            }
            Err(err) => {
                let text = err.server_message().unwrap_or(UPLOAD_FAILED_MESSAGE);
                self.message = Some(UploadMessage::error(text));
                UploadPhase::Failed
            }
        };

        self.phase = UploadPhase::Idle;
        outcome
    }

    /// Give up on an upload whose answer will never arrive.
    ///
    /// Leaves the form `Idle` with the generic failure message and the
    /// selection kept, so the user can retry.
    pub fn abandon(&mut self) {
        if !self.is_uploading() {
            return;
        }

        self.message = Some(UploadMessage::error(UPLOAD_FAILED_MESSAGE));
        self.phase = UploadPhase::Idle;
    }

    /// Drop the message if it is a success message. Error messages stay.
    pub fn clear_success_message(&mut self) {
        if self.message.as_ref().is_some_and(UploadMessage::is_success) {
            self.message = None;
        }
    }
}

/// Abandons the upload if the submitting future is dropped before the
/// backend answered.
struct InFlightUpload<'a> {
    form: &'a Mutex<UploadForm>,
    answered: bool,
}

impl Drop for InFlightUpload<'_> {
    fn drop(&mut self) {
        if self.answered {
            return;
        }

        tracing::warn!("Upload cancelled before the document service answered");
        metrics::record_upload("cancelled");
        self.form
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abandon();
    }
}

/// Drives an [`UploadForm`] against a [`DocumentStore`].
///
/// The form lock is never held across an await, so the form can be rendered
/// while an upload is running.
pub struct UploadFlow {
    form: Arc<Mutex<UploadForm>>,
    clear_task: Mutex<Option<JoinHandle<()>>>,
    display_window: Duration,
}

impl UploadFlow {
    pub fn new(display_window: Duration) -> Self {
        Self {
            form: Arc::new(Mutex::new(UploadForm::default())),
            clear_task: Mutex::new(None),
            display_window,
        }
    }

    pub fn display_window(&self) -> Duration {
        self.display_window
    }

    fn form(&self) -> MutexGuard<'_, UploadForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.clear_task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> UploadFormView {
        UploadFormView::from(&*self.form())
    }

    pub fn phase(&self) -> UploadPhase {
        self.form().phase()
    }

    pub fn message(&self) -> Option<UploadMessage> {
        self.form().message().cloned()
    }

    pub fn selected_file(&self) -> Option<SelectedFile> {
        self.form().selected_file().cloned()
    }

    pub fn select(&self, file: Option<SelectedFile>) -> Result<(), PortalError> {
        self.cancel_clear();
        self.form().select(file)
    }

    /// Submit the current selection.
    ///
    /// `on_uploaded` runs exactly once, after a successful upload and before
    /// the message auto-clear is scheduled.
    pub async fn submit<F, Fut>(
        &self,
        store: &dyn DocumentStore,
        on_uploaded: F,
    ) -> Result<Document, PortalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        self.cancel_clear();

        let file = self.form().begin_submit().inspect_err(|err| {
            if matches!(err, PortalError::Validation(_)) {
                metrics::record_upload("rejected_locally");
                tracing::info!(reason = %err, "Upload rejected before sending");
            }
        })?;

        tracing::info!(filename = %file.filename, size = file.size(), "Uploading document");
        let mut in_flight = InFlightUpload {
            form: &self.form,
            answered: false,
        };
        let result = store.upload_document(file).await;
        let outcome = self.form().complete(&result);
        in_flight.answered = true;

        match result {
            Ok(document) => {
                metrics::record_upload("succeeded");
                on_uploaded().await;
                self.schedule_clear();
                Ok(document)
            }
            Err(err) => {
                metrics::record_upload("failed");
                tracing::warn!(error = %err, phase = ?outcome, "Upload failed");
                let text = self
                    .message()
                    .map(|message| message.text)
                    .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string());
                Err(match err {
                    StoreError::Network(_) => PortalError::Network(text),
                    _ => PortalError::Validation(text),
                })
            }
        }
    }

    fn schedule_clear(&self) {
        let form = Arc::clone(&self.form);
        let window = self.display_window;

        let task = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            form.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear_success_message();
        });

        if let Some(previous) = self.clear_task().replace(task) {
            previous.abort();
        }
    }

    fn cancel_clear(&self) {
        if let Some(task) = self.clear_task().take() {
            task.abort();
        }
    }
}

impl Drop for UploadFlow {
    fn drop(&mut self) {
        self.cancel_clear();
    }
}
