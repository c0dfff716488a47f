use crate::views::{DocumentListView, UploadFormView};
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub loading: bool,
    pub error: Option<String>,
    pub alert: Option<String>,
    pub documents: Option<DocumentListView>,
    pub upload: UploadFormView,
    /// Reload the page after this many seconds so a success message goes away.
    pub refresh_after_secs: Option<u64>,
}

/// The portal page. Every render starts from a fresh list fetch.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    // A failed fetch is recorded as the page banner.
    let _ = state.portal.refresh_for_page().await;

    let view = state.portal.view();
    let refresh_after_secs = view
        .upload
        .message
        .as_ref()
        .filter(|message| message.is_success())
        .map(|_| {
            state
                .portal
                .upload_flow()
                .display_window()
                .as_secs()
                .max(1)
        });

    IndexTemplate {
        loading: view.loading,
        error: view.error,
        alert: view.alert,
        documents: view.documents,
        upload: view.upload,
        refresh_after_secs,
    }
}
