use crate::models::DocumentId;
use crate::portal::{Confirm, DeleteOutcome, DELETE_CONFIRMATION_PROMPT};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    /// `yes` or `no`; absent until the user has been asked.
    pub confirm: Option<String>,
}

/// The answer given on the confirmation page.
struct FormConfirmation<'a>(&'a str);

impl Confirm for FormConfirmation<'_> {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0.eq_ignore_ascii_case("yes")
    }
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub id: DocumentId,
    pub filename: Option<String>,
    pub prompt: &'static str,
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let id = DocumentId::new(document_id);

    let Some(answer) = form.confirm else {
        return ConfirmDeleteTemplate {
            filename: state.portal.find(&id).map(|doc| doc.filename),
            id,
            prompt: DELETE_CONFIRMATION_PROMPT,
        }
        .into_response();
    };

    match state
        .portal
        .delete(&id, &FormConfirmation(&answer))
        .await
    {
        Ok(DeleteOutcome::Deleted) => {
            tracing::info!(document_id = %id, "Document deleted by user");
        }
        Ok(outcome) => {
            tracing::debug!(document_id = %id, outcome = ?outcome, "Delete skipped");
        }
        Err(err) => {
            tracing::warn!(document_id = %id, error = %err, "Delete failed");
        }
    }

    Redirect::to("/").into_response()
}
