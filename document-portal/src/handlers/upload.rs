use crate::models::SelectedFile;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use service_core::error::AppError;

/// Read the `file` field. A field without a file name means nothing was picked.
async fn read_selection(multipart: &mut Multipart) -> Result<Option<SelectedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Malformed upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };

        let data = field.bytes().await.map_err(|e| {
            tracing::error!("Failed to read file {}: {}", file_name, e);
            AppError::BadRequest(anyhow::anyhow!("Failed to read file {}", file_name))
        })?;

        return Ok(Some(SelectedFile::new(file_name, data)));
    }

    Ok(None)
}

/// Run the upload flow and go back to the page, which shows the outcome.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let selection = read_selection(&mut multipart).await?;

    match state.portal.upload(selection).await {
        Ok(document) => {
            tracing::info!(
                document_id = %document.id,
                filename = %document.filename,
                "File uploaded successfully"
            );
        }
        Err(err) => {
            tracing::info!(reason = %err, "Upload did not complete");
        }
    }

    Ok(Redirect::to("/").into_response())
}
