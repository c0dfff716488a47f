use crate::models::DocumentId;
use crate::portal::FileSaver;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use bytes::Bytes;

/// Saves a document by sending it to the browser as an attachment.
///
/// The bytes are owned by the response and released once it is written.
#[derive(Debug, Default)]
pub struct Attachment {
    file: Option<(String, Bytes)>,
}

impl FileSaver for Attachment {
    fn save(&mut self, filename: &str, content: Bytes) -> anyhow::Result<()> {
        self.file = Some((filename.to_string(), content));
        Ok(())
    }
}

/// `attachment; filename="..."; filename*=UTF-8''...`
///
/// The quoted name is an ASCII fallback, the extended one keeps the
/// original name intact.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

impl IntoResponse for Attachment {
    fn into_response(self) -> Response {
        let Some((filename, content)) = self.file else {
            return StatusCode::NO_CONTENT.into_response();
        };

        let disposition = HeaderValue::from_str(&content_disposition(&filename))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            content,
        )
            .into_response()
    }
}

/// Send the document as a file download, or go back to the page with an
/// alert.
pub async fn download_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Response {
    let id = DocumentId::new(document_id);
    let mut attachment = Attachment::default();

    match state.portal.download(&id, &mut attachment).await {
        Ok(()) => attachment.into_response(),
        Err(_) => Redirect::to("/").into_response(),
    }
}
