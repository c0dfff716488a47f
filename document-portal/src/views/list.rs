use super::format::{format_file_size, format_timestamp};
use crate::models::{Document, DocumentId};
use std::collections::HashSet;

pub const LIST_TITLE: &str = "Uploaded Documents";
pub const EMPTY_STATE_MESSAGE: &str = "No documents uploaded yet";

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub id: DocumentId,
    pub filename: String,
    pub size: String,
    pub uploaded: String,
    /// A delete for this row is in flight; its delete control is disabled.
    pub delete_pending: bool,
}

impl DocumentRow {
    pub fn new(document: &Document, delete_pending: bool) -> Self {
        Self {
            id: document.id.clone(),
            filename: document.filename.clone(),
            size: format_file_size(document.file_size),
            uploaded: format_timestamp(&document.uploaded_at),
            delete_pending,
        }
    }
}

/// The document grid, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentListView {
    pub title: &'static str,
    pub rows: Vec<DocumentRow>,
}

impl DocumentListView {
    pub fn new(documents: &[Document], pending_deletes: &HashSet<DocumentId>) -> Self {
        Self {
            title: LIST_TITLE,
            rows: documents
                .iter()
                .map(|doc| DocumentRow::new(doc, pending_deletes.contains(&doc.id)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn empty_message(&self) -> &'static str {
        EMPTY_STATE_MESSAGE
    }
}
