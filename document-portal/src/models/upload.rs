use bytes::Bytes;

/// A file picked by the user, not yet sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub filename: String,
    pub content: Bytes,
}

impl SelectedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Case-insensitive `.pdf` suffix check.
    pub fn has_pdf_extension(&self) -> bool {
        self.filename.to_lowercase().ends_with(".pdf")
    }
}
