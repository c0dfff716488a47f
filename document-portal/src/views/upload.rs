use super::format::format_kilobytes;
use crate::flow::{UploadForm, UploadMessage};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFileInfo {
    pub name: String,
    /// Size in KB, two decimals.
    pub size_kb: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadFormView {
    /// Submit button and file input are disabled while true.
    pub uploading: bool,
    pub file: Option<SelectedFileInfo>,
    pub message: Option<UploadMessage>,
}

impl UploadFormView {
    pub fn button_label(&self) -> &'static str {
        if self.uploading {
            "⏳ Uploading..."
        } else {
            "⬆️ Upload"
        }
    }
}

impl From<&UploadForm> for UploadFormView {
    fn from(form: &UploadForm) -> Self {
        Self {
            uploading: form.is_uploading(),
            file: form.selected_file().map(|file| SelectedFileInfo {
                name: file.filename.clone(),
                size_kb: format_kilobytes(file.size()),
            }),
            message: form.message().cloned(),
        }
    }
}
