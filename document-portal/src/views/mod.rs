//! Read-only snapshots the templates render from.

pub mod format;
pub mod list;
pub mod upload;

pub use format::{format_file_size, format_kilobytes, format_timestamp, format_timestamp_in};
pub use list::{DocumentListView, DocumentRow, EMPTY_STATE_MESSAGE, LIST_TITLE};
pub use upload::{SelectedFileInfo, UploadFormView};

/// Everything the main page shows, taken at one point in time.
#[derive(Debug, Clone)]
pub struct PortalView {
    pub loading: bool,
    /// Page-level banner, e.g. backend unreachable.
    pub error: Option<String>,
    /// One-shot alert from a failed download or delete.
    pub alert: Option<String>,
    /// `None` while loading or when the list could not be fetched.
    pub documents: Option<DocumentListView>,
    pub upload: UploadFormView,
}
