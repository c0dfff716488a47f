pub mod document;
pub mod upload;

pub use document::{Document, DocumentId, ErrorBody};
pub use upload::SelectedFile;
