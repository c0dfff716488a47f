pub mod upload;

pub use upload::{
    validate_selection, MessageKind, UploadFlow, UploadForm, UploadMessage, UploadPhase,
    NOT_PDF_MESSAGE, NO_FILE_MESSAGE, UPLOAD_FAILED_MESSAGE, UPLOAD_SUCCESS_MESSAGE,
};
