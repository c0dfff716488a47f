pub mod document_client;
pub mod metrics;

pub use document_client::{DocumentClient, DocumentStore, StoreError};
pub use metrics::{get_metrics, init_metrics};
