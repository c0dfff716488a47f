pub mod app;
pub mod delete;
pub mod download;
pub mod documents;
pub mod metrics;
pub mod upload;
