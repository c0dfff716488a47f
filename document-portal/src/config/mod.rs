use serde::Deserialize;
use service_core::error::AppError;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub document_service: DocumentServiceSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentServiceSettings {
    /// Base URL of the document backend, e.g. `http://localhost:8000`.
    #[serde(default = "default_document_service_url")]
    pub url: String,
}

impl Default for DocumentServiceSettings {
    fn default() -> Self {
        Self {
            url: default_document_service_url(),
        }
    }
}

fn default_document_service_url() -> String {
    "http://localhost:8000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadSettings {
    /// How long the upload success message stays visible.
    #[serde(default = "default_message_display_secs")]
    pub message_display_secs: u64,
    /// Request body limit for `POST /upload`.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl UploadSettings {
    pub fn message_display_window(&self) -> Duration {
        Duration::from_secs(self.message_display_secs)
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            message_display_secs: default_message_display_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_message_display_secs() -> u64 {
    3
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint; span export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    service_core::config::load_settings("document-portal")
}
