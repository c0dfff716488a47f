use crate::config::Settings;
use crate::handlers::{
    app::health_check, delete::delete_document, documents::index,
    download::download_document, metrics::metrics, upload::upload_handler,
};
use crate::portal::Portal;
use crate::services::{DocumentClient, DocumentStore};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route(
            "/upload",
            post(upload_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/documents/:id/download", get(download_document))
        .route("/documents/:id/delete", post(delete_document))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Portal state wired to the configured backend.
pub fn build_state(settings: &Settings) -> AppState {
    let store: Arc<dyn DocumentStore> =
        Arc::new(DocumentClient::new(settings.document_service.clone()));
    let portal = Portal::new(store, settings.upload.message_display_window());
    AppState::new(Arc::new(portal))
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let state = build_state(&settings);
        let app = build_router(state.clone(), settings.upload.max_upload_bytes);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port = port,
            backend = %settings.document_service.url,
            "Document portal listening"
        );

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
