use document_portal::config::get_configuration;
use document_portal::services::init_metrics;
use document_portal::startup::Application;
use dotenvy::dotenv;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "document-portal",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    let application = Application::build(configuration).await.map_err(|e| {
        tracing::error!("Failed to start document portal: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    application.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
