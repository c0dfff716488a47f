use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Load settings for a workspace member.
///
/// Reads `<service_dir>/config/base.yaml` (optional) and then applies
/// environment overrides with the `APP` prefix, e.g.
/// `APP_SERVER__PORT=9000` sets `server.port`.
pub fn load_settings<T: DeserializeOwned>(service_dir: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir()?;
    let configuration_directory = configuration_directory(&base_path, service_dir);

    let settings = Cfg::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Works both from the workspace root and from inside the member directory.
fn configuration_directory(base_path: &Path, service_dir: &str) -> PathBuf {
    if base_path.ends_with(service_dir) {
        base_path.join("config")
    } else {
        base_path.join(service_dir).join("config")
    }
}
