use std::sync::Arc;

use rest_adapter::{load_settings, HttpAdapterApi, RepositoryAdapter, RestAdapter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS_PATH: &str = "appsettings.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());

    let result = run(&settings_path).await;
    if let Err(e) = &result {
        error!(error = %e, "Adapter worker exited with error");
    }
    result
}

async fn run(settings_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting adapter worker");
    let settings = load_settings(settings_path)?;
    let api = HttpAdapterApi::from_settings(&settings)?;
    let adapter = RestAdapter::new(Arc::new(api));

    let descriptor = adapter.create_descriptor().await?;
    info!(
        adapter_type = %descriptor.adapter_type,
        base_path = %settings.base_path,
        "Adapter ready"
    );
    for definition in &descriptor.setting_definitions {
        info!(name = %definition.name, required = definition.is_required, "Setting");
    }

    // List and fetch are driven by the hosting engine.
    tokio::signal::ctrl_c().await?;
    info!("Cancellation requested, worker will stop");

    info!("Stopping adapter worker");
    Ok(())
}
