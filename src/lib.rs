#[cfg(feature = "desktop")]
mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod view;

use models::config::AppConfig;
use services::config::{resolve_api_key, resolve_data_dir};
use services::controller::AppController;
use services::history::HistoryStore;
use services::recognition::GeminiClient;
use services::storage::FileStorage;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "plate_scanner=info";

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Wire the controller to the Gemini client and the on-disk history
pub fn init_controller(config: &AppConfig) -> Result<Arc<AppController>, String> {
    let data_dir = resolve_data_dir(config).map_err(|e| e.to_string())?;
    let history = HistoryStore::load(Box::new(FileStorage::new(&data_dir)));

    let client = GeminiClient::new(&config.recognition, resolve_api_key(config))
        .map_err(|e| e.to_string())?;
    if !client.is_configured() {
        tracing::warn!("no API key configured; set GEMINI_API_KEY to enable recognition");
    }

    tracing::info!(
        data_dir = %data_dir.display(),
        model = %client.model(),
        scans = history.len(),
        "scanner initialized"
    );
    Ok(Arc::new(AppController::new(Arc::new(client), history)))
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing(false);

    let config = match services::config::ConfigManager::new() {
        Ok(manager) => manager.load_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "no config directory, using defaults");
            AppConfig::default()
        }
    };
    let controller = init_controller(&config).expect("Failed to initialize scanner");

    tauri::Builder::default()
        .manage(controller)
        .invoke_handler(tauri::generate_handler![
            commands::scan::get_view,
            commands::scan::select_image,
            commands::scan::discard_image,
            commands::scan::recognize_plate,
            commands::history::delete_scan,
            commands::history::clear_history
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
