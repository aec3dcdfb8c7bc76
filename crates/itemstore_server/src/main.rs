//! Itemstore Server Binary
//!
//! Standalone server for the itemstore resource API.

use std::sync::Arc;

use itemstore_core::{init_logging, AppConfig, ResourceStore};
use itemstore_server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_level, config.log_dir.as_deref())?;
    if config.debug {
        log::debug!("event=config_loaded module=main status=ok config={config:?}");
    }

    let store = ResourceStore::open(&config.database)?;
    let state = Arc::new(AppState::new(store));

    serve(&config.bind_addr.to_string(), state).await
}
