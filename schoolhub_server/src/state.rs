use std::sync::Arc;

use schoolhub_core::{config, error::CoreError, SchoolHub};
use tracing::info;

pub type AppState = Arc<SchoolHub>;

pub async fn init_state() -> Result<AppState, CoreError> {
    let config = config::get_or_init().await?;
    info!("Using database at {}", config.database_path.display());

    let hub = SchoolHub::start(config).await?;
    Ok(Arc::new(hub))
}
