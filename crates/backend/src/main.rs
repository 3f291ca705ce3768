use std::sync::Arc;

use backend::routes::{configure_routes, AppState};
use backend::shared::config::load_config;
use backend::shared::data::dataset_loader::CsvDatasetSource;
use backend::system;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = load_config()?;
    let (primary, fallback) = config.dataset.paths();
    tracing::info!(
        "Dataset: {} (fallback {})",
        primary.display(),
        fallback.display()
    );

    let state = AppState {
        source: Arc::new(CsvDatasetSource::new(primary, fallback)),
    };
    let app = configure_routes(state);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Sales dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
