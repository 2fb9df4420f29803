use std::sync::Arc;

use diet_coach::api::{create_routes, AppState};
use diet_coach::config::{run_migrations, AppConfig, DatabaseConfig};
use diet_coach::store::PgStore;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;

    let state = AppState::from_store(Arc::new(PgStore::new(pool)));
    let app = create_routes(state);

    let listener = TcpListener::bind(app_config.server_address()).await?;
    info!(
        "Diet Coach server starting on http://{}",
        app_config.server_address()
    );
    axum::serve(listener, app).await?;

    Ok(())
}
